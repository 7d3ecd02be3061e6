//! Basic example of using the sliding puzzle engine

use slidepuzzle_core::solvability::is_solvable;
use slidepuzzle_core::{Builder, Direction, GridSize, MoveOutcome};

fn main() {
    // Every tile gets a single "frame": here just its label
    let size = GridSize::new(3, 4).expect("3x4 is a valid board");
    let labels: Vec<Vec<char>> = (0..size.cell_count())
        .map(|i| vec![char::from_digit(i as u32 + 1, 36).unwrap_or('?')])
        .collect();

    println!("Shuffling a {} board...\n", size);
    let mut builder = Builder::with_seed(2014);
    let mut board = builder
        .build(size.rows(), size.columns(), &labels)
        .expect("labels cover every tile");

    println!("{}", board);
    println!("Empty slot: {}", board.empty_slot());
    println!("Solvable: {}", is_solvable(size, &board.layout()));
    println!("Movable tiles: {:?}\n", board.movable_positions());

    // Slide a few tiles around
    for direction in [Direction::Down, Direction::Right, Direction::Up, Direction::Up] {
        match board.slide(direction) {
            MoveOutcome::Ignored => println!("{:?}: nothing to slide", direction),
            MoveOutcome::Moved => println!("{:?}: gap now at {}", direction, board.empty_slot()),
            MoveOutcome::Solved => println!("{:?}: solved!", direction),
        }
    }

    println!("\nAfter {} moves:", board.moves());
    println!("{}", board);

    // Tiles carry their frames
    if let Some(tile) = board.tile_at(board.size().position_from_index(0)) {
        println!("Top-left tile shows '{}' (belongs at #{})", tile.frame(0), tile.unit_id() + 1);
    }
}
