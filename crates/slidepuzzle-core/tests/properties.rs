use proptest::prelude::*;
use slidepuzzle_core::solvability::is_solvable;
use slidepuzzle_core::{Board, Builder, Direction, GridSize, MoveOutcome, Phase, Position, Tile};
use std::collections::{HashMap, VecDeque};

fn frames(size: GridSize) -> Vec<Vec<usize>> {
    (0..size.cell_count()).map(|i| vec![i]).collect()
}

fn build(rows: usize, columns: usize, seed: u64) -> Board<usize> {
    let size = GridSize::new(rows, columns).unwrap();
    Builder::with_seed(seed).build(rows, columns, &frames(size)).unwrap()
}

/// Every cell holds exactly one tile except the single empty slot
fn assert_bijection(board: &Board<usize>) {
    let size = board.size();
    let mut empties = 0;
    let mut seen = vec![false; size.cell_count()];
    for pos in size.positions() {
        match board.tile_at(pos) {
            Some(tile) => {
                assert_eq!(tile.position(), pos);
                assert!(!seen[tile.unit_id()], "tile {} twice", tile.unit_id());
                seen[tile.unit_id()] = true;
            }
            None => {
                empties += 1;
                assert_eq!(pos, board.empty_slot());
            }
        }
    }
    assert_eq!(empties, 1);
    assert_eq!(board.tiles().len(), size.cell_count() - 1);
}

/// Breadth-first search over 3x3 layouts; returns the cells to click, in order
fn solve_3x3(layout: &[Option<usize>]) -> Option<Vec<Position>> {
    let size = GridSize::new(3, 3).unwrap();
    let encode = |layout: &[Option<usize>]| -> [u8; 9] {
        let mut state = [8u8; 9];
        for (cell, id) in layout.iter().enumerate() {
            state[cell] = id.map_or(8, |id| id as u8);
        }
        state
    };
    let goal: [u8; 9] = [0, 1, 2, 3, 4, 5, 6, 7, 8];
    let start = encode(layout);

    let mut parents: HashMap<[u8; 9], Option<([u8; 9], Position)>> = HashMap::new();
    let mut queue = VecDeque::new();
    parents.insert(start, None);
    queue.push_back(start);

    while let Some(state) = queue.pop_front() {
        if state == goal {
            let mut path = Vec::new();
            let mut current = state;
            while let Some(Some((previous, clicked))) = parents.get(&current) {
                path.push(*clicked);
                current = *previous;
            }
            path.reverse();
            return Some(path);
        }
        let gap = state.iter().position(|&id| id == 8)?;
        let gap_pos = size.position_from_index(gap);
        for neighbor in size.neighbors(gap_pos) {
            let mut next = state;
            next.swap(gap, size.id_from_position(neighbor));
            if !parents.contains_key(&next) {
                parents.insert(next, Some((state, neighbor)));
                queue.push_back(next);
            }
        }
    }
    None
}

#[test]
fn built_3x3_boards_are_solved_by_search() {
    for seed in [1, 2, 3, 42, 1234] {
        let mut board = build(3, 3, seed);
        let path = solve_3x3(&board.layout()).expect("board should be solvable");

        let mut last = MoveOutcome::Ignored;
        for target in path {
            last = board.attempt_move(target);
            assert!(last.is_move());
        }
        assert_eq!(last, MoveOutcome::Solved);
        assert!(board.is_solved());
        assert_eq!(board.phase(), Phase::Solved);
    }
}

#[test]
fn reversed_scenario_is_solved_by_search() {
    let size = GridSize::new(3, 3).unwrap();
    let board = Builder::arrange(size, &[7, 6, 5, 4, 3, 2, 1, 0], &frames(size)).unwrap();
    assert!(solve_3x3(&board.layout()).is_some());
}

#[test]
fn unsolvable_3x3_has_no_path() {
    #[rustfmt::skip]
    let layout = [
        Some(1), Some(0), Some(2),
        Some(3), Some(4), Some(5),
        Some(6), Some(7), None,
    ];
    assert!(solve_3x3(&layout).is_none());
}

/// Walk the gap from the solved position; returns the layout and the cells the gap visited
fn scramble(size: GridSize, directions: &[Direction]) -> (Vec<Option<usize>>, Vec<Position>) {
    let mut layout: Vec<Option<usize>> = (0..size.cell_count()).map(Some).collect();
    layout[size.cell_count() - 1] = None;
    let mut gap = size.last_cell();
    let mut trail = vec![gap];
    for &dir in directions {
        if let Some(next) = gap.step(dir, size) {
            layout.swap(size.id_from_position(gap), size.id_from_position(next));
            gap = next;
            trail.push(gap);
        }
    }
    (layout, trail)
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

proptest! {
    #[test]
    fn new_boards_keep_bijection(rows in 3usize..8, columns in 3usize..8, seed in any::<u64>()) {
        let board = build(rows, columns, seed);
        assert_bijection(&board);
        prop_assert_eq!(board.empty_slot(), board.size().last_cell());
        prop_assert_eq!(board.phase(), Phase::Playing);
        prop_assert!(is_solvable(board.size(), &board.layout()));
    }

    #[test]
    fn replaying_a_scramble_backwards_solves(
        rows in 3usize..6,
        columns in 3usize..6,
        walk in prop::collection::vec(direction(), 1..60),
    ) {
        let size = GridSize::new(rows, columns).unwrap();
        let (layout, trail) = scramble(size, &walk);
        prop_assert!(is_solvable(size, &layout));

        let mut board = Board::from_layout(size, &layout, &frames(size)).unwrap();
        // Clicking the gap's previous cells in reverse undoes the walk
        for &target in trail.iter().rev().skip(1) {
            board.attempt_move(target);
            assert_bijection(&board);
        }
        prop_assert!(board.is_solved());
        prop_assert_eq!(board.empty_slot(), size.last_cell());
    }

    #[test]
    fn non_adjacent_targets_change_nothing(
        seed in any::<u64>(),
        x in 0usize..8,
        y in 0usize..8,
    ) {
        let mut board = build(4, 5, seed);
        let target = Position::new(x, y);
        prop_assume!(target.distance(board.empty_slot()) != 1 || !board.size().contains(target));

        let before = board.clone();
        prop_assert_eq!(board.attempt_move(target), MoveOutcome::Ignored);
        prop_assert_eq!(&board, &before);
    }

    #[test]
    fn adjacent_targets_move_exactly_one_tile(seed in any::<u64>(), dir in direction()) {
        let mut board = build(4, 4, seed);
        let gap = board.empty_slot();
        let Some(target) = gap.step(dir, board.size()) else {
            return Ok(());
        };
        let moving = board.tile_at(target).map(Tile::unit_id).unwrap();
        let before: Vec<(usize, Position)> =
            board.tiles().iter().map(|t| (t.unit_id(), t.position())).collect();

        prop_assert!(board.attempt_move(target).is_move());
        prop_assert_eq!(board.empty_slot(), target);
        prop_assert_eq!(board.tile_at(gap).map(Tile::unit_id), Some(moving));
        for (tile, (id, old)) in board.tiles().iter().zip(before) {
            prop_assert_eq!(tile.unit_id(), id);
            if id == moving {
                prop_assert_eq!(tile.position(), gap);
            } else {
                prop_assert_eq!(tile.position(), old);
            }
        }
        prop_assert_eq!(board.moves(), 1);
    }

    #[test]
    fn same_seed_and_moves_reach_same_state(
        seed in any::<u64>(),
        moves in prop::collection::vec(direction(), 0..40),
    ) {
        let mut a = build(3, 4, seed);
        let mut b = build(3, 4, seed);
        for &dir in &moves {
            prop_assert_eq!(a.slide(dir), b.slide(dir));
        }
        prop_assert_eq!(a, b);
    }
}
