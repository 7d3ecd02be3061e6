//! Inversion parity: which arrangements can be slid back into order.
//!
//! An inversion is a pair of tiles that appear in the reverse of their
//! canonical order when the board is read row by row, skipping the gap.
//! Horizontal moves never change the reading order. A vertical move carries
//! one tile past `columns - 1` others, so on odd-width boards the inversion
//! parity is invariant, while on even-width boards it flips together with the
//! gap's row.

use crate::GridSize;

/// Number of pairs `(a, b)` with `a` before `b` in `ids` but `a > b`
pub fn count_inversions(ids: &[usize]) -> usize {
    let mut inversions = 0;
    for (i, &earlier) in ids.iter().enumerate() {
        inversions += ids[i + 1..].iter().filter(|&&later| later < earlier).count();
    }
    inversions
}

/// Whether a row-major layout (`None` = gap) can reach the solved arrangement.
///
/// The layout is assumed to be a valid bijection; use `Board::from_layout` to check that.
pub fn is_solvable(size: GridSize, layout: &[Option<usize>]) -> bool {
    let ids: Vec<usize> = layout.iter().flatten().copied().collect();
    let inversions = count_inversions(&ids);

    if size.columns() % 2 == 1 {
        return inversions % 2 == 0;
    }

    let gap_row = layout
        .iter()
        .position(Option::is_none)
        .map(|i| size.position_from_index(i).y)
        .unwrap_or(size.rows() - 1);
    let rows_above_bottom = size.rows() - 1 - gap_row;
    (inversions + rows_above_bottom) % 2 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_inversions() {
        assert_eq!(count_inversions(&[]), 0);
        assert_eq!(count_inversions(&[0, 1, 2, 3]), 0);
        assert_eq!(count_inversions(&[1, 0, 2, 3]), 1);
        assert_eq!(count_inversions(&[3, 2, 1, 0]), 6);
        // Fully reversed eight tiles: 8 * 7 / 2
        assert_eq!(count_inversions(&[7, 6, 5, 4, 3, 2, 1, 0]), 28);
    }

    #[test]
    fn test_classic_unsolvable_fifteen() {
        // Sam Loyd's 14-15 swap
        let size = GridSize::new(4, 4).unwrap();
        let mut layout: Vec<Option<usize>> = (0..16).map(Some).collect();
        layout[15] = None;
        assert!(is_solvable(size, &layout));

        layout.swap(13, 14);
        assert!(!is_solvable(size, &layout));
    }

    #[test]
    fn test_even_width_accounts_for_gap_row() {
        let size = GridSize::new(4, 4).unwrap();
        // Solved board with the gap slid up one row: tile 11 moved down
        let mut layout: Vec<Option<usize>> = (0..16).map(Some).collect();
        layout[15] = Some(11);
        layout[11] = None;
        assert!(is_solvable(size, &layout));
    }

    #[test]
    fn test_odd_width_ignores_gap_row() {
        let size = GridSize::new(3, 3).unwrap();
        #[rustfmt::skip]
        let layout = [
            Some(0), Some(1), Some(2),
            Some(3), Some(4), None,
            Some(6), Some(7), Some(5),
        ];
        assert!(is_solvable(size, &layout));

        #[rustfmt::skip]
        let swapped = [
            Some(1), Some(0), Some(2),
            Some(3), Some(4), Some(5),
            Some(6), Some(7), None,
        ];
        assert!(!is_solvable(size, &swapped));
    }
}
