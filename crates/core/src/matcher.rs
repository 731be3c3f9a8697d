//! Match detection.
//!
//! Every window of three consecutive cells in a row or column is tested; a
//! window whose cells share one non-empty kind contributes all three indices.
//! Longer runs are covered by overlapping windows and merge through the set,
//! so no explicit run-length extension is needed.

use std::collections::BTreeSet;

use crate::board::Board;
use crate::types::{Cell, MIN_RUN};

/// Deduplicated matched indices, iterated in ascending order
pub type MatchSet = BTreeSet<usize>;

#[inline(always)]
fn same_kind(a: Cell, b: Cell, c: Cell) -> bool {
    matches!(a, Some(t) if b == Some(t) && c == Some(t))
}

/// Find every cell that belongs to a horizontal or vertical run of three
///
/// Deterministic and side-effect free. An empty result means the board is
/// stable.
pub fn find_matches(board: &Board) -> MatchSet {
    let size = board.size();
    let cells = board.cells();
    let mut matches = MatchSet::new();

    if size < MIN_RUN {
        return matches;
    }

    // Horizontal windows
    for row in 0..size {
        for col in 0..=size - MIN_RUN {
            let i = row * size + col;
            if same_kind(cells[i], cells[i + 1], cells[i + 2]) {
                matches.extend([i, i + 1, i + 2]);
            }
        }
    }

    // Vertical windows
    for col in 0..size {
        for row in 0..=size - MIN_RUN {
            let i = row * size + col;
            if same_kind(cells[i], cells[i + size], cells[i + 2 * size]) {
                matches.extend([i, i + size, i + 2 * size]);
            }
        }
    }

    matches
}

/// Check the stability predicate without collecting indices
pub fn is_stable(board: &Board) -> bool {
    find_matches(board).is_empty()
}

/// Check whether `index` lies inside a run of three or more
///
/// Only looks at the windows that contain `index`, which makes it cheap to
/// test the two cells touched by a swap.
pub fn has_match_at(board: &Board, index: usize) -> bool {
    let size = board.size();
    if size < MIN_RUN || !board.in_bounds(index) {
        return false;
    }
    let cells = board.cells();
    let (row, col) = board.row_col(index);

    let window_starts = |pos: usize| {
        let lo = pos.saturating_sub(MIN_RUN - 1);
        let hi = pos.min(size.saturating_sub(MIN_RUN));
        lo..=hi
    };

    let horizontal = window_starts(col).any(|c| {
        let i = row * size + c;
        same_kind(cells[i], cells[i + 1], cells[i + 2])
    });
    if horizontal {
        return true;
    }

    window_starts(row).any(|r| {
        let i = r * size + col;
        same_kind(cells[i], cells[i + size], cells[i + 2 * size])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(indices: &[usize]) -> MatchSet {
        indices.iter().copied().collect()
    }

    #[test]
    fn test_detects_horizontal_three() {
        #[rustfmt::skip]
        let board = Board::from_kinds(4, &[
            1, 1, 1, 2,
            2, 3, 4, 5,
            3, 4, 5, 1,
            4, 5, 1, 2,
        ]).unwrap();
        assert_eq!(find_matches(&board), set(&[0, 1, 2]));
    }

    #[test]
    fn test_detects_vertical_three() {
        #[rustfmt::skip]
        let board = Board::from_kinds(4, &[
            1, 2, 3, 4,
            5, 2, 4, 3,
            3, 2, 5, 1,
            4, 5, 1, 2,
        ]).unwrap();
        assert_eq!(find_matches(&board), set(&[1, 5, 9]));
    }

    #[test]
    fn test_longer_runs_union_through_overlapping_windows() {
        #[rustfmt::skip]
        let board = Board::from_kinds(5, &[
            3, 3, 3, 3, 3,
            1, 2, 1, 2, 1,
            2, 1, 2, 1, 2,
            1, 2, 1, 2, 1,
            2, 1, 2, 1, 2,
        ]).unwrap();
        assert_eq!(find_matches(&board), set(&[0, 1, 2, 3, 4]));
    }

    #[test]
    fn test_crossing_runs_share_cells() {
        #[rustfmt::skip]
        let board = Board::from_kinds(3, &[
            1, 4, 3,
            4, 4, 4,
            3, 4, 2,
        ]).unwrap();
        assert_eq!(find_matches(&board), set(&[1, 3, 4, 5, 7]));
    }

    #[test]
    fn test_empty_cells_never_match() {
        let board = Board::new(4).unwrap();
        assert!(find_matches(&board).is_empty());
        assert!(is_stable(&board));
    }

    #[test]
    fn test_small_boards_are_always_stable() {
        let board = Board::from_kinds(2, &[1, 1, 1, 1]).unwrap();
        assert!(is_stable(&board));
        assert!(!has_match_at(&board, 0));
    }

    #[test]
    fn test_detection_is_idempotent() {
        #[rustfmt::skip]
        let board = Board::from_kinds(4, &[
            2, 2, 2, 1,
            1, 3, 4, 1,
            5, 3, 4, 1,
            4, 3, 1, 2,
        ]).unwrap();
        let first = find_matches(&board);
        let second = find_matches(&board);
        assert_eq!(first, second);
        assert_eq!(first, set(&[0, 1, 2, 3, 5, 7, 9, 11, 13]));
    }

    #[test]
    fn test_has_match_at_agrees_with_full_scan() {
        #[rustfmt::skip]
        let board = Board::from_kinds(4, &[
            2, 2, 2, 1,
            1, 3, 4, 1,
            5, 3, 4, 1,
            4, 3, 1, 2,
        ]).unwrap();
        let matches = find_matches(&board);
        for i in 0..board.len() {
            assert_eq!(has_match_at(&board, i), matches.contains(&i), "index {}", i);
        }
        assert!(!has_match_at(&board, 16));
    }
}
