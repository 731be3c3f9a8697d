//! Move search.
//!
//! Finds adjacent pairs whose swap would commit, without mutating the
//! caller's board. Drives autoplay and can back a "no moves left" check.

use crate::board::Board;
use crate::matcher::{has_match_at, is_stable};

/// Every committing swap as `(a, b)` with `a < b`, ascending by `a` then `b`
pub fn committing_swaps(board: &Board) -> Vec<(usize, usize)> {
    let mut scratch = board.clone();
    // A board that already holds a run commits on any swap.
    let unstable = !is_stable(board);
    let mut out = Vec::new();

    for a in 0..board.len() {
        for b in forward_neighbors(board, a) {
            if unstable || commits(&mut scratch, a, b) {
                out.push((a, b));
            }
        }
    }
    out
}

/// First committing swap in scan order (right neighbour before down)
pub fn find_committing_swap(board: &Board) -> Option<(usize, usize)> {
    let mut scratch = board.clone();
    let unstable = !is_stable(board);

    (0..board.len()).find_map(|a| {
        forward_neighbors(board, a)
            .find(|&b| unstable || commits(&mut scratch, a, b))
            .map(|b| (a, b))
    })
}

/// Whether the player has any committing swap
pub fn has_moves(board: &Board) -> bool {
    find_committing_swap(board).is_some()
}

/// Right then down neighbour, so each pair is visited once
fn forward_neighbors(board: &Board, a: usize) -> impl Iterator<Item = usize> {
    board.neighbors(a).into_iter().filter(move |&b| b > a)
}

/// Try the swap on `scratch`, then put it back
fn commits(scratch: &mut Board, a: usize, b: usize) -> bool {
    if scratch.get(a) == scratch.get(b) {
        return false;
    }
    scratch.swap(a, b);
    let hit = has_match_at(scratch, a) || has_match_at(scratch, b);
    scratch.swap(a, b);
    hit
}
