//! Cascade resolution - remove, settle, re-check until stable
//!
//! A cascade starts from a non-empty match set and loops:
//!
//! 1. **Removing**: matched cells become empty, points are awarded
//! 2. **Settling**: gravity compacts each column, then empties are refilled
//! 3. **Checking**: the refilled board is scanned; any match restarts at 1
//!
//! [`Cascade::advance`] stops after Removing and after Settling, which are the
//! two suspension points where a presentation layer may animate. Between
//! those points the board can hold empty cells and must not be treated as
//! stable. [`resolve_cascade`] runs the whole loop synchronously.
//!
//! The loop is driven only by the stability predicate. Refills can create
//! new runs, so there is no fixed bound on the number of rounds.

use tracing::debug;

use crate::board::Board;
use crate::matcher::{find_matches, MatchSet};
use crate::rng::TokenSource;
use crate::scoring::points_for_match;
use crate::types::{CascadeStep, CellChange, Token};

/// Event produced at each suspension point of a cascade
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeEvent {
    /// Matched cells were cleared
    Removed {
        indices: Vec<usize>,
        points: u32,
        combo: Option<Token>,
    },
    /// Gravity and refill ran; lists every cell whose content changed
    Settled {
        changes: Vec<CellChange>,
        refilled: usize,
    },
    /// No matches remain; the cascade is over
    Stable { rounds: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Removing(MatchSet),
    Settling,
    Checking,
    Done,
}

/// Stepwise cascade state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cascade {
    phase: Phase,
    rounds: u32,
    points_per_tile: u32,
}

impl Cascade {
    /// Start a cascade from an already detected match set
    ///
    /// An empty seed skips straight to the stability check.
    pub fn new(seed: MatchSet, points_per_tile: u32) -> Self {
        let phase = if seed.is_empty() {
            Phase::Checking
        } else {
            Phase::Removing(seed)
        };
        Self {
            phase,
            rounds: 0,
            points_per_tile,
        }
    }

    /// Removal rounds completed so far
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Run until the next suspension point
    ///
    /// Returns `None` once the cascade has reported [`CascadeEvent::Stable`].
    pub fn advance(
        &mut self,
        board: &mut Board,
        kind_count: u8,
        source: &mut impl TokenSource,
    ) -> Option<CascadeEvent> {
        loop {
            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Removing(matches) => {
                    if matches.is_empty() {
                        self.phase = Phase::Checking;
                        continue;
                    }
                    self.phase = Phase::Settling;
                    return Some(self.remove(board, matches));
                }
                Phase::Settling => {
                    self.phase = Phase::Checking;
                    return Some(settle(board, kind_count, source));
                }
                Phase::Checking => {
                    let matches = find_matches(board);
                    if matches.is_empty() {
                        debug!(rounds = self.rounds, "cascade settled");
                        return Some(CascadeEvent::Stable {
                            rounds: self.rounds,
                        });
                    }
                    self.phase = Phase::Removing(matches);
                }
                Phase::Done => return None,
            }
        }
    }

    /// Advance to the end, pairing each removal with the settle after it
    pub fn run(
        &mut self,
        board: &mut Board,
        kind_count: u8,
        source: &mut impl TokenSource,
    ) -> Vec<CascadeStep> {
        let mut steps = Vec::new();
        let mut pending: Option<CascadeStep> = None;

        while let Some(event) = self.advance(board, kind_count, source) {
            match event {
                CascadeEvent::Removed {
                    indices,
                    points,
                    combo,
                } => {
                    steps.extend(pending.take());
                    pending = Some(CascadeStep {
                        removed: indices,
                        points,
                        combo,
                        changes: Vec::new(),
                    });
                }
                CascadeEvent::Settled { changes, .. } => {
                    if let Some(step) = pending.as_mut() {
                        step.changes = changes;
                    }
                }
                CascadeEvent::Stable { .. } => break,
            }
        }

        steps.extend(pending);
        steps
    }

    fn remove(&mut self, board: &mut Board, matches: MatchSet) -> CascadeEvent {
        // Lowest index decides the combo kind.
        let combo = matches
            .first()
            .and_then(|&i| board.get(i))
            .flatten();

        for &i in &matches {
            board.set(i, None);
        }

        self.rounds += 1;
        let points = points_for_match(matches.len(), self.points_per_tile);
        debug!(
            round = self.rounds,
            removed = matches.len(),
            points,
            "cascade removal"
        );

        CascadeEvent::Removed {
            indices: matches.into_iter().collect(),
            points,
            combo,
        }
    }
}

fn settle(board: &mut Board, kind_count: u8, source: &mut impl TokenSource) -> CascadeEvent {
    let before = board.cells().to_vec();
    board.collapse();
    let refilled = board.refill(kind_count, source).len();

    let changes = board
        .cells()
        .iter()
        .zip(&before)
        .enumerate()
        .filter(|(_, (now, was))| now != was)
        .map(|(index, (&cell, _))| CellChange { index, cell })
        .collect();

    CascadeEvent::Settled { changes, refilled }
}

/// Drive a cascade to completion, collecting one step per removal round
pub fn resolve_cascade(
    board: &mut Board,
    seed: MatchSet,
    kind_count: u8,
    points_per_tile: u32,
    source: &mut impl TokenSource,
) -> Vec<CascadeStep> {
    Cascade::new(seed, points_per_tile).run(board, kind_count, source)
}
