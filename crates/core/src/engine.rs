//! Engine module - swap resolution and cascade driving
//!
//! Ties the board, match detection, refill source and cascade state machine
//! together. The engine owns its board outright, so any number of engines
//! can run side by side.
//!
//! Two driving styles are supported:
//!
//! - **Synchronous**: [`Engine::attempt_swap`] validates, swaps, and runs the
//!   cascade to completion in one call.
//! - **Stepped**: [`Engine::begin_swap`] starts a cascade and
//!   [`Engine::step`] advances it one suspension point at a time, letting a
//!   presentation layer animate between steps.
//!
//! While a cascade is in flight the engine is busy: further swap requests
//! are rejected and the board is not reported as resting.

use tracing::{debug, trace};

use crate::board::Board;
use crate::cascade::{resolve_cascade, Cascade, CascadeEvent};
use crate::error::BoardError;
use crate::matcher::{find_matches, is_stable};
use crate::rng::{SimpleRng, TokenSource};
use crate::scoring::GameSession;
use crate::snapshot::EngineSnapshot;
use crate::types::{
    CascadeStep, RejectReason, SwapOutcome, DEFAULT_BOARD_SIZE, DEFAULT_KIND_COUNT,
    POINTS_PER_TILE,
};

/// Engine construction parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub size: usize,
    pub kind_count: u8,
    pub points_per_tile: u32,
    /// Resolve runs present on the fresh board before play (no points)
    pub settle_initial: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            kind_count: DEFAULT_KIND_COUNT,
            points_per_tile: POINTS_PER_TILE,
            settle_initial: false,
        }
    }
}

/// Full result of a synchronous swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapResult {
    Rejected(RejectReason),
    Reverted,
    Committed {
        swapped: (usize, usize),
        steps: Vec<CascadeStep>,
    },
}

impl SwapResult {
    pub fn outcome(&self) -> SwapOutcome {
        match self {
            SwapResult::Rejected(reason) => SwapOutcome::Rejected(*reason),
            SwapResult::Reverted => SwapOutcome::Reverted,
            SwapResult::Committed { .. } => SwapOutcome::Committed,
        }
    }

    /// Points awarded across every cascade round
    pub fn total_points(&self) -> u32 {
        match self {
            SwapResult::Committed { steps, .. } => steps.iter().map(|s| s.points).sum(),
            _ => 0,
        }
    }
}

/// Board simulation engine
#[derive(Debug, Clone)]
pub struct Engine<S = SimpleRng> {
    board: Board,
    kind_count: u8,
    points_per_tile: u32,
    source: S,
    /// In-flight cascade; `Some` means busy
    cascade: Option<Cascade>,
    /// Cells exchanged by the swap that started the current cascade
    last_swap: Option<(usize, usize)>,
    swaps_committed: u32,
}

impl Engine<SimpleRng> {
    /// Start a new game on a randomly filled board
    ///
    /// # Examples
    ///
    /// ```
    /// use match_three_core::Engine;
    ///
    /// let engine = Engine::new_game(8, 5, 12345).unwrap();
    /// assert_eq!(engine.board().len(), 64);
    /// assert!(engine.is_resting());
    /// ```
    pub fn new_game(size: usize, kind_count: u8, seed: u32) -> Result<Self, BoardError> {
        Self::with_config(
            EngineConfig {
                size,
                kind_count,
                ..EngineConfig::default()
            },
            seed,
        )
    }

    pub fn with_config(config: EngineConfig, seed: u32) -> Result<Self, BoardError> {
        Self::with_config_and_source(config, SimpleRng::new(seed))
    }
}

impl<S: TokenSource> Engine<S> {
    /// Start a new game drawing every token from `source`
    pub fn with_config_and_source(
        config: EngineConfig,
        mut source: S,
    ) -> Result<Self, BoardError> {
        let board = Board::random(config.size, config.kind_count, &mut source)?;
        let mut engine = Self::from_board(board, config.kind_count, source)?
            .with_points_per_tile(config.points_per_tile);
        if config.settle_initial {
            let rounds = engine.settle().len();
            debug!(rounds, "initial board settled");
        }
        Ok(engine)
    }

    /// Wrap an existing board
    ///
    /// Every token on the board must lie in `1..=kind_count`. Empty cells are
    /// allowed; swaps are refused until [`Engine::settle`] fills them.
    pub fn from_board(board: Board, kind_count: u8, source: S) -> Result<Self, BoardError> {
        Board::check_kind_count(board.size(), kind_count)?;
        if let Some((index, token)) = board
            .cells()
            .iter()
            .copied()
            .enumerate()
            .find_map(|(i, cell)| cell.filter(|t| t.kind() > kind_count).map(|t| (i, t)))
        {
            return Err(BoardError::KindOutOfRange {
                index,
                kind: token.kind(),
                kind_count,
            });
        }

        Ok(Self {
            board,
            kind_count,
            points_per_tile: POINTS_PER_TILE,
            source,
            cascade: None,
            last_swap: None,
            swaps_committed: 0,
        })
    }

    /// Override the per-tile point multiplier
    pub fn with_points_per_tile(mut self, points_per_tile: u32) -> Self {
        self.points_per_tile = points_per_tile;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn kind_count(&self) -> u8 {
        self.kind_count
    }

    pub fn points_per_tile(&self) -> u32 {
        self.points_per_tile
    }

    pub fn swaps_committed(&self) -> u32 {
        self.swaps_committed
    }

    /// Swap that started the cascade currently in flight
    pub fn pending_swap(&self) -> Option<(usize, usize)> {
        self.last_swap.filter(|_| self.is_busy())
    }

    /// A swap or cascade is still unresolved
    pub fn is_busy(&self) -> bool {
        self.cascade.is_some()
    }

    /// No cascade is in flight and the board holds no empty cells
    pub fn is_resting(&self) -> bool {
        !self.is_busy() && !self.board.has_empty()
    }

    /// Resting and free of matches
    pub fn is_stable(&self) -> bool {
        self.is_resting() && is_stable(&self.board)
    }

    /// Check a swap request without touching the board
    ///
    /// A board with holes counts as busy, cascade or not.
    pub fn validate_swap(&self, a: usize, b: usize) -> Result<(), RejectReason> {
        if !self.is_resting() {
            return Err(RejectReason::Busy);
        }
        if a == b {
            return Err(RejectReason::SameCell);
        }
        if !self.board.in_bounds(a) || !self.board.in_bounds(b) {
            return Err(RejectReason::OutOfBounds);
        }
        if !self.board.is_adjacent(a, b) {
            return Err(RejectReason::NotAdjacent);
        }
        Ok(())
    }

    /// Swap two cells and, on a match, start a cascade
    ///
    /// A committed swap leaves the engine busy until [`Engine::step`] reports
    /// [`CascadeEvent::Stable`]. A swap that makes no match is undone before
    /// returning.
    pub fn begin_swap(&mut self, a: usize, b: usize) -> SwapOutcome {
        if let Err(reason) = self.validate_swap(a, b) {
            trace!(a, b, reason = reason.as_str(), "swap rejected");
            return SwapOutcome::Rejected(reason);
        }

        self.board.swap(a, b);
        let matches = find_matches(&self.board);

        if matches.is_empty() {
            self.board.swap(a, b);
            trace!(a, b, "swap reverted");
            return SwapOutcome::Reverted;
        }

        trace!(a, b, matched = matches.len(), "swap committed");
        self.swaps_committed += 1;
        self.last_swap = Some((a, b));
        self.cascade = Some(Cascade::new(matches, self.points_per_tile));
        SwapOutcome::Committed
    }

    /// Advance the in-flight cascade to its next suspension point
    ///
    /// Returns `None` when nothing is in flight. The engine stops being busy
    /// as soon as the `Stable` event is returned.
    pub fn step(&mut self) -> Option<CascadeEvent> {
        let cascade = self.cascade.as_mut()?;
        let event = cascade.advance(&mut self.board, self.kind_count, &mut self.source);
        if matches!(event, None | Some(CascadeEvent::Stable { .. })) {
            self.cascade = None;
        }
        event
    }

    /// Validate, swap and resolve in a single call
    ///
    /// # Examples
    ///
    /// ```
    /// use match_three_core::{Board, Engine, SimpleRng, SwapResult};
    /// use match_three_core::types::RejectReason;
    ///
    /// let board = Board::from_kinds(3, &[1, 2, 3, 2, 3, 1, 3, 1, 2]).unwrap();
    /// let mut engine = Engine::from_board(board, 3, SimpleRng::new(1)).unwrap();
    ///
    /// assert_eq!(engine.attempt_swap(0, 8), SwapResult::Rejected(RejectReason::NotAdjacent));
    /// assert_eq!(engine.attempt_swap(0, 1), SwapResult::Reverted);
    /// ```
    pub fn attempt_swap(&mut self, a: usize, b: usize) -> SwapResult {
        match self.begin_swap(a, b) {
            SwapOutcome::Rejected(reason) => SwapResult::Rejected(reason),
            SwapOutcome::Reverted => SwapResult::Reverted,
            SwapOutcome::Committed => {
                let steps = self.finish_cascade();
                SwapResult::Committed {
                    swapped: (a, b),
                    steps,
                }
            }
        }
    }

    /// Run the in-flight cascade to completion
    pub fn finish_cascade(&mut self) -> Vec<CascadeStep> {
        let Some(mut cascade) = self.cascade.take() else {
            return Vec::new();
        };
        cascade.run(&mut self.board, self.kind_count, &mut self.source)
    }

    /// Resolve any runs or holes already on the board, without a swap
    ///
    /// Used to stabilise a fresh board. Returns the cascade rounds; callers
    /// decide whether they score.
    pub fn settle(&mut self) -> Vec<CascadeStep> {
        if self.is_busy() {
            return self.finish_cascade();
        }
        if self.board.has_empty() {
            self.board.collapse();
            self.board.refill(self.kind_count, &mut self.source);
        }
        let matches = find_matches(&self.board);
        resolve_cascade(
            &mut self.board,
            matches,
            self.kind_count,
            self.points_per_tile,
            &mut self.source,
        )
    }

    /// Capture a flat view of the engine and the caller's session
    pub fn snapshot(&self, session: &GameSession) -> EngineSnapshot {
        let mut out = EngineSnapshot::default();
        self.snapshot_into(session, &mut out);
        out
    }

    pub fn snapshot_into(&self, session: &GameSession, out: &mut EngineSnapshot) {
        out.size = self.board.size();
        out.kind_count = self.kind_count;
        out.board = self.board.to_u8_grid();
        out.busy = self.is_busy();
        out.stable = self.is_stable();
        out.swaps_committed = self.swaps_committed;
        out.score = session.score();
        out.level = session.level();
        out.progress = session.progress_percent();
        out.high_score = session.high_score();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceSource;
    use crate::types::{cell_to_u8, Token};

    #[rustfmt::skip]
    const QUIET: [u8; 16] = [
        1, 2, 3, 4,
        2, 3, 4, 1,
        3, 4, 1, 2,
        4, 1, 2, 3,
    ];

    fn kinds(board: &Board) -> Vec<u8> {
        board.cells().iter().copied().map(cell_to_u8).collect()
    }

    #[test]
    fn test_reject_reasons() {
        let board = Board::from_kinds(4, &QUIET).unwrap();
        let mut engine = Engine::from_board(board, 5, SimpleRng::new(1)).unwrap();

        assert_eq!(
            engine.begin_swap(3, 3),
            SwapOutcome::Rejected(RejectReason::SameCell)
        );
        assert_eq!(
            engine.begin_swap(3, 16),
            SwapOutcome::Rejected(RejectReason::OutOfBounds)
        );
        assert_eq!(
            engine.begin_swap(3, 4),
            SwapOutcome::Rejected(RejectReason::NotAdjacent)
        );
        assert_eq!(kinds(engine.board()), QUIET.to_vec());
    }

    #[test]
    fn test_reverted_swap_restores_board() {
        let board = Board::from_kinds(4, &QUIET).unwrap();
        let mut engine = Engine::from_board(board, 5, SimpleRng::new(1)).unwrap();

        assert_eq!(engine.begin_swap(0, 1), SwapOutcome::Reverted);
        assert_eq!(kinds(engine.board()), QUIET.to_vec());
        assert!(!engine.is_busy());
        assert_eq!(engine.swaps_committed(), 0);
    }

    #[test]
    fn test_busy_engine_rejects_second_swap() {
        #[rustfmt::skip]
        let board = Board::from_kinds(4, &[
            1, 1, 2, 1,
            2, 3, 4, 5,
            3, 4, 5, 2,
            4, 5, 2, 3,
        ]).unwrap();
        let source = SequenceSource::new(vec![3, 4, 5]);
        let mut engine = Engine::from_board(board, 5, source).unwrap();

        assert_eq!(engine.begin_swap(2, 3), SwapOutcome::Committed);
        assert!(engine.is_busy());
        assert_eq!(engine.pending_swap(), Some((2, 3)));
        assert_eq!(
            engine.begin_swap(8, 9),
            SwapOutcome::Rejected(RejectReason::Busy)
        );

        let removed = engine.step().unwrap();
        assert!(matches!(removed, CascadeEvent::Removed { ref indices, .. } if indices == &vec![0, 1, 2]));
        assert!(!engine.is_resting());

        assert!(matches!(engine.step(), Some(CascadeEvent::Settled { .. })));
        assert!(engine.is_busy());

        assert_eq!(engine.step(), Some(CascadeEvent::Stable { rounds: 1 }));
        assert!(!engine.is_busy());
        assert!(engine.is_stable());
        assert_eq!(engine.step(), None);
        assert_eq!(engine.pending_swap(), None);
    }

    #[test]
    fn test_attempt_swap_commits_and_scores() {
        #[rustfmt::skip]
        let board = Board::from_kinds(4, &[
            1, 1, 2, 1,
            2, 3, 4, 5,
            3, 4, 5, 2,
            4, 5, 2, 3,
        ]).unwrap();
        let source = SequenceSource::new(vec![3, 4, 5]);
        let mut engine = Engine::from_board(board, 5, source).unwrap();

        let result = engine.attempt_swap(2, 3);
        assert_eq!(result.outcome(), SwapOutcome::Committed);
        assert_eq!(result.total_points(), 30);
        match result {
            SwapResult::Committed { swapped, steps } => {
                assert_eq!(swapped, (2, 3));
                assert_eq!(steps.len(), 1);
                assert_eq!(steps[0].removed, vec![0, 1, 2]);
                assert_eq!(steps[0].combo, Token::new(1));
            }
            other => panic!("expected commit, got {:?}", other),
        }
        assert!(engine.is_stable());
        assert_eq!(&kinds(engine.board())[..4], &[3, 4, 5, 2]);
    }

    #[test]
    fn test_from_board_validates_kinds() {
        let board = Board::from_kinds(2, &[1, 2, 6, 1]).unwrap();
        let err = Engine::from_board(board.clone(), 5, SimpleRng::new(1)).unwrap_err();
        assert_eq!(
            err,
            BoardError::KindOutOfRange {
                index: 2,
                kind: 6,
                kind_count: 5
            }
        );
        assert_eq!(
            Engine::from_board(board, 0, SimpleRng::new(1)).unwrap_err(),
            BoardError::InvalidKindCount(0)
        );
    }

    #[test]
    fn test_single_kind_rejected_before_play() {
        let board = Board::from_kinds(3, &[1; 9]).unwrap();
        assert_eq!(
            Engine::from_board(board, 1, SimpleRng::new(1)).unwrap_err(),
            BoardError::TooFewKinds {
                size: 3,
                kind_count: 1
            }
        );
        assert_eq!(
            Engine::new_game(8, 1, 7).unwrap_err(),
            BoardError::TooFewKinds {
                size: 8,
                kind_count: 1
            }
        );

        let config = EngineConfig {
            kind_count: 1,
            settle_initial: true,
            ..EngineConfig::default()
        };
        assert!(Engine::with_config(config, 7).is_err());
    }

    #[test]
    fn test_holes_block_swaps_until_settled() {
        let board = Board::from_kinds(3, &[0, 2, 3, 2, 3, 1, 3, 1, 2]).unwrap();
        let mut engine = Engine::from_board(board, 3, SequenceSource::new(vec![1])).unwrap();

        assert_eq!(
            engine.attempt_swap(0, 1),
            SwapResult::Rejected(RejectReason::Busy)
        );
        assert_eq!(
            engine.attempt_swap(4, 5),
            SwapResult::Rejected(RejectReason::Busy)
        );
        assert_eq!(engine.board().get(0), Some(None));

        engine.settle();
        assert_eq!(engine.attempt_swap(4, 5), SwapResult::Reverted);
    }

    #[test]
    fn test_seeded_games_are_reproducible() {
        let mut a = Engine::new_game(8, 5, 4242).unwrap();
        let mut b = Engine::new_game(8, 5, 4242).unwrap();
        assert_eq!(a.board(), b.board());

        for (x, y) in [(0, 1), (9, 17), (30, 31), (40, 48)] {
            assert_eq!(a.attempt_swap(x, y), b.attempt_swap(x, y));
        }
        assert_eq!(a.board(), b.board());
    }

    #[test]
    fn test_settle_initial_produces_stable_board() {
        for seed in 1..20 {
            let config = EngineConfig {
                settle_initial: true,
                ..EngineConfig::default()
            };
            let engine = Engine::with_config(config, seed).unwrap();
            assert!(engine.is_stable(), "seed {}", seed);
        }
    }

    #[test]
    fn test_settle_fills_holes() {
        let board = Board::from_kinds(3, &[0, 2, 3, 2, 3, 1, 3, 1, 2]).unwrap();
        let mut engine = Engine::from_board(board, 3, SequenceSource::new(vec![1])).unwrap();
        assert!(!engine.is_resting());

        let steps = engine.settle();

        assert!(steps.is_empty());
        assert!(engine.is_stable());
        assert_eq!(kinds(engine.board())[0], 1);
    }

    #[test]
    fn test_snapshot_reflects_session() {
        let engine = Engine::new_game(4, 3, 9).unwrap();
        let mut session = GameSession::with_high_score(40);
        session.apply_points(30);

        let snap = engine.snapshot(&session);
        assert_eq!(snap.size, 4);
        assert_eq!(snap.kind_count, 3);
        assert_eq!(snap.board.len(), 4);
        assert_eq!(snap.score, 30);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.progress, 6);
        assert_eq!(snap.high_score, 40);
        assert!(!snap.busy);
    }
}
