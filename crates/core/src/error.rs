//! Construction errors.
//!
//! Swaps and cascades never fail; bad requests surface as
//! [`SwapOutcome::Rejected`](crate::types::SwapOutcome). Only building a board
//! from caller-supplied dimensions or cells can go wrong.

/// Errors raised when a board or engine is built from invalid input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board size must be at least 1 (got {0})")]
    InvalidSize(usize),

    #[error("kind count must be at least 1 (got {0})")]
    InvalidKindCount(u8),

    /// With a single kind every refill rebuilds a run, so a cascade never ends.
    #[error("a {size}x{size} board needs at least 2 kinds (got {kind_count})")]
    TooFewKinds { size: usize, kind_count: u8 },

    #[error("expected {expected} cells for the board, got {actual}")]
    CellCount { expected: usize, actual: usize },

    #[error("cell {index} holds kind {kind}, outside 1..={kind_count}")]
    KindOutOfRange {
        index: usize,
        kind: u8,
        kind_count: u8,
    },
}
