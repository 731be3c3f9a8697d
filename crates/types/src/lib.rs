//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (engine logic, event encoding, a renderer).
//!
//! # Board Geometry
//!
//! The board is an N×N grid stored row-major:
//!
//! - **Size**: 8 columns by 8 rows by default
//! - **Index**: `i` maps to row `i / size`, column `i % size`
//! - **Kinds**: 5 token kinds by default, numbered `1..=5`
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_RUN` | 3 | Shortest same-kind run that counts as a match |
//! | `POINTS_PER_TILE` | 10 | Points per removed tile |
//! | `LEVEL_THRESHOLD` | 500 | Score at which progress reaches 100% |
//!
//! # Examples
//!
//! ```
//! use match_three_types::{Token, DEFAULT_BOARD_SIZE, DEFAULT_KIND_COUNT};
//!
//! let red = Token::new(1).unwrap();
//! assert_eq!(red.name(), "red");
//! assert_eq!(Token::new(0), None);
//!
//! assert_eq!(DEFAULT_BOARD_SIZE, 8);
//! assert_eq!(DEFAULT_KIND_COUNT, 5);
//! ```

/// Default board dimension (8×8)
pub const DEFAULT_BOARD_SIZE: usize = 8;

/// Default number of distinct token kinds
pub const DEFAULT_KIND_COUNT: u8 = 5;

/// Shortest run of identical tokens that forms a match
pub const MIN_RUN: usize = 3;

/// Points awarded per removed tile
pub const POINTS_PER_TILE: u32 = 10;

/// Cumulative score at which the progress ring is full
pub const LEVEL_THRESHOLD: u32 = 500;

/// Level a fresh session starts at
pub const STARTING_LEVEL: u32 = 1;

/// Names of the five default kinds, indexed by `kind - 1`
pub const KIND_NAMES: [&str; 5] = ["red", "blue", "purple", "green", "yellow"];

/// A non-empty token kind in `1..=K`
///
/// Tokens carry no identity beyond their kind: two tokens of the same kind
/// are interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(u8);

impl Token {
    /// Lowest valid kind
    pub const MIN: Token = Token(1);

    /// Create a token of the given kind
    ///
    /// Returns `None` for kind 0, which is reserved for the empty cell.
    ///
    /// # Examples
    ///
    /// ```
    /// use match_three_types::Token;
    ///
    /// assert_eq!(Token::new(3).map(|t| t.kind()), Some(3));
    /// assert_eq!(Token::new(0), None);
    /// ```
    pub const fn new(kind: u8) -> Option<Self> {
        if kind == 0 {
            None
        } else {
            Some(Self(kind))
        }
    }

    /// Numeric kind (always >= 1)
    pub const fn kind(self) -> u8 {
        self.0
    }

    /// Lowercase colour name for the default kinds, `"kind"` beyond them
    pub fn name(self) -> &'static str {
        KIND_NAMES
            .get(self.0 as usize - 1)
            .copied()
            .unwrap_or("kind")
    }

    /// Parse a kind from its colour name or number (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use match_three_types::Token;
    ///
    /// assert_eq!(Token::from_str("Blue"), Token::new(2));
    /// assert_eq!(Token::from_str("7"), Token::new(7));
    /// assert_eq!(Token::from_str("0"), None);
    /// assert_eq!(Token::from_str("mauve"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        if let Some(pos) = KIND_NAMES.iter().position(|name| *name == lower) {
            return Self::new(pos as u8 + 1);
        }
        lower.parse::<u8>().ok().and_then(Self::new)
    }
}

/// A cell on the board
///
/// - `None`: Empty cell (only exists transiently while a cascade runs)
/// - `Some(Token)`: Cell holding a token of that kind
pub type Cell = Option<Token>;

/// Encode a cell as its numeric kind, 0 for empty
pub fn cell_to_u8(cell: Cell) -> u8 {
    cell.map_or(0, Token::kind)
}

/// Why a swap request was refused without touching the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Both indices name the same cell
    SameCell,
    /// An index lies outside the board
    OutOfBounds,
    /// The cells do not share an edge
    NotAdjacent,
    /// A swap or cascade is still being resolved
    Busy,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::SameCell => "same_cell",
            RejectReason::OutOfBounds => "out_of_bounds",
            RejectReason::NotAdjacent => "not_adjacent",
            RejectReason::Busy => "busy",
        }
    }
}

/// Result of a swap request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapOutcome {
    /// The swap produced a match and a cascade was started
    Committed,
    /// The swap produced no match and was undone
    Reverted,
    /// The request was refused; the board is untouched
    Rejected(RejectReason),
}

impl SwapOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapOutcome::Committed => "committed",
            SwapOutcome::Reverted => "reverted",
            SwapOutcome::Rejected(_) => "rejected",
        }
    }
}

/// New content of one board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellChange {
    pub index: usize,
    pub cell: Cell,
}

/// One removal round of a cascade, as reported to a renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeStep {
    /// Removed indices, ascending
    pub removed: Vec<usize>,
    /// Points awarded for this round
    pub points: u32,
    /// Kind of the lowest removed index (drives the combo popup)
    pub combo: Option<Token>,
    /// Cells whose content changed during gravity and refill, ascending
    pub changes: Vec<CellChange>,
}
