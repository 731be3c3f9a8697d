//! Core engine module - pure, deterministic, and testable
//!
//! This crate contains the board simulation of a tile-matching puzzle: swap
//! validation, match detection, removal, gravity, refill and cascade
//! resolution. It has **no dependencies** on rendering, input or audio,
//! making it:
//!
//! - **Deterministic**: Same seed produces identical games (for replays and tests)
//! - **Testable**: Unit tests for every rule beside the code
//! - **Portable**: Runs headless, under a game loop, or behind any UI
//! - **Owned**: Each [`Engine`] owns its board; there is no global state
//!
//! # Module Structure
//!
//! - [`board`]: N×N grid with gravity and refill
//! - [`matcher`]: Row/column scan for runs of three or more
//! - [`cascade`]: Remove → settle → re-check state machine
//! - [`engine`]: Swap resolution, busy flag, stepping driver
//! - [`scoring`]: Points, progress ring and levels ([`GameSession`])
//! - [`hint`]: Search for a swap that would commit
//! - [`rng`]: Seedable token source
//! - [`snapshot`]: Flat view for renderers and event streams
//!
//! # Game Rules
//!
//! - **Swap**: Only edge-adjacent cells; a swap that makes no run is undone
//! - **Match**: Three or more identical tokens in a row or column
//! - **Score**: 10 points per removed tile
//! - **Cascade**: Tokens fall, empties refill from the top, repeat until stable
//! - **Level**: Progress `min(100, score / 500 * 100)`; 100% levels up and resets
//!
//! # Example
//!
//! ```
//! use match_three_core::{Engine, GameSession, SwapResult};
//!
//! let mut engine = Engine::new_game(8, 5, 12345).unwrap();
//! let mut session = GameSession::new();
//!
//! if let SwapResult::Committed { steps, .. } = engine.attempt_swap(0, 1) {
//!     for step in &steps {
//!         session.apply_step(step);
//!     }
//! }
//! assert!(!engine.is_busy());
//! ```
//!
//! # Stepping
//!
//! A presentation layer that animates each phase calls
//! [`Engine::begin_swap`](engine::Engine::begin_swap) and then
//! [`Engine::step`](engine::Engine::step) until it yields
//! [`CascadeEvent::Stable`](cascade::CascadeEvent::Stable).

pub mod board;
pub mod cascade;
pub mod engine;
pub mod error;
pub mod hint;
pub mod matcher;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use match_three_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use cascade::{resolve_cascade, Cascade, CascadeEvent};
pub use engine::{Engine, EngineConfig, SwapResult};
pub use error::BoardError;
pub use hint::{committing_swaps, find_committing_swap, has_moves};
pub use matcher::{find_matches, has_match_at, is_stable, MatchSet};
pub use rng::{SequenceSource, SimpleRng, TokenSource};
pub use scoring::{points_for_match, progress_for_score, GameSession, ScoreUpdate};
pub use snapshot::EngineSnapshot;
