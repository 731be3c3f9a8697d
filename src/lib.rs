//! Match-three (workspace facade crate).
//!
//! This package exposes `match_three::{core,types}` from the member crates under `crates/`,
//! plus the runner-side pieces: layered configuration and the line-delimited event stream.

pub mod config;
pub mod events;

pub use match_three_core as core;
pub use match_three_types as types;
