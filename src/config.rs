//! Runtime configuration for the headless runner.
//!
//! Values come from defaults, then environment variables, then command-line
//! flags, each layer overriding the previous one.
//!
//! # Environment Variables
//!
//! - `MATCH3_SIZE`: Board dimension (default: 8)
//! - `MATCH3_KINDS`: Number of token kinds (default: 5)
//! - `MATCH3_SEED`: RNG seed (default: random)
//! - `MATCH3_MOVES`: Maximum swaps to play (default: 50)
//! - `MATCH3_FORMAT`: `text` or `json` (default: text)
//!
//! # Flags
//!
//! `--size N`, `--kinds N`, `--seed N`, `--moves N`, `--json`, `--text`,
//! `--settle-initial`

use std::env;

use anyhow::{anyhow, bail, Result};

use crate::core::{Board, EngineConfig};
use crate::types::{DEFAULT_BOARD_SIZE, DEFAULT_KIND_COUNT, POINTS_PER_TILE};

/// Largest board the runner accepts
pub const MAX_BOARD_SIZE: usize = 64;

/// Output format for the event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" | "jsonl" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub size: usize,
    pub kind_count: u8,
    pub seed: Option<u32>,
    pub moves: u32,
    pub format: OutputFormat,
    pub settle_initial: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BOARD_SIZE,
            kind_count: DEFAULT_KIND_COUNT,
            seed: None,
            moves: 50,
            format: OutputFormat::Text,
            settle_initial: false,
        }
    }
}

fn parse_value<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| anyhow!("invalid value for {}: {}", name, value))
}

impl RunConfig {
    /// Defaults overridden by `MATCH3_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`RunConfig::from_env`] with an injectable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("MATCH3_SIZE") {
            config.size = parse_value("MATCH3_SIZE", &v)?;
        }
        if let Some(v) = lookup("MATCH3_KINDS") {
            config.kind_count = parse_value("MATCH3_KINDS", &v)?;
        }
        if let Some(v) = lookup("MATCH3_SEED").filter(|s| !s.trim().is_empty()) {
            config.seed = Some(parse_value("MATCH3_SEED", &v)?);
        }
        if let Some(v) = lookup("MATCH3_MOVES") {
            config.moves = parse_value("MATCH3_MOVES", &v)?;
        }
        if let Some(v) = lookup("MATCH3_FORMAT") {
            config.format = OutputFormat::from_str(&v)
                .ok_or_else(|| anyhow!("invalid value for MATCH3_FORMAT: {}", v))?;
        }

        Ok(config)
    }

    /// Apply command-line flags (program name already stripped)
    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        let mut i = 0usize;
        while i < args.len() {
            let flag = args[i].as_str();
            let mut value = || {
                i += 1;
                args.get(i)
                    .map(String::as_str)
                    .ok_or_else(|| anyhow!("missing value for {}", flag))
            };
            match flag {
                "--size" => self.size = parse_value(flag, value()?)?,
                "--kinds" => self.kind_count = parse_value(flag, value()?)?,
                "--seed" => self.seed = Some(parse_value(flag, value()?)?),
                "--moves" => self.moves = parse_value(flag, value()?)?,
                "--json" => self.format = OutputFormat::Json,
                "--text" => self.format = OutputFormat::Text,
                "--settle-initial" => self.settle_initial = true,
                other => bail!("unknown argument: {}", other),
            }
            i += 1;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 || self.size > MAX_BOARD_SIZE {
            bail!("board size must be in 1..={} (got {})", MAX_BOARD_SIZE, self.size);
        }
        Board::check_kind_count(self.size, self.kind_count)?;
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            size: self.size,
            kind_count: self.kind_count,
            points_per_tile: POINTS_PER_TILE,
            settle_initial: self.settle_initial,
        }
    }
}
