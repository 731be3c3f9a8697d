//! Headless match-three runner (default binary).
//!
//! Builds a board from `MATCH3_*` environment variables and flags, then plays
//! up to `--moves` swaps using the hint search, driving every cascade one
//! suspension point at a time. Events go to stdout as text or line-delimited
//! JSON; diagnostics go to stderr through `tracing` (filter with `RUST_LOG`).

use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use match_three::config::{OutputFormat, RunConfig};
use match_three::core::{find_committing_swap, CascadeEvent, Engine, GameSession};
use match_three::events::{EventBody, EventWriter};
use match_three::types::SwapOutcome;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = RunConfig::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    config.apply_args(&args)?;
    config.validate()?;

    let seed = config.seed.unwrap_or_else(rand::random::<u32>);
    info!(size = config.size, kinds = config.kind_count, seed, "starting");

    let stdout = io::stdout();
    let mut out = match config.format {
        OutputFormat::Json => Output::Json(EventWriter::new(stdout.lock())),
        OutputFormat::Text => Output::Text(stdout.lock()),
    };

    run(&config, seed, &mut out)?;
    out.flush()
}

fn run<W: Write>(config: &RunConfig, seed: u32, out: &mut Output<W>) -> Result<()> {
    let mut engine = Engine::with_config(config.engine_config(), seed)
        .context("failed to build board")?;
    let mut session = GameSession::new();

    out.emit(EventBody::Start {
        size: engine.board().size(),
        kind_count: engine.kind_count(),
        seed,
        board: engine.board().to_u8_grid(),
    })?;

    let mut reason = "move_limit";
    for turn in 0..config.moves {
        let Some((a, b)) = find_committing_swap(engine.board()) else {
            reason = "no_moves";
            break;
        };

        let outcome = engine.begin_swap(a, b);
        debug!(turn, a, b, outcome = outcome.as_str(), "swap");
        out.emit(EventBody::swap(a, b, outcome))?;
        if outcome != SwapOutcome::Committed {
            continue;
        }

        while let Some(event) = engine.step() {
            let points = match &event {
                CascadeEvent::Removed { points, .. } => Some(*points),
                _ => None,
            };
            out.emit(event.into())?;
            if let Some(points) = points {
                let update = session.apply_points(points);
                if update.level_up {
                    info!(level = update.level, score = update.score, "level up");
                }
                out.emit(EventBody::score(&update, session.high_score()))?;
            }
        }
    }

    let snapshot = engine.snapshot(&session);
    info!(
        score = snapshot.score,
        level = snapshot.level,
        swaps = snapshot.swaps_committed,
        reason,
        "finished"
    );
    out.emit(EventBody::finish(reason, &snapshot))
}

/// Where events end up
enum Output<W: Write> {
    Json(EventWriter<W>),
    Text(W),
}

impl<W: Write> Output<W> {
    fn emit(&mut self, body: EventBody) -> Result<()> {
        match self {
            Output::Json(writer) => writer.emit(body),
            Output::Text(w) => write_text(w, &body),
        }
    }

    fn flush(&mut self) -> Result<()> {
        match self {
            Output::Json(writer) => writer.flush(),
            Output::Text(w) => Ok(w.flush()?),
        }
    }
}

fn write_grid<W: Write>(w: &mut W, grid: &[Vec<u8>]) -> Result<()> {
    for row in grid {
        let line: Vec<String> = row
            .iter()
            .map(|&k| if k == 0 { ".".to_string() } else { k.to_string() })
            .collect();
        writeln!(w, "  {}", line.join(" "))?;
    }
    Ok(())
}

fn write_text<W: Write>(w: &mut W, body: &EventBody) -> Result<()> {
    match body {
        EventBody::Start {
            size,
            kind_count,
            seed,
            board,
        } => {
            writeln!(w, "new game {}x{} kinds={} seed={}", size, size, kind_count, seed)?;
            write_grid(w, board)?;
        }
        EventBody::Swap {
            a,
            b,
            outcome,
            reason,
        } => match reason {
            Some(reason) => writeln!(w, "swap {} <-> {}: {} ({})", a, b, outcome, reason)?,
            None => writeln!(w, "swap {} <-> {}: {}", a, b, outcome)?,
        },
        EventBody::Removed {
            indices,
            points,
            combo_name,
            ..
        } => writeln!(
            w,
            "  removed {} tiles (+{}) combo {}",
            indices.len(),
            points,
            combo_name.as_deref().unwrap_or("-")
        )?,
        EventBody::Settled { changes, refilled } => {
            writeln!(w, "  settled {} cells, refilled {}", changes.len(), refilled)?
        }
        EventBody::Score {
            score,
            level,
            progress,
            level_up,
            ..
        } => {
            let tag = if *level_up { " LEVEL UP" } else { "" };
            writeln!(w, "  score {} level {} progress {}%{}", score, level, progress, tag)?
        }
        EventBody::Stable { rounds } => writeln!(w, "  stable after {} round(s)", rounds)?,
        EventBody::Finish { reason, snapshot } => {
            writeln!(
                w,
                "finished ({}): score {} level {} high {} swaps {}",
                reason, snapshot.score, snapshot.level, snapshot.high_score, snapshot.swaps_committed
            )?;
            write_grid(w, &snapshot.board)?;
        }
    }
    Ok(())
}
