//! Event stream encoding - line-delimited JSON for UI layers
//!
//! Every message is one JSON object per line with a `type` discriminator and
//! a monotonically increasing `seq`:
//!
//! ```text
//! {"type":"start","seq":1,"size":8,"kind_count":5,"seed":42,"board":[[...],...]}
//! {"type":"swap","seq":2,"a":10,"b":11,"outcome":"committed","reason":null}
//! {"type":"removed","seq":3,"indices":[9,10,11],"points":30,"combo":2,"combo_name":"blue"}
//! {"type":"settled","seq":4,"changes":[{"index":1,"kind":3},...],"refilled":3}
//! {"type":"score","seq":5,"score":30,"level":1,"progress":6,"level_up":false,"high_score":30}
//! {"type":"stable","seq":6,"rounds":1}
//! {"type":"finish","seq":7,"reason":"no_moves","snapshot":{...}}
//! ```

use std::io::Write;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::{CascadeEvent, EngineSnapshot, ScoreUpdate};
use crate::types::{cell_to_u8, CellChange, SwapOutcome};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeMessage {
    pub index: usize,
    /// 0 for empty
    pub kind: u8,
}

impl From<CellChange> for ChangeMessage {
    fn from(value: CellChange) -> Self {
        Self {
            index: value.index,
            kind: cell_to_u8(value.cell),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMessage {
    pub size: usize,
    pub kind_count: u8,
    pub board: Vec<Vec<u8>>,
    pub busy: bool,
    pub stable: bool,
    pub swaps_committed: u32,
    pub score: u32,
    pub level: u32,
    pub progress: u32,
    pub high_score: u32,
}

impl From<&EngineSnapshot> for SnapshotMessage {
    fn from(s: &EngineSnapshot) -> Self {
        Self {
            size: s.size,
            kind_count: s.kind_count,
            board: s.board.clone(),
            busy: s.busy,
            stable: s.stable,
            swaps_committed: s.swaps_committed,
            score: s.score,
            level: s.level,
            progress: s.progress,
            high_score: s.high_score,
        }
    }
}

/// Message body, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventBody {
    Start {
        size: usize,
        kind_count: u8,
        seed: u32,
        board: Vec<Vec<u8>>,
    },
    Swap {
        a: usize,
        b: usize,
        outcome: String,
        reason: Option<String>,
    },
    Removed {
        indices: Vec<usize>,
        points: u32,
        combo: Option<u8>,
        combo_name: Option<String>,
    },
    Settled {
        changes: Vec<ChangeMessage>,
        refilled: usize,
    },
    Score {
        score: u32,
        level: u32,
        progress: u32,
        level_up: bool,
        high_score: u32,
    },
    Stable {
        rounds: u32,
    },
    Finish {
        reason: String,
        snapshot: SnapshotMessage,
    },
}

impl EventBody {
    pub fn swap(a: usize, b: usize, outcome: SwapOutcome) -> Self {
        let reason = match outcome {
            SwapOutcome::Rejected(reason) => Some(reason.as_str().to_string()),
            _ => None,
        };
        EventBody::Swap {
            a,
            b,
            outcome: outcome.as_str().to_string(),
            reason,
        }
    }

    pub fn score(update: &ScoreUpdate, high_score: u32) -> Self {
        EventBody::Score {
            score: update.score,
            level: update.level,
            progress: update.progress.floor() as u32,
            level_up: update.level_up,
            high_score,
        }
    }

    pub fn finish(reason: &str, snapshot: &EngineSnapshot) -> Self {
        EventBody::Finish {
            reason: reason.to_string(),
            snapshot: snapshot.into(),
        }
    }
}

impl From<CascadeEvent> for EventBody {
    fn from(event: CascadeEvent) -> Self {
        match event {
            CascadeEvent::Removed {
                indices,
                points,
                combo,
            } => EventBody::Removed {
                indices,
                points,
                combo: combo.map(|t| t.kind()),
                combo_name: combo.map(|t| t.name().to_string()),
            },
            CascadeEvent::Settled { changes, refilled } => EventBody::Settled {
                changes: changes.into_iter().map(ChangeMessage::from).collect(),
                refilled,
            },
            CascadeEvent::Stable { rounds } => EventBody::Stable { rounds },
        }
    }
}

/// One line on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMessage {
    pub seq: u64,
    #[serde(flatten)]
    pub body: EventBody,
}

/// Numbers and writes messages, one JSON object per line
pub struct EventWriter<W: Write> {
    out: W,
    seq: u64,
}

impl<W: Write> EventWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, seq: 0 }
    }

    /// Sequence number of the last message written
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn emit(&mut self, body: EventBody) -> Result<()> {
        self.seq += 1;
        let msg = EventMessage {
            seq: self.seq,
            body,
        };
        serde_json::to_writer(&mut self.out, &msg)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
