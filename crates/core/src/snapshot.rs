/// Flat, renderer-friendly view of an engine and its session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct EngineSnapshot {
    pub size: usize,
    pub kind_count: u8,
    /// Row-major kinds, 0 for empty
    pub board: Vec<Vec<u8>>,
    pub busy: bool,
    pub stable: bool,
    pub swaps_committed: u32,
    pub score: u32,
    pub level: u32,
    /// Floored progress percentage
    pub progress: u32,
    pub high_score: u32,
}

impl EngineSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Input may be accepted (no cascade in flight)
    pub fn playable(&self) -> bool {
        !self.busy
    }

    /// Kind at (row, col), 0 for empty or out of range
    pub fn kind_at(&self, row: usize, col: usize) -> u8 {
        self.board
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(0)
    }
}
