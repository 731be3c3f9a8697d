//! Board module - manages the token grid
//!
//! The board is a square N×N grid where each cell is empty or holds a token.
//! Uses a flat vector in row-major order: index `i` is row `i / size`,
//! column `i % size`. The dimension is fixed at construction.
//!
//! Gravity and refill report the indices they touched so a renderer can stay
//! in sync without diffing the whole grid.

use arrayvec::ArrayVec;

use crate::error::BoardError;
use crate::rng::TokenSource;
use crate::types::{cell_to_u8, Cell, Token, MIN_RUN};

/// The game board - `size` columns x `size` rows using flat storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    /// Flat array of cells, row-major order (row * size + col)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new all-empty board
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if size == 0 {
            return Err(BoardError::InvalidSize(size));
        }
        Ok(Self {
            size,
            cells: vec![None; size * size],
        })
    }

    /// Create a board with every cell drawn uniformly from `1..=kind_count`
    ///
    /// Runs that happen to form at creation are left in place.
    pub fn random(
        size: usize,
        kind_count: u8,
        source: &mut impl TokenSource,
    ) -> Result<Self, BoardError> {
        Self::check_kind_count(size, kind_count)?;
        let mut board = Self::new(size)?;
        for cell in &mut board.cells {
            *cell = Some(source.draw(kind_count));
        }
        Ok(board)
    }

    /// Check that `kind_count` can drive play on a `size`×`size` board
    ///
    /// Zero kinds is never valid. One kind is only valid while no run of
    /// three fits, since otherwise refills keep recreating runs.
    pub fn check_kind_count(size: usize, kind_count: u8) -> Result<(), BoardError> {
        match kind_count {
            0 => Err(BoardError::InvalidKindCount(kind_count)),
            1 if size >= MIN_RUN => Err(BoardError::TooFewKinds { size, kind_count }),
            _ => Ok(()),
        }
    }

    /// Create from a flat row-major list of cells
    pub fn from_cells(size: usize, cells: Vec<Cell>) -> Result<Self, BoardError> {
        if size == 0 {
            return Err(BoardError::InvalidSize(size));
        }
        let expected = size * size;
        if cells.len() != expected {
            return Err(BoardError::CellCount {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }

    /// Create from numeric kinds, 0 meaning empty
    ///
    /// # Examples
    ///
    /// ```
    /// use match_three_core::Board;
    ///
    /// let board = Board::from_kinds(3, &[1, 2, 3, 4, 5, 1, 2, 3, 0]).unwrap();
    /// assert_eq!(board.get(4).flatten().map(|t| t.kind()), Some(5));
    /// assert_eq!(board.get(8), Some(None));
    /// ```
    pub fn from_kinds(size: usize, kinds: &[u8]) -> Result<Self, BoardError> {
        Self::from_cells(size, kinds.iter().map(|&k| Token::new(k)).collect())
    }

    /// Board dimension (rows == columns)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells (`size * size`)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(row * self.size + col)
    }

    /// Split a flat index into (row, col)
    #[inline(always)]
    pub fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    /// Check if index addresses a cell
    pub fn in_bounds(&self, index: usize) -> bool {
        index < self.cells.len()
    }

    /// Get cell at index
    /// Returns None if out of bounds
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Set cell at index
    /// Returns false if out of bounds
    pub fn set(&mut self, index: usize, cell: Cell) -> bool {
        match self.cells.get_mut(index) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Check whether two cells share an edge
    ///
    /// Symmetric; false for identical or out-of-range indices.
    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        if !self.in_bounds(a) || !self.in_bounds(b) {
            return false;
        }
        let (r1, c1) = self.row_col(a);
        let (r2, c2) = self.row_col(b);
        (r1 == r2 && c1.abs_diff(c2) == 1) || (c1 == c2 && r1.abs_diff(r2) == 1)
    }

    /// Edge neighbours of a cell in up, left, right, down order
    pub fn neighbors(&self, index: usize) -> ArrayVec<usize, 4> {
        let mut out = ArrayVec::new();
        if !self.in_bounds(index) {
            return out;
        }
        let (row, col) = self.row_col(index);
        if row > 0 {
            out.push(index - self.size);
        }
        if col > 0 {
            out.push(index - 1);
        }
        if col + 1 < self.size {
            out.push(index + 1);
        }
        if row + 1 < self.size {
            out.push(index + self.size);
        }
        out
    }

    /// Exchange the contents of two cells
    /// Returns false if either index is out of bounds
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if !self.in_bounds(a) || !self.in_bounds(b) {
            return false;
        }
        self.cells.swap(a, b);
        true
    }

    /// Number of cells holding a token
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Check if any cell is empty
    pub fn has_empty(&self) -> bool {
        self.cells.iter().any(|cell| cell.is_none())
    }

    /// Apply gravity: compact each column's tokens downward
    ///
    /// Tokens keep their relative order within a column; empties rise to the
    /// top. Returns the mutated indices in ascending order.
    pub fn collapse(&mut self) -> Vec<usize> {
        let size = self.size;
        let mut changed = Vec::new();

        for col in 0..size {
            let mut empty = 0;
            // Scan from bottom to top
            for row in (0..size).rev() {
                let i = row * size + col;
                match self.cells[i] {
                    None => empty += 1,
                    Some(_) if empty > 0 => {
                        let target = i + empty * size;
                        let token = self.cells[i].take();
                        self.cells[target] = token;
                        changed.push(target);
                        changed.push(i);
                    }
                    Some(_) => {}
                }
            }
        }

        changed.sort_unstable();
        changed.dedup();
        changed
    }

    /// Fill every empty cell with a fresh token
    ///
    /// Walks columns left to right, rows top to bottom, so a scripted source
    /// is consumed in a predictable order. Returns the filled indices in
    /// ascending order.
    pub fn refill(&mut self, kind_count: u8, source: &mut impl TokenSource) -> Vec<usize> {
        let size = self.size;
        let mut filled = Vec::new();

        for col in 0..size {
            for row in 0..size {
                let i = row * size + col;
                if self.cells[i].is_none() {
                    self.cells[i] = Some(source.draw(kind_count));
                    filled.push(i);
                }
            }
        }

        filled.sort_unstable();
        filled
    }

    /// Get a reference to the internal cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy one row out of the board
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        if row >= self.size {
            return None;
        }
        let start = row * self.size;
        Some(&self.cells[start..start + self.size])
    }

    /// Convert to 2D vector for display/testing
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.size).map(<[Cell]>::to_vec).collect()
    }

    /// Numeric grid, 0 for empty cells
    pub fn to_u8_grid(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().copied().map(cell_to_u8).collect())
            .collect()
    }

    /// Largest kind present on the board, 0 if none
    pub fn max_kind(&self) -> u8 {
        self.cells
            .iter()
            .copied()
            .map(cell_to_u8)
            .max()
            .unwrap_or(0)
    }
}
