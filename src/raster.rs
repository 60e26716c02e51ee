//! Binary raster board that strokes are drawn onto.

use std::fmt;

/// A cell position on a board, column first (x) then row (y). Row 0 is the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardPoint {
    pub col: usize,
    pub row: usize,
}

/// Fixed-size 2D grid of 0/1 cells in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBoard {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

impl RasterBoard {
    /// Create an all-zero board.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    /// Create an all-zero square board.
    pub fn square(side: usize) -> Self {
        Self::new(side, side)
    }

    /// Parse a text raster: one row per line, `#` or `1` marked, `.`, `0` or space unmarked.
    ///
    /// Blank lines are skipped. Rows shorter than the widest row are padded with zeros.
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .collect();
        let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let mut board = Self::new(lines.len(), cols);
        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if matches!(ch, '#' | '1') {
                    board.set(row, col);
                }
            }
        }
        board
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Raw cells, row-major.
    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    /// Value at (row, col), or 0 outside the grid.
    pub fn get(&self, row: usize, col: usize) -> u8 {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col]
        } else {
            0
        }
    }

    /// Mark a single cell. Out-of-range positions are ignored.
    pub fn set(&mut self, row: usize, col: usize) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = 1;
        }
    }

    /// Reset every cell to 0.
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Number of marked cells.
    pub fn marked(&self) -> usize {
        self.cells.iter().map(|&c| c as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == 0)
    }

    /// Mark a filled disk of `radius` cells around `center`, clipped to the grid.
    ///
    /// Returns the number of cells that changed from 0 to 1.
    pub fn stamp_disk(&mut self, center: BoardPoint, radius: usize) -> usize {
        let r = radius as i64;
        let (cr, cc) = (center.row as i64, center.col as i64);
        let mut changed = 0;

        let row_lo = (cr - r).max(0);
        let row_hi = (cr + r).min(self.rows as i64 - 1);
        let col_lo = (cc - r).max(0);
        let col_hi = (cc + r).min(self.cols as i64 - 1);

        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                let (dr, dc) = (row - cr, col - cc);
                if dr * dr + dc * dc <= r * r {
                    let idx = row as usize * self.cols + col as usize;
                    if self.cells[idx] == 0 {
                        self.cells[idx] = 1;
                        changed += 1;
                    }
                }
            }
        }

        changed
    }
}

impl fmt::Display for RasterBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let ch = if self.get(row, col) == 1 { '#' } else { '.' };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
