//! Rendering of the live stroke preview and the recognized text.
//!
//! The capture core only talks to the [`Renderer`] trait. [`TerminalRenderer`]
//! draws both onto any `Write` sink with ANSI escape codes.

use std::io::Write;

use crate::raster::BoardPoint;

/// Output surface for the capture loop.
pub trait Renderer {
    /// Show the full recognized text.
    fn write(&mut self, text: &str);
    /// Show a live mark at a board-local position while writing.
    fn draw_mark(&mut self, point: BoardPoint);
}

/// Character-cell preview of the board plus a text line.
pub struct TerminalRenderer<W: Write> {
    out: W,
    board_side: usize,
    cols: usize,
    rows: usize,
    preview: Option<Vec<bool>>,
    text: String,
}

impl<W: Write> TerminalRenderer<W> {
    /// Create a renderer for a square board of `board_side` cells.
    ///
    /// The preview is `cols x rows` characters; pass `preview = false` to only print text.
    pub fn new(out: W, board_side: usize, cols: usize, rows: usize, preview: bool) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            out,
            board_side: board_side.max(1),
            cols,
            rows,
            preview: preview.then(|| vec![false; cols * rows]),
            text: String::new(),
        }
    }

    /// Consume the renderer and return the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn preview_cell(&self, point: BoardPoint) -> (usize, usize) {
        let col = (point.col * self.cols / self.board_side).min(self.cols - 1);
        let row = (point.row * self.rows / self.board_side).min(self.rows - 1);
        (col, row)
    }

    fn redraw(&mut self) {
        let mut output = String::new();

        if let Some(ref cells) = self.preview {
            output.push_str("\x1b[H\x1b[2J"); // Home + clear screen
            output.push('+');
            output.push_str(&"-".repeat(self.cols));
            output.push_str("+\n");
            for row in cells.chunks(self.cols) {
                output.push('|');
                output.extend(row.iter().map(|&on| if on { '#' } else { ' ' }));
                output.push_str("|\n");
            }
            output.push('+');
            output.push_str(&"-".repeat(self.cols));
            output.push_str("+\n");
            output.push_str(&format!("> {}\n", self.text));
        } else {
            output.push_str(&format!("\r\x1b[2K> {}", self.text));
        }

        if let Err(e) = self
            .out
            .write_all(output.as_bytes())
            .and_then(|_| self.out.flush())
        {
            log::warn!("Failed to render: {}", e);
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn write(&mut self, text: &str) {
        self.text = text.to_string();
        if let Some(ref mut cells) = self.preview {
            cells.fill(false);
        }
        self.redraw();
    }

    fn draw_mark(&mut self, point: BoardPoint) {
        let (col, row) = self.preview_cell(point);
        let cols = self.cols;
        let Some(ref mut cells) = self.preview else {
            return;
        };
        let cell = &mut cells[row * cols + col];
        if !*cell {
            *cell = true;
            self.redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(renderer: TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_text_only_mode() {
        let mut renderer = TerminalRenderer::new(Vec::new(), 100, 10, 5, false);
        renderer.write("12");
        renderer.draw_mark(BoardPoint { col: 5, row: 5 });
        let out = rendered(renderer);
        assert!(out.ends_with("> 12"));
        assert!(!out.contains('#'));
    }

    #[test]
    fn test_mark_maps_into_preview_grid() {
        let mut renderer = TerminalRenderer::new(Vec::new(), 100, 10, 5, true);
        // Bottom-right corner of the board lands in the last preview cell
        renderer.draw_mark(BoardPoint { col: 99, row: 99 });
        let out = rendered(renderer);
        assert!(out.contains("|         #|"));
    }

    #[test]
    fn test_repeated_mark_in_same_cell_redraws_once() {
        let mut renderer = TerminalRenderer::new(Vec::new(), 100, 10, 5, true);
        renderer.draw_mark(BoardPoint { col: 0, row: 0 });
        renderer.draw_mark(BoardPoint { col: 1, row: 1 });
        let out = rendered(renderer);
        assert_eq!(out.matches("\x1b[2J").count(), 1);
    }

    #[test]
    fn test_write_clears_preview() {
        let mut renderer = TerminalRenderer::new(Vec::new(), 100, 10, 5, true);
        renderer.draw_mark(BoardPoint { col: 50, row: 50 });
        renderer.write("7");
        let out = rendered(renderer);
        let last_frame = out.rsplit("\x1b[2J").next().unwrap();
        assert!(!last_frame.contains('#'));
        assert!(last_frame.contains("> 7"));
    }
}
