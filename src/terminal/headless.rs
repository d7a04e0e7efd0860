use std::io;

use super::Terminal;
use crate::geometry::{Position, Size};
use crate::style::Color;

/// A single character cell with the colors it was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            foreground: None,
            background: None,
        }
    }
}

/// In-memory terminal with autowrap and scrolling, used to run sessions
/// without a TTY.
///
/// Writing into the last column leaves the cursor in a pending-wrap state the
/// way xterm does: the wrap happens only when the next printable character
/// arrives, and any explicit cursor move cancels it.
#[derive(Debug, Clone)]
pub struct VirtualTerminal {
    width: u16,
    rows: Vec<Vec<Cell>>,
    cursor: Position,
    pending_wrap: bool,
    foreground: Option<Color>,
    background: Option<Color>,
    cursor_visible: bool,
    redirected: bool,
    max_height: Option<u16>,
    scrollback: Vec<String>,
}

impl VirtualTerminal {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            rows: vec![blank_row(width); usize::from(height)],
            cursor: Position::default(),
            pending_wrap: false,
            foreground: None,
            background: None,
            cursor_visible: true,
            redirected: false,
            max_height: None,
            scrollback: Vec::new(),
        }
    }

    /// Report output as redirected, as a pipe or file would.
    pub fn redirected(mut self) -> Self {
        self.redirected = true;
        self
    }

    /// Allow the buffer to grow up to `max_height` rows on request.
    pub fn with_growable_buffer(mut self, max_height: u16) -> Self {
        self.max_height = Some(max_height);
        self
    }

    pub fn height(&self) -> u16 {
        self.rows.len() as u16
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn cell(&self, column: u16, row: u16) -> Option<&Cell> {
        self.rows
            .get(usize::from(row))
            .and_then(|cells| cells.get(usize::from(column)))
    }

    /// Full row contents including trailing blanks.
    pub fn row_text(&self, row: u16) -> String {
        self.rows
            .get(usize::from(row))
            .map(|cells| cells.iter().map(|cell| cell.ch).collect())
            .unwrap_or_default()
    }

    /// Row contents with trailing blanks removed.
    pub fn line(&self, row: u16) -> String {
        self.row_text(row).trim_end().to_string()
    }

    /// All visible rows, trailing blanks removed.
    pub fn lines(&self) -> Vec<String> {
        (0..self.height()).map(|row| self.line(row)).collect()
    }

    /// Rows that scrolled off the top, oldest first.
    pub fn scrollback(&self) -> &[String] {
        &self.scrollback
    }

    fn put_char(&mut self, ch: char) {
        match ch {
            '\n' => self.linefeed(),
            '\r' => {
                self.pending_wrap = false;
                self.cursor.column = 0;
            }
            _ => self.print(ch),
        }
    }

    fn print(&mut self, ch: char) {
        if self.width == 0 || self.rows.is_empty() {
            return;
        }
        if self.pending_wrap {
            self.linefeed();
        }

        let cell = Cell {
            ch,
            foreground: self.foreground,
            background: self.background,
        };
        let Position { column, row } = self.cursor;
        if let Some(slot) = self.rows[usize::from(row)].get_mut(usize::from(column)) {
            *slot = cell;
        }

        if column + 1 >= self.width {
            self.pending_wrap = true;
        } else {
            self.cursor.column += 1;
        }
    }

    fn linefeed(&mut self) {
        self.pending_wrap = false;
        self.cursor.column = 0;
        if self.cursor.row + 1 >= self.height() {
            self.scroll_up();
        } else {
            self.cursor.row += 1;
        }
    }

    fn scroll_up(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let top = self.rows.remove(0);
        let text: String = top.iter().map(|cell| cell.ch).collect();
        self.scrollback.push(text.trim_end().to_string());
        self.rows.push(blank_row(self.width));
    }
}

fn blank_row(width: u16) -> Vec<Cell> {
    vec![Cell::default(); usize::from(width)]
}

impl Terminal for VirtualTerminal {
    fn size(&self) -> io::Result<Size> {
        Ok(Size::new(self.width, self.height()))
    }

    fn cursor_position(&mut self) -> io::Result<Position> {
        Ok(self.cursor)
    }

    fn set_cursor_position(&mut self, position: Position) -> io::Result<()> {
        self.pending_wrap = false;
        self.cursor = Position::new(
            position.column.min(self.width.saturating_sub(1)),
            position.row.min(self.height().saturating_sub(1)),
        );
        Ok(())
    }

    fn is_redirected(&self) -> bool {
        self.redirected
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        text.chars().for_each(|ch| self.put_char(ch));
        Ok(())
    }

    fn set_foreground(&mut self, color: Color) -> io::Result<()> {
        self.foreground = Some(color);
        Ok(())
    }

    fn set_background(&mut self, color: Color) -> io::Result<()> {
        self.background = Some(color);
        Ok(())
    }

    fn reset_colors(&mut self) -> io::Result<()> {
        self.foreground = None;
        self.background = None;
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        self.cursor_visible = visible;
        Ok(())
    }

    fn grow_buffer_height(&mut self, height: u16) -> io::Result<bool> {
        match self.max_height {
            Some(max) if height > self.height() && height <= max => {
                let extra = usize::from(height - self.height());
                self.rows
                    .extend(std::iter::repeat_n(blank_row(self.width), extra));
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
