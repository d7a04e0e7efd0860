use std::io::{self, IsTerminal, Stdout, Write};

use crossterm::cursor::{self, Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal;

use super::Terminal;
use crate::geometry::{Position, Size};
use crate::style::Color;

/// Real terminal backend. Commands are queued on `out` and sent on flush.
pub struct CrosstermTerminal<W: Write> {
    out: W,
    redirected: bool,
}

impl CrosstermTerminal<Stdout> {
    /// Backend over the process stdout, detecting redirection up front.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let redirected = !out.is_terminal();
        Self { out, redirected }
    }
}

impl<W: Write> CrosstermTerminal<W> {
    pub fn new(out: W, redirected: bool) -> Self {
        Self { out, redirected }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Terminal for CrosstermTerminal<W> {
    fn size(&self) -> io::Result<Size> {
        let (width, height) = terminal::size()?;
        Ok(Size::new(width, height))
    }

    fn cursor_position(&mut self) -> io::Result<Position> {
        // Pending moves must land before the terminal reports its cursor.
        self.out.flush()?;
        let (column, row) = cursor::position()?;
        Ok(Position::new(column, row))
    }

    fn set_cursor_position(&mut self, position: Position) -> io::Result<()> {
        queue!(self.out, MoveTo(position.column, position.row))
    }

    fn is_redirected(&self) -> bool {
        self.redirected
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text))
    }

    fn set_foreground(&mut self, color: Color) -> io::Result<()> {
        queue!(self.out, SetForegroundColor(color))
    }

    fn set_background(&mut self, color: Color) -> io::Result<()> {
        queue!(self.out, SetBackgroundColor(color))
    }

    fn reset_colors(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor)
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        if visible {
            queue!(self.out, Show)
        } else {
            queue!(self.out, Hide)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
