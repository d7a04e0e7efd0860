//! Terminal capability consumed by the renderer and the line interleaver.
//!
//! The bar never touches global console state directly. Everything goes
//! through [`Terminal`], so sessions can drive a real TTY through
//! [`CrosstermTerminal`] or an in-memory [`VirtualTerminal`] in tests.

mod backend;
mod headless;

use std::io;

use crate::geometry::{Position, Size};
use crate::style::Color;

pub use backend::CrosstermTerminal;
pub use headless::{Cell, VirtualTerminal};

/// Minimal set of console operations a bar session needs.
pub trait Terminal {
    /// Current buffer dimensions. Queried on every render pass.
    fn size(&self) -> io::Result<Size>;

    fn cursor_position(&mut self) -> io::Result<Position>;

    fn set_cursor_position(&mut self, position: Position) -> io::Result<()>;

    /// True when output is not attached to an interactive terminal.
    fn is_redirected(&self) -> bool;

    fn write(&mut self, text: &str) -> io::Result<()>;

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.write(text)?;
        self.write("\n")
    }

    fn set_foreground(&mut self, color: Color) -> io::Result<()>;

    fn set_background(&mut self, color: Color) -> io::Result<()>;

    fn reset_colors(&mut self) -> io::Result<()>;

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()>;

    /// Extend the scroll region to `height` rows. Returns `false` when the
    /// environment cannot grow its buffer explicitly.
    fn grow_buffer_height(&mut self, _height: u16) -> io::Result<bool> {
        Ok(false)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: Terminal + ?Sized> Terminal for &mut T {
    fn size(&self) -> io::Result<Size> {
        (**self).size()
    }

    fn cursor_position(&mut self) -> io::Result<Position> {
        (**self).cursor_position()
    }

    fn set_cursor_position(&mut self, position: Position) -> io::Result<()> {
        (**self).set_cursor_position(position)
    }

    fn is_redirected(&self) -> bool {
        (**self).is_redirected()
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        (**self).write(text)
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        (**self).write_line(text)
    }

    fn set_foreground(&mut self, color: Color) -> io::Result<()> {
        (**self).set_foreground(color)
    }

    fn set_background(&mut self, color: Color) -> io::Result<()> {
        (**self).set_background(color)
    }

    fn reset_colors(&mut self) -> io::Result<()> {
        (**self).reset_colors()
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        (**self).set_cursor_visible(visible)
    }

    fn grow_buffer_height(&mut self, height: u16) -> io::Result<bool> {
        (**self).grow_buffer_height(height)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}
