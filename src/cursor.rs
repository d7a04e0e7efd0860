//! Scoped cursor save/restore.
//!
//! The terminal cursor is shared host state. Every excursion to the bar row
//! runs inside a [`CursorGuard`], which puts the cursor back where it found it
//! even when a write in between fails.

use std::io;
use std::ops::{Deref, DerefMut};

use crate::geometry::Position;
use crate::terminal::Terminal;

/// Holds the terminal while the cursor is away from its saved position.
pub struct CursorGuard<'a, T: Terminal + ?Sized> {
    terminal: &'a mut T,
    origin: Position,
    restored: bool,
}

impl<'a, T: Terminal + ?Sized> CursorGuard<'a, T> {
    /// Record the current cursor position.
    pub fn save(terminal: &'a mut T) -> io::Result<Self> {
        let origin = terminal.cursor_position()?;
        Ok(Self {
            terminal,
            origin,
            restored: false,
        })
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    pub fn move_to(&mut self, position: Position) -> io::Result<()> {
        self.terminal.set_cursor_position(position)
    }

    /// Restore the saved position, reporting any failure.
    pub fn restore(mut self) -> io::Result<()> {
        self.restored = true;
        self.terminal.set_cursor_position(self.origin)
    }
}

impl<T: Terminal + ?Sized> Deref for CursorGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &*self.terminal
    }
}

impl<T: Terminal + ?Sized> DerefMut for CursorGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut *self.terminal
    }
}

impl<T: Terminal + ?Sized> Drop for CursorGuard<'_, T> {
    fn drop(&mut self) {
        if !self.restored {
            let _ = self.terminal.set_cursor_position(self.origin);
        }
    }
}
