//! Printing lines above an active bar.
//!
//! Appending a line naively would either scroll the bar off the bottom row or
//! leave a stale copy of it behind. Lines that would reach the bar row are
//! instead written one row-sized chunk at a time: scroll (or grow the buffer)
//! when the cursor is already on the last row, overwrite the row above the bar
//! with the padded chunk, then redraw the bar underneath.

use super::ProgressBar;
use crate::error::Result;
use crate::geometry::{Position, Size};
use crate::logging::{LogLevel, json_kv};
use crate::terminal::Terminal;

const INTERLEAVE_TARGET: &str = "anchor_bar::interleave";

impl<T: Terminal> ProgressBar<T> {
    /// Print `text` as a line of output, keeping the bar on the bottom row.
    ///
    /// Embedded newlines start new lines, each interleaved on its own.
    pub fn write_line(&mut self, text: &str) -> Result<()> {
        for line in text.split('\n') {
            self.interleave_line(line.strip_suffix('\r').unwrap_or(line))?;
        }
        Ok(())
    }

    fn interleave_line(&mut self, text: &str) -> Result<()> {
        if !self.state.is_started() {
            self.terminal.write_line(text)?;
            self.with_metrics(|metrics| metrics.record_line());
            return Ok(());
        }

        let mut rest = text.to_string();
        loop {
            let size = self.terminal.size()?;
            let cursor = self.terminal.cursor_position()?;
            if !collides(cursor.row, &rest, size) {
                self.terminal.write_line(&rest)?;
                self.with_metrics(|metrics| metrics.record_line());
                return self.render();
            }

            let (chunk, remainder) = split_chars(&rest, chunk_width(size));
            self.place_chunk(&chunk, cursor, size)?;
            self.with_metrics(|metrics| metrics.record_line());
            self.render()?;

            if remainder.is_empty() {
                return Ok(());
            }
            rest = remainder;
        }
    }

    /// Write one chunk on the row just above the bar and leave the cursor on
    /// the row after it.
    fn place_chunk(&mut self, chunk: &str, cursor: Position, size: Size) -> Result<()> {
        let target = self.make_room(cursor.row, size)?;
        let width = usize::from(size.width);

        self.terminal.set_cursor_position(Position::row_start(target))?;
        self.terminal.write(&pad(chunk, width))?;

        let last_row = self.terminal.size()?.last_row();
        self.terminal
            .set_cursor_position(Position::row_start((target + 1).min(last_row)))?;
        Ok(())
    }

    /// Row the next chunk goes on. A cursor already on the last row first
    /// gets a fresh row, by growing the buffer when the terminal allows it and
    /// by scrolling everything up one line otherwise.
    fn make_room(&mut self, row: u16, size: Size) -> Result<u16> {
        let last_row = size.last_row();
        if row < last_row {
            return Ok(row);
        }

        if self.terminal.grow_buffer_height(size.height.saturating_add(1))? {
            return Ok(row);
        }

        self.terminal.set_cursor_position(Position::row_start(last_row))?;
        self.terminal.write("\n")?;
        self.with_metrics(|metrics| metrics.record_scroll());
        self.log(
            LogLevel::Trace,
            INTERLEAVE_TARGET,
            "line_scrolled",
            [json_kv("row", row), json_kv("height", size.height)],
        );
        Ok(row.saturating_sub(1))
    }
}

/// Rows `text` occupies when written from column 0, never less than one.
fn rows_needed(text: &str, width: usize) -> usize {
    text.chars().count().div_ceil(width).max(1)
}

/// Whether writing `text` from `row` would reach the row above the bar.
fn collides(row: u16, text: &str, size: Size) -> bool {
    let needed = rows_needed(text, chunk_width(size));
    usize::from(row) + needed >= usize::from(size.height.saturating_sub(1))
}

fn chunk_width(size: Size) -> usize {
    usize::from(size.width).max(1)
}

fn split_chars(text: &str, count: usize) -> (String, String) {
    match text.char_indices().nth(count) {
        Some((idx, _)) => (text[..idx].to_string(), text[idx..].to_string()),
        None => (text.to_string(), String::new()),
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut padded = String::with_capacity(text.len() + width.saturating_sub(len));
    padded.push_str(text);
    padded.extend(std::iter::repeat_n(' ', width.saturating_sub(len)));
    padded
}
