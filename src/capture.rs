//! Line recording for redirected or captured output.

use std::io::{self, Write};

/// Forwards bytes to an inner writer and records each completed line with
/// ANSI escapes stripped.
///
/// Wrapping a terminal's writer in a recorder makes whatever reached the
/// screen inspectable as plain text, cursor moves and colors removed.
#[derive(Debug)]
pub struct LineRecorder<W: Write> {
    inner: W,
    partial: Vec<u8>,
    lines: Vec<String>,
}

impl<W: Write> LineRecorder<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            partial: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Completed lines, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Bytes received since the last newline, stripped.
    pub fn partial(&self) -> String {
        clean(&self.partial)
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for LineRecorder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        for byte in &buf[..written] {
            if *byte == b'\n' {
                let line = clean(&self.partial);
                self.lines.push(line.trim_end_matches('\r').to_string());
                self.partial.clear();
            } else {
                self.partial.push(*byte);
            }
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

fn clean(bytes: &[u8]) -> String {
    String::from_utf8_lossy(&strip_ansi_escapes::strip(bytes)).into_owned()
}
