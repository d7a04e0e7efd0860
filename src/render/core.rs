use std::io;

use super::frame::{Frame, Section};
use crate::layout::{Layout, MINIMUM_BAR_WIDTH};
use crate::style::ElementStyle;
use crate::terminal::Terminal;

/// Renderer parameters.
#[derive(Debug, Clone)]
pub struct RendererSettings {
    /// Width the bar keeps before labels start to shrink.
    pub minimum_bar_width: usize,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            minimum_bar_width: MINIMUM_BAR_WIDTH,
        }
    }
}

/// Draws frames straight to a terminal; nothing is buffered between passes.
#[derive(Debug, Clone, Default)]
pub struct BarRenderer {
    settings: RendererSettings,
}

impl BarRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    pub fn frame(&self, layout: &Layout, percentage: f64, width: u16) -> Frame {
        Frame::compute(layout, percentage, width, self.settings.minimum_bar_width)
    }

    /// Compute and draw one frame at the cursor.
    pub fn render<T: Terminal + ?Sized>(
        &self,
        terminal: &mut T,
        layout: &Layout,
        percentage: f64,
    ) -> io::Result<Frame> {
        let width = terminal.size()?.width;
        let frame = self.frame(layout, percentage, width);
        self.draw(terminal, &frame, width)?;
        Ok(frame)
    }

    /// Write the frame's sections, clipped so the row never wraps, then blank
    /// whatever is left of the row so no cells from an earlier frame survive.
    pub fn draw<T: Terminal + ?Sized>(
        &self,
        terminal: &mut T,
        frame: &Frame,
        width: u16,
    ) -> io::Result<()> {
        let mut remaining = usize::from(width);
        for Section { text, style } in frame.sections() {
            if remaining == 0 {
                break;
            }
            let clipped = clip(&text, remaining);
            remaining -= clipped.chars().count();
            match style {
                Some(style) => draw_styled(terminal, clipped, style)?,
                None => terminal.write(clipped)?,
            }
        }
        if remaining > 0 {
            terminal.write(&" ".repeat(remaining))?;
        }
        Ok(())
    }

    /// Blank the row at the cursor.
    pub fn clear<T: Terminal + ?Sized>(&self, terminal: &mut T) -> io::Result<()> {
        let width = usize::from(terminal.size()?.width);
        terminal.write(&" ".repeat(width))
    }
}

fn draw_styled<T: Terminal + ?Sized>(
    terminal: &mut T,
    text: &str,
    style: ElementStyle,
) -> io::Result<()> {
    if let Some(color) = style.foreground {
        terminal.set_foreground(color)?;
    }
    if let Some(color) = style.background {
        terminal.set_background(color)?;
    }
    let written = terminal.write(text);
    terminal.reset_colors()?;
    written
}

fn clip(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
