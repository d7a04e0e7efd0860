//! Bar sessions: progress state, lifecycle and rendering choreography.
//!
//! A [`ProgressBar`] owns its terminal handle (or a `&mut` to one) and is the
//! single writer to the bottom row while started. Every mutation re-renders
//! inline on the caller's thread; there is no background refresh.

mod config;
mod interleave;
mod state;

use std::io::{self, Stdout};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde_json::Value;

use crate::cursor::CursorGuard;
use crate::error::{BarError, Result};
use crate::geometry::Position;
use crate::layout::Layout;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::RenderMetrics;
use crate::render::{BarRenderer, Frame};
use crate::terminal::{CrosstermTerminal, Terminal};

pub use config::SessionConfig;
pub use state::ProgressState;

const SESSION_TARGET: &str = "anchor_bar::session";
const RENDER_TARGET: &str = "anchor_bar::render";
const METRICS_TARGET: &str = "anchor_bar::metrics";

/// A progress bar anchored to the last row of a terminal.
///
/// Dropping the session stops it, so the bar row is blanked and the cursor
/// made visible again on every exit path.
pub struct ProgressBar<T: Terminal> {
    terminal: T,
    layout: Layout,
    state: ProgressState,
    renderer: BarRenderer,
    capture_output: bool,
    pending_output: Vec<u8>,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<RenderMetrics>>>,
    started_at: Option<Instant>,
}

impl ProgressBar<CrosstermTerminal<Stdout>> {
    /// Open a session on the process stdout.
    pub fn stdout(config: SessionConfig) -> Result<Self> {
        Self::new(CrosstermTerminal::stdout(), config)
    }
}

impl<T: Terminal> ProgressBar<T> {
    pub fn new(terminal: T, config: SessionConfig) -> Result<Self> {
        let SessionConfig {
            layout,
            max_steps,
            auto_start,
            capture_output,
            logger,
            metrics,
        } = config;

        let mut bar = Self {
            terminal,
            layout,
            state: ProgressState::new(max_steps)?,
            renderer: BarRenderer::with_default(),
            capture_output,
            pending_output: Vec::new(),
            logger,
            metrics,
            started_at: None,
        };
        if auto_start {
            bar.start()?;
        }
        Ok(bar)
    }

    /// Swap the renderer, e.g. to change the minimum bar width.
    pub fn with_renderer(mut self, renderer: BarRenderer) -> Result<Self> {
        self.renderer = renderer;
        self.render()?;
        Ok(self)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    pub fn percentage(&self) -> f64 {
        self.state.percentage()
    }

    pub fn steps(&self) -> u32 {
        self.state.steps()
    }

    pub fn max_steps(&self) -> u32 {
        self.state.max_steps()
    }

    pub fn is_started(&self) -> bool {
        self.state.is_started()
    }

    /// Begin drawing the bar. No-op when already started or when output is
    /// redirected.
    pub fn start(&mut self) -> Result<()> {
        if self.state.is_started() {
            return Ok(());
        }
        if self.terminal.is_redirected() {
            self.log(LogLevel::Debug, SESSION_TARGET, "start_skipped_redirected", []);
            return Ok(());
        }

        self.state.set_started(true);
        self.started_at.get_or_insert_with(Instant::now);
        self.terminal.set_cursor_visible(false)?;
        self.log(
            LogLevel::Info,
            SESSION_TARGET,
            "session_started",
            [
                json_kv("steps", self.state.steps()),
                json_kv("max_steps", self.state.max_steps()),
            ],
        );
        self.render()
    }

    /// Blank the bar row and show the cursor again. No-op when not started.
    pub fn stop(&mut self) -> Result<()> {
        if !self.state.is_started() {
            return Ok(());
        }

        self.state.set_started(false);
        let cleared = self.unrender();
        self.terminal.set_cursor_visible(true)?;
        self.terminal.flush()?;
        cleared?;
        self.log(
            LogLevel::Info,
            SESSION_TARGET,
            "session_stopped",
            [json_kv("steps", self.state.steps())],
        );
        self.emit_metrics_snapshot();
        Ok(())
    }

    /// Set the progress from a percentage in `[0, 100]`; anything else is ignored.
    pub fn report(&mut self, percentage: f64) -> Result<()> {
        let Some(steps) = self.state.steps_for_percentage(percentage) else {
            return Ok(());
        };
        self.state.set_steps(steps);
        self.render()
    }

    /// Set the progress and the dynamic label together. Both are dropped when
    /// the percentage is out of range.
    pub fn report_with_text(&mut self, percentage: f64, text: impl Into<String>) -> Result<()> {
        let Some(steps) = self.state.steps_for_percentage(percentage) else {
            return Ok(());
        };
        self.layout.set_additional_text(Some(text.into()));
        self.state.set_steps(steps);
        self.render()
    }

    /// Add (or with a negative `delta`, remove) steps. A result outside
    /// `[0, max_steps]` drops the whole call, text update included.
    pub fn add_steps(&mut self, delta: i64, text: Option<&str>) -> Result<()> {
        let Some(steps) = self.state.checked_add(delta) else {
            return Ok(());
        };
        if let Some(text) = text {
            self.layout.set_additional_text(Some(text.to_string()));
        }
        self.state.set_steps(steps);
        self.render()
    }

    /// Replace the primary label.
    pub fn set_text(&mut self, text: Option<String>) -> Result<()> {
        self.layout.set_text(text);
        self.render()
    }

    /// Replace the dynamic label.
    pub fn set_additional_text(&mut self, text: Option<String>) -> Result<()> {
        self.layout.set_additional_text(text);
        self.render()
    }

    /// Redraw the bar on the last row, leaving the cursor where it was.
    pub fn render(&mut self) -> Result<()> {
        if !self.state.is_started() {
            return Ok(());
        }

        let last_row = self.terminal.size()?.last_row();
        let mut guard = CursorGuard::save(&mut self.terminal)?;
        let drawn = guard.move_to(Position::row_start(last_row)).and_then(|()| {
            self.renderer
                .render(&mut *guard, &self.layout, self.state.percentage())
        });
        guard.restore()?;
        let frame = drawn?;
        self.terminal.flush()?;

        self.after_render(&frame);
        Ok(())
    }

    fn unrender(&mut self) -> Result<()> {
        let last_row = self.terminal.size()?.last_row();
        let mut guard = CursorGuard::save(&mut self.terminal)?;
        let cleared = guard
            .move_to(Position::row_start(last_row))
            .and_then(|()| self.renderer.clear(&mut *guard));
        guard.restore()?;
        Ok(cleared?)
    }

    fn after_render(&self, frame: &Frame) {
        self.with_metrics(|metrics| metrics.record_render(frame.is_truncated()));
        if let Some(truncation) = frame.truncation {
            self.log(
                LogLevel::Debug,
                RENDER_TARGET,
                "frame_truncated",
                [
                    json_kv("deficit", truncation.deficit),
                    json_kv("text", truncation.text.as_str()),
                    json_kv("additional_text", truncation.additional_text.as_str()),
                    json_kv("bar_width", frame.bar_width),
                ],
            );
        }
    }

    fn with_metrics(&self, record: impl FnOnce(&mut RenderMetrics)) {
        if let Some(metrics) = self.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }

    fn emit_metrics_snapshot(&self) {
        let (Some(logger), Some(metrics)) = (self.logger.as_ref(), self.metrics.as_ref()) else {
            return;
        };
        let uptime = self
            .started_at
            .map(|start| start.elapsed())
            .unwrap_or_default();
        if let Ok(guard) = metrics.lock() {
            let _ = logger.log_event(guard.snapshot(uptime).to_log_event(METRICS_TARGET));
        }
    }

    fn log<I>(&self, level: LogLevel, target: &str, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.logger.as_ref() {
            let _ = logger.log_event(event_with_fields(level, target, message, fields));
        }
    }

    /// Emit whatever partial line is still buffered from `io::Write`.
    fn flush_pending_output(&mut self) -> Result<()> {
        if self.pending_output.is_empty() {
            return Ok(());
        }
        let bytes = std::mem::take(&mut self.pending_output);
        self.write_line(&String::from_utf8_lossy(&bytes))
    }
}

impl<T: Terminal> io::Write for ProgressBar<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.capture_output {
            self.terminal.write(&String::from_utf8_lossy(buf))?;
            return Ok(buf.len());
        }

        self.pending_output.extend_from_slice(buf);
        while let Some(end) = self.pending_output.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.pending_output.drain(..=end).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            self.write_line(&String::from_utf8_lossy(&line))
                .map_err(into_io_error)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.terminal.flush()
    }
}

impl<T: Terminal> Drop for ProgressBar<T> {
    fn drop(&mut self) {
        self.flush_pending_output().ok();
        self.stop().ok();
    }
}

fn into_io_error(err: BarError) -> io::Error {
    match err {
        BarError::Io(err) => err,
        other => io::Error::other(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use crate::terminal::VirtualTerminal;
    use std::io::Write;

    fn unix_config() -> SessionConfig {
        SessionConfig::default().with_layout(Layout::unix())
    }

    #[test]
    fn zero_max_steps_fails_construction() {
        let mut term = VirtualTerminal::new(40, 5);
        let err = ProgressBar::new(&mut term, SessionConfig::default().with_max_steps(0));
        assert!(matches!(err, Err(BarError::InvalidMaxSteps(0))));
    }

    #[test]
    fn auto_start_draws_on_the_last_row_and_hides_the_cursor() {
        let mut term = VirtualTerminal::new(40, 5);
        {
            let bar = ProgressBar::new(&mut term, unix_config()).unwrap();
            assert!(bar.is_started());
            assert!(!bar.terminal().is_cursor_visible());
            assert_eq!(bar.terminal().cursor(), Position::new(0, 0));
            assert_eq!(
                bar.terminal().line(4),
                format!("Progress: [00%] [{}]", ".".repeat(22))
            );
        }
        assert!(term.is_cursor_visible());
        assert_eq!(term.row_text(4), " ".repeat(40));
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut term = VirtualTerminal::new(30, 3);
        let mut bar =
            ProgressBar::new(&mut term, unix_config().with_auto_start(false)).unwrap();
        assert!(!bar.is_started());
        assert_eq!(bar.terminal().line(2), "");

        bar.stop().unwrap();
        bar.start().unwrap();
        bar.start().unwrap();
        assert!(bar.is_started());
        bar.stop().unwrap();
        bar.stop().unwrap();
        assert!(bar.terminal().is_cursor_visible());
        assert_eq!(bar.terminal().row_text(2), " ".repeat(30));
    }

    #[test]
    fn redirected_output_suppresses_rendering() {
        let mut term = VirtualTerminal::new(30, 3).redirected();
        {
            let mut bar = ProgressBar::new(&mut term, unix_config()).unwrap();
            assert!(!bar.is_started());
            bar.add_steps(40, Some("copying")).unwrap();
            assert_eq!(bar.steps(), 40);
            bar.write_line("plain output").unwrap();
        }
        assert!(term.is_cursor_visible());
        assert_eq!(term.lines(), vec!["plain output", "", ""]);
    }

    #[test]
    fn add_steps_out_of_range_drops_text_too() {
        let mut term = VirtualTerminal::new(60, 4);
        let mut bar = ProgressBar::new(&mut term, SessionConfig::default()).unwrap();
        bar.add_steps(30, Some("step 30")).unwrap();
        bar.add_steps(80, Some("overshoot")).unwrap();
        bar.add_steps(-31, Some("undershoot")).unwrap();

        assert_eq!(bar.steps(), 30);
        assert_eq!(bar.layout().additional_text().unwrap().value, "step 30");
        assert!(bar.terminal().line(3).ends_with("30% step 30"));
    }

    #[test]
    fn report_ignores_out_of_range_values() {
        let mut term = VirtualTerminal::new(60, 4);
        let mut bar = ProgressBar::new(&mut term, SessionConfig::default()).unwrap();
        bar.report(25.0).unwrap();
        bar.report(-0.1).unwrap();
        bar.report(100.1).unwrap();
        bar.report_with_text(150.0, "ignored").unwrap();
        assert_eq!(bar.percentage(), 25.0);
        assert!(bar.layout().additional_text().is_none());

        bar.report_with_text(50.0, "half").unwrap();
        assert_eq!(bar.percentage(), 50.0);
        assert!(bar.terminal().line(3).ends_with("50% half"));
    }

    #[test]
    fn rendering_leaves_the_cursor_in_place() {
        let mut term = VirtualTerminal::new(40, 6);
        term.write("prompt> ").unwrap();
        let mut bar = ProgressBar::new(&mut term, SessionConfig::default()).unwrap();
        bar.report(70.0).unwrap();
        assert_eq!(bar.terminal().cursor(), Position::new(8, 0));
    }

    #[test]
    fn text_setters_rerender() {
        let mut term = VirtualTerminal::new(50, 3);
        let mut bar = ProgressBar::new(&mut term, SessionConfig::default()).unwrap();
        bar.set_text(Some("Indexing".into())).unwrap();
        bar.set_additional_text(Some("src/".into())).unwrap();
        let row = bar.terminal().line(2);
        assert!(row.starts_with("Indexing "));
        assert!(row.ends_with(" 00% src/"));

        bar.set_text(None).unwrap();
        assert!(bar.terminal().line(2).starts_with('░'));
    }

    #[test]
    fn lifecycle_and_metrics_are_logged() {
        let sink = MemorySink::new();
        let mut config = SessionConfig::default().with_logger(Logger::new(sink.clone()));
        config.enable_metrics();
        let metrics = config.metrics_handle().unwrap();

        let mut term = VirtualTerminal::new(16, 3);
        {
            let mut bar = ProgressBar::new(&mut term, config).unwrap();
            bar.add_steps(10, Some("a long dynamic label")).unwrap();
        }

        let messages = sink.messages();
        assert_eq!(messages.first().map(String::as_str), Some("session_started"));
        assert!(messages.iter().any(|m| m == "frame_truncated"));
        assert!(messages.iter().any(|m| m == "session_stopped"));
        assert_eq!(messages.last().map(String::as_str), Some("render_metrics"));

        let snapshot = metrics
            .lock()
            .unwrap()
            .snapshot(std::time::Duration::ZERO);
        assert_eq!(snapshot.renders, 2);
        assert_eq!(snapshot.truncated_frames, 2);
    }

    #[test]
    fn redirected_start_is_logged() {
        let sink = MemorySink::new();
        let mut term = VirtualTerminal::new(16, 3).redirected();
        let _bar = ProgressBar::new(
            &mut term,
            SessionConfig::default().with_logger(Logger::new(sink.clone())),
        )
        .unwrap();
        assert_eq!(sink.messages(), vec!["start_skipped_redirected"]);
    }

    #[test]
    fn captured_writes_go_through_the_interleaver() {
        let mut term = VirtualTerminal::new(30, 4);
        {
            let mut bar = ProgressBar::new(
                &mut term,
                unix_config().with_capture_output(true),
            )
            .unwrap();
            write!(bar, "first ").unwrap();
            writeln!(bar, "line").unwrap();
            write!(bar, "second\r\nunterminated").unwrap();
            assert_eq!(bar.terminal().line(0), "first line");
            assert_eq!(bar.terminal().line(1), "second");
            assert!(bar.terminal().line(3).starts_with("Progress:"));
        }
        assert_eq!(term.line(2), "unterminated");
        assert_eq!(term.line(3), "");
    }

    #[test]
    fn uncaptured_writes_pass_straight_through() {
        let mut term = VirtualTerminal::new(30, 4);
        let mut bar = ProgressBar::new(&mut term, unix_config()).unwrap();
        write!(bar, "raw").unwrap();
        bar.flush().unwrap();
        assert_eq!(bar.terminal().line(0), "raw");
        assert_eq!(bar.terminal().cursor(), Position::new(3, 0));
    }

    #[test]
    fn stopped_bar_can_restart() {
        let mut term = VirtualTerminal::new(30, 3);
        let mut bar = ProgressBar::new(&mut term, unix_config()).unwrap();
        bar.stop().unwrap();
        bar.add_steps(50, None).unwrap();
        assert_eq!(bar.terminal().row_text(2), " ".repeat(30));

        bar.start().unwrap();
        assert!(bar.terminal().line(2).contains("[50%]"));
    }

    #[test]
    fn dropped_label_leaves_no_stale_cells() {
        let mut term = VirtualTerminal::new(24, 3);
        let mut bar = ProgressBar::new(&mut term, SessionConfig::default()).unwrap();
        assert_eq!(bar.terminal().row_text(2), "Progress: ░░░░░░░░░░ 00%");

        bar.set_additional_text(Some("abcdefgh".into())).unwrap();
        let frame = BarRenderer::with_default().frame(bar.layout(), bar.percentage(), 24);
        assert_eq!(frame.line(), "Progr... ░░░░░░░░░░ 00%");
        assert_eq!(bar.terminal().row_text(2), format!("{:<24}", frame.line()));
    }

    #[test]
    fn session_on_stdout_type_checks() {
        fn assert_write<W: Write>() {}
        assert_write::<ProgressBar<CrosstermTerminal<Stdout>>>();
    }
}
