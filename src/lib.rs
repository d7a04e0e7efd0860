//! Single-line progress bar anchored to the bottom row of a terminal.
//!
//! A [`ProgressBar`] session draws on the last row and keeps it there while
//! ordinary output scrolls above it. Lines printed through
//! [`ProgressBar::write_line`] (or through `io::Write` in capture mode) are
//! interleaved so the bar is never scrolled away or left behind as a stale
//! copy. Capture mode only sees bytes written to the session itself; output
//! printed with `println!` or straight to stdout bypasses the interleaver, so
//! route it through the session while the bar is active.
//!
//! The terminal is reached through the [`Terminal`] trait:
//! [`CrosstermTerminal`] drives a real TTY and [`VirtualTerminal`] is an
//! in-memory grid for tests and demos.

pub mod capture;
pub mod cursor;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod render;
pub mod session;
pub mod style;
pub mod terminal;

pub use capture::LineRecorder;
pub use cursor::CursorGuard;
pub use error::{BarError, Result};
pub use geometry::{Position, Size};
pub use layout::{BarDirection, BarLayout, BarPosition, Brackets, Layout, MINIMUM_BAR_WIDTH};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, NullSink,
};
pub use metrics::{MetricSnapshot, RenderMetrics};
pub use render::{BarRenderer, Frame, LabelFate, RendererSettings, Truncation};
pub use session::{ProgressBar, ProgressState, SessionConfig};
pub use style::{Color, ElementStyle, StyledElement};
pub use terminal::{Cell, CrosstermTerminal, Terminal, VirtualTerminal};
