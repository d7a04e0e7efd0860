//! Error module orchestrator.
//!
//! Construction-time misconfiguration and terminal I/O failures are the only
//! conditions surfaced to callers; out-of-range progress input is absorbed.

mod types;

pub use types::{BarError, Result};
