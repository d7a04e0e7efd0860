//! Render module orchestrator.
//!
//! [`Frame`] is the pure half: labels, truncation and bar runs for one pass.
//! [`BarRenderer`] writes a frame to a terminal at the current cursor.

mod core;
mod frame;

pub use core::{BarRenderer, RendererSettings};
pub use frame::{
    Frame, LabelFate, Section, Truncation, filled_width, percentage_label, textual_width,
};
