//! Layout module orchestrator.
//!
//! Downstream code imports layout types from here while the implementation
//! details live in the private `core` module.

mod core;

pub use core::{BarDirection, BarLayout, BarPosition, Brackets, Layout, MINIMUM_BAR_WIDTH};
