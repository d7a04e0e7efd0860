use std::sync::{Arc, Mutex};

use crate::layout::Layout;
use crate::logging::Logger;
use crate::metrics::RenderMetrics;

/// Options recognised when opening a bar session.
#[derive(Clone)]
pub struct SessionConfig {
    /// Visual composition of the bar row.
    pub layout: Layout,
    /// Step count that corresponds to 100%. Must be non-zero.
    pub max_steps: u32,
    /// Start rendering as soon as the session is built.
    pub auto_start: bool,
    /// Route `io::Write` output through the line interleaver instead of
    /// passing it straight to the terminal.
    pub capture_output: bool,
    /// Optional structured logger for lifecycle and render events.
    pub logger: Option<Logger>,
    /// Counters shared with the caller; snapshots are logged on stop.
    pub metrics: Option<Arc<Mutex<RenderMetrics>>>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            max_steps: 100,
            auto_start: true,
            capture_output: false,
            logger: None,
            metrics: None,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    pub fn with_capture_output(mut self, capture_output: bool) -> Self {
        self.capture_output = capture_output;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(RenderMetrics::new())));
        }
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<RenderMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = SessionConfig::default();
        assert_eq!(config.max_steps, 100);
        assert!(config.auto_start);
        assert!(!config.capture_output);
        assert!(config.logger.is_none());
        assert!(config.metrics_handle().is_none());
        assert_eq!(config.layout, Layout::default());
    }

    #[test]
    fn enable_metrics_is_idempotent() {
        let mut config = SessionConfig::new();
        config.enable_metrics();
        let first = config.metrics_handle().unwrap();
        config.enable_metrics();
        let second = config.metrics_handle().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
