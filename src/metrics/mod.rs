use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters accumulated over the lifetime of a session.
#[derive(Debug, Default, Clone)]
pub struct RenderMetrics {
    renders: u64,
    truncated_frames: u64,
    lines_written: u64,
    scrolls: u64,
}

impl RenderMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_render(&mut self, truncated: bool) {
        self.renders = self.renders.saturating_add(1);
        if truncated {
            self.truncated_frames = self.truncated_frames.saturating_add(1);
        }
    }

    pub fn record_line(&mut self) {
        self.lines_written = self.lines_written.saturating_add(1);
    }

    pub fn record_scroll(&mut self) {
        self.scrolls = self.scrolls.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            renders: self.renders,
            truncated_frames: self.truncated_frames,
            lines_written: self.lines_written,
            scrolls: self.scrolls,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub renders: u64,
    pub truncated_frames: u64,
    pub lines_written: u64,
    pub scrolls: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "render_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("renders".to_string(), json!(self.renders));
        map.insert("truncated_frames".to_string(), json!(self.truncated_frames));
        map.insert("lines_written".to_string(), json!(self.lines_written));
        map.insert("scrolls".to_string(), json!(self.scrolls));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_counters() {
        let mut metrics = RenderMetrics::new();
        metrics.record_render(false);
        metrics.record_render(true);
        metrics.record_line();
        metrics.record_scroll();

        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.renders, 2);
        assert_eq!(snapshot.truncated_frames, 1);
        assert_eq!(snapshot.lines_written, 1);
        assert_eq!(snapshot.scrolls, 1);

        let event = snapshot.to_log_event("anchor_bar::metrics");
        assert_eq!(event.message, "render_metrics");
        assert_eq!(event.field("uptime_ms"), Some(&json!(1500)));
    }
}
