use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    pipeline_events: AtomicU64,
    pipeline_failures: AtomicU64,
    pipeline_partial_failures: AtomicU64,
    usage_opened: AtomicU64,
    usage_closed: AtomicU64,
    usage_unmatched: AtomicU64,
}

impl Metrics {
    pub fn record_pipeline_event(&self) {
        self.pipeline_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pipeline_failure(&self) {
        self.pipeline_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// The event was appended but a later view update failed.
    pub fn record_partial_failure(&self) {
        self.pipeline_failures.fetch_add(1, Ordering::Relaxed);
        self.pipeline_partial_failures
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_usage_opened(&self) {
        self.usage_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_usage_closed(&self) {
        self.usage_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_usage_unmatched(&self) {
        self.usage_unmatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pipeline_events(&self) -> u64 {
        self.pipeline_events.load(Ordering::Relaxed)
    }

    pub fn pipeline_failures(&self) -> u64 {
        self.pipeline_failures.load(Ordering::Relaxed)
    }

    pub fn partial_failures(&self) -> u64 {
        self.pipeline_partial_failures.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let events = self.pipeline_events.load(Ordering::Relaxed);
        let failures = self.pipeline_failures.load(Ordering::Relaxed);
        let partial = self.pipeline_partial_failures.load(Ordering::Relaxed);
        let opened = self.usage_opened.load(Ordering::Relaxed);
        let closed = self.usage_closed.load(Ordering::Relaxed);
        let unmatched = self.usage_unmatched.load(Ordering::Relaxed);

        format!(
            "# TYPE equiptrack_pipeline_events_total counter\n\
equiptrack_pipeline_events_total {}\n\
# TYPE equiptrack_pipeline_failures_total counter\n\
equiptrack_pipeline_failures_total {}\n\
# TYPE equiptrack_pipeline_partial_failures_total counter\n\
equiptrack_pipeline_partial_failures_total {}\n\
# TYPE equiptrack_usage_entries_opened_total counter\n\
equiptrack_usage_entries_opened_total {}\n\
# TYPE equiptrack_usage_entries_closed_total counter\n\
equiptrack_usage_entries_closed_total {}\n\
# TYPE equiptrack_usage_scan_out_unmatched_total counter\n\
equiptrack_usage_scan_out_unmatched_total {}\n",
            events, failures, partial, opened, closed, unmatched
        )
    }
}
