use std::sync::Mutex;

/// Counters accumulated across a report-rendering run.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

struct Metrics {
    rendered: usize,
    degraded: usize,
    errors: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub rendered: usize,
    pub degraded: usize,
    pub errors: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                rendered: 0,
                degraded: 0,
                errors: 0,
            }),
        }
    }

    pub fn record_rendered(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rendered += 1;
        }
    }

    /// A report whose geometry fell back to "unavailable".
    pub fn record_degraded(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.degraded += 1;
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.errors += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                rendered: metrics.rendered,
                degraded: metrics.degraded,
                errors: metrics.errors,
            }
        } else {
            MetricsSnapshot {
                rendered: 0,
                degraded: 0,
                errors: 0,
            }
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
