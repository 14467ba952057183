use log::{info, warn};

/// Logging facade used by the report renderers.
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    /// Degraded-output events (missing geometry, clamped layout) are worth
    /// a warning without failing the render.
    pub fn record_degraded(&self, message: &str) {
        warn!("{}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
