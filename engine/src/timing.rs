use std::time::Instant;

use tracing::info;

/// Logs how long the enclosing scope took when dropped.
pub struct LogDuration {
    label: String,
    start: Instant,
}

impl LogDuration {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), start: Instant::now() }
    }
}

impl Drop for LogDuration {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        info!(took_s = elapsed.as_secs_f64(), "{}: {} ms", self.label, elapsed.as_millis());
    }
}
