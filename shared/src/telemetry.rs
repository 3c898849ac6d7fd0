use std::time::{Duration, Instant};

/// Wall-clock timer for a pipeline stage, reported through `tracing`.
pub struct Telemetry {
    label: &'static str,
    start: Instant,
}

impl Telemetry {
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        tracing::info!(stage = self.label, elapsed_ms = elapsed.as_millis() as u64, "stage finished");
        elapsed
    }
}
