use std::time::{Duration, Instant};

use braid_core::models::SearchMetadata;

use crate::tracing_setup::events;

/// Measures pipeline stages and records them into [`SearchMetadata::latencies`].
#[derive(Debug, Clone, Copy)]
pub struct StageTimer {
    started: Instant,
    stage_started: Instant,
}

impl StageTimer {
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            stage_started: now,
        }
    }

    /// Time since the timer was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn elapsed_ms(&self) -> u64 {
        millis(self.elapsed())
    }

    /// Close the current stage, record it, and start the next one.
    pub fn lap(&mut self, stage: &str, metadata: &mut SearchMetadata) -> u64 {
        let ms = millis(self.stage_started.elapsed());
        metadata.record_latency(stage, ms);
        events::stage_completed(stage, ms);
        self.stage_started = Instant::now();
        ms
    }

    /// Record the whole-request latency under `total`.
    pub fn finish(&self, metadata: &mut SearchMetadata) -> u64 {
        let ms = self.elapsed_ms();
        metadata.record_latency("total", ms);
        ms
    }
}

pub fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
