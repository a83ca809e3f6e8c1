//! Races pipeline stages against the caller's cancellation token and deadline.

use std::future::Future;
use std::time::{Duration, Instant};

use braid_core::errors::{BraidError, BraidResult};
use braid_core::models::RequestContext;
use braid_observability::timer::millis;

/// Per-request stage guard. The deadline is measured from construction.
pub(crate) struct StageGuard<'a> {
    ctx: &'a RequestContext,
    started: Instant,
}

impl<'a> StageGuard<'a> {
    pub fn new(ctx: &'a RequestContext) -> Self {
        Self {
            ctx,
            started: Instant::now(),
        }
    }

    /// Fail fast if the request is already cancelled or out of time.
    pub fn check(&self, stage: &str) -> BraidResult<()> {
        if self.ctx.cancel.is_cancelled() {
            return Err(self.cancelled(stage));
        }
        if self.remaining() == Some(Duration::ZERO) {
            return Err(self.expired(stage));
        }
        Ok(())
    }

    /// Drive `fut` unless cancellation or the deadline comes first.
    /// Cancellation is polled first, so a cancelled request never yields output.
    pub async fn run<F: Future>(&self, stage: &str, fut: F) -> BraidResult<F::Output> {
        self.check(stage)?;
        let remaining = self.remaining();
        tokio::select! {
            biased;
            _ = self.ctx.cancel.cancelled() => Err(self.cancelled(stage)),
            _ = expiry(remaining) => Err(self.expired(stage)),
            out = fut => Ok(out),
        }
    }

    fn remaining(&self) -> Option<Duration> {
        self.ctx
            .deadline
            .map(|deadline| deadline.saturating_sub(self.started.elapsed()))
    }

    fn cancelled(&self, stage: &str) -> BraidError {
        tracing::info!(stage = %stage, "request cancelled");
        BraidError::Cancelled {
            stage: stage.to_string(),
        }
    }

    fn expired(&self, stage: &str) -> BraidError {
        let elapsed_ms = millis(self.started.elapsed());
        tracing::warn!(stage = %stage, elapsed_ms, "request deadline exceeded");
        BraidError::DeadlineExceeded {
            stage: stage.to_string(),
            elapsed_ms,
        }
    }
}

async fn expiry(remaining: Option<Duration>) {
    match remaining {
        Some(remaining) => tokio::time::sleep(remaining).await,
        None => std::future::pending().await,
    }
}
