//! Bounded concurrent channel execution for one request.
//!
//! MultiVector, GraphLocal and GraphGlobal start together. EntityExpansion
//! waits on MultiVector for its anchors, so it runs as a continuation of the
//! MultiVector branch rather than in the first wave. A per-request semaphore
//! caps how many channel calls are in flight.

use std::time::Instant;

use braid_core::errors::ChannelError;
use braid_core::models::{Channel, GraphScope, RankedItem};
use braid_observability::channel_span;
use braid_observability::timer::millis;
use tokio::sync::Semaphore;
use tracing::Instrument;

use crate::channels::{ChannelAdapter, ChannelQuery, ChannelSet};

/// Channels to launch for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FanoutPlan {
    pub multi_vector: bool,
    pub graph_local: bool,
    pub graph_global: bool,
    pub entity_expansion: bool,
}

impl FanoutPlan {
    pub fn enable(&mut self, channel: Channel) {
        match channel {
            Channel::MultiVector => self.multi_vector = true,
            Channel::GraphLocal => self.graph_local = true,
            Channel::GraphGlobal => self.graph_global = true,
            Channel::EntityExpansion => self.entity_expansion = true,
        }
    }

    pub fn includes(&self, channel: Channel) -> bool {
        match channel {
            Channel::MultiVector => self.multi_vector,
            Channel::GraphLocal => self.graph_local,
            Channel::GraphGlobal => self.graph_global,
            Channel::EntityExpansion => self.entity_expansion,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.multi_vector || self.graph_local || self.graph_global || self.entity_expansion)
    }
}

/// Outcome of one launched channel.
#[derive(Debug)]
pub(crate) struct ChannelRun {
    pub channel: Channel,
    pub result: Result<Vec<RankedItem>, ChannelError>,
    pub latency_ms: u64,
}

/// Launch every planned channel and wait for all of them.
///
/// Runs come back in canonical channel order. EntityExpansion is absent when
/// MultiVector failed or found nothing.
pub(crate) async fn fan_out(
    channels: &ChannelSet,
    plan: FanoutPlan,
    text: &str,
    top_k: usize,
    scope: &GraphScope,
    max_concurrent: usize,
) -> Vec<ChannelRun> {
    let permits = Semaphore::new(max_concurrent.max(1));
    let base = ChannelQuery::new(text, top_k, scope);
    let planned = |channel: Channel| {
        if plan.includes(channel) {
            channels.get(channel)
        } else {
            None
        }
    };

    let vector_branch = async {
        let Some(multi_vector) = planned(Channel::MultiVector) else {
            return (None, None);
        };
        let mv_run = run_channel(multi_vector, base, &permits).await;
        let anchors: Vec<String> = match &mv_run.result {
            Ok(items) => items.iter().map(|i| i.id.clone()).collect(),
            Err(_) => Vec::new(),
        };
        let ee_run = match planned(Channel::EntityExpansion) {
            Some(expansion) if !anchors.is_empty() => {
                Some(run_channel(expansion, base.with_anchors(&anchors), &permits).await)
            }
            _ => None,
        };
        (Some(mv_run), ee_run)
    };
    let graph_local = async {
        match planned(Channel::GraphLocal) {
            Some(adapter) => Some(run_channel(adapter, base, &permits).await),
            None => None,
        }
    };
    let graph_global = async {
        match planned(Channel::GraphGlobal) {
            Some(adapter) => Some(run_channel(adapter, base, &permits).await),
            None => None,
        }
    };

    let ((mv, ee), gl, gg) = tokio::join!(vector_branch, graph_local, graph_global);
    [mv, gl, gg, ee].into_iter().flatten().collect()
}

async fn run_channel(
    adapter: &ChannelAdapter,
    query: ChannelQuery<'_>,
    permits: &Semaphore,
) -> ChannelRun {
    let channel = adapter.channel();
    // The semaphore is never closed; a failed acquire only means running unthrottled.
    let _permit = permits.acquire().await.ok();
    let started = Instant::now();
    let result = adapter
        .search(&query)
        .instrument(channel_span!(channel, query.top_k))
        .await;
    ChannelRun {
        channel,
        result,
        latency_ms: millis(started.elapsed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_tracks_enabled_channels() {
        let mut plan = FanoutPlan::default();
        assert!(plan.is_empty());
        plan.enable(Channel::GraphGlobal);
        assert!(plan.includes(Channel::GraphGlobal));
        assert!(!plan.includes(Channel::MultiVector));
        assert!(!plan.is_empty());
    }
}
