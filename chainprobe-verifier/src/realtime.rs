//! Realtime head tracking.
//!
//! Each iteration fetches the chain height and compares it with the
//! highest height seen so far:
//!
//! - equal: nothing new, the iteration ends;
//! - greater: the new head is recorded, then its block is checked;
//! - lower: the endpoint went backwards (reorg). The depth is logged and
//!   the highest height is kept.
//!
//! [`RealtimeMonitor::step`] runs one iteration without sleeping.
//! [`RealtimeMonitor::run`] drives it with the two configured delays until
//! the shutdown signal fires.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::GatewayError;
use crate::gateway::ChainGateway;
use crate::result::BlockCheck;
use crate::sink::{LatencySink, OperationKind};
use crate::verifier::BlockVerifier;

/// Delay before each height poll.
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_millis(200);

/// Extra delay after a consistent validation pass.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// How an observed height relates to the highest one seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadTransition {
    /// Same height as before.
    Unchanged,
    /// New highest height.
    Advanced(u64),
    /// Height moved backwards by `depth` blocks.
    Reorged {
        /// Height just observed
        observed: u64,
        /// Highest height seen so far (unchanged)
        highest: u64,
        /// `highest - observed`
        depth: u64,
    },
}

/// Highest chain height seen by the monitor. Starts at zero and never
/// decreases.
#[derive(Debug, Default, Clone)]
pub struct HeadTracker {
    highest: u64,
}

impl HeadTracker {
    /// Tracker starting at height zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest height seen so far.
    pub fn highest(&self) -> u64 {
        self.highest
    }

    /// Classify `height` and advance the tracker if it is a new high.
    pub fn observe(&mut self, height: u64) -> HeadTransition {
        use std::cmp::Ordering;

        match height.cmp(&self.highest) {
            Ordering::Equal => HeadTransition::Unchanged,
            Ordering::Greater => {
                self.highest = height;
                HeadTransition::Advanced(height)
            }
            Ordering::Less => HeadTransition::Reorged {
                observed: height,
                highest: self.highest,
                depth: self.highest - height,
            },
        }
    }
}

/// What one monitor iteration did.
#[derive(Debug)]
pub enum IterationOutcome {
    /// A fetch failed. `height` is set when the failure happened after a
    /// new head was recorded.
    Skipped {
        /// Advanced height whose check was abandoned
        height: Option<u64>,
        /// The gateway error
        error: GatewayError,
    },
    /// Height unchanged since the last iteration.
    Unchanged,
    /// Height went backwards; nothing was validated.
    Reorged {
        /// Height just observed
        observed: u64,
        /// Blocks between the highest seen height and `observed`
        depth: u64,
    },
    /// The new head was checked.
    Validated(Box<BlockCheck>),
}

impl IterationOutcome {
    /// A validation pass ran and found both log sets consistent.
    pub fn is_consistent(&self) -> bool {
        matches!(self, Self::Validated(check) if check.is_consistent())
    }
}

/// Delays used by [`RealtimeMonitor::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealtimeConfig {
    /// Wait before every height poll.
    pub poll_delay: Duration,
    /// Additional wait after a consistent validation pass.
    pub settle_delay: Duration,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            poll_delay: DEFAULT_POLL_DELAY,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

/// Follows the chain head and checks every new highest block.
pub struct RealtimeMonitor<G> {
    verifier: BlockVerifier<G>,
    sink: Arc<dyn LatencySink>,
    tracker: HeadTracker,
    config: RealtimeConfig,
}

impl<G: ChainGateway> RealtimeMonitor<G> {
    /// Create a monitor with a fresh [`HeadTracker`].
    pub fn new(gateway: G, sink: Arc<dyn LatencySink>, config: RealtimeConfig) -> Self {
        Self {
            verifier: BlockVerifier::new(gateway),
            sink,
            tracker: HeadTracker::new(),
            config,
        }
    }

    /// Highest height seen so far.
    pub fn highest(&self) -> u64 {
        self.tracker.highest()
    }

    /// Run one iteration, without any delay.
    pub async fn step(&mut self) -> IterationOutcome {
        let head = match self.verifier.gateway().current_height().await {
            Ok(head) => head,
            Err(error) => {
                warn!(kind = error.kind(), error = %error, "failed to fetch chain height");
                return IterationOutcome::Skipped { height: None, error };
            }
        };

        let height = match self.tracker.observe(head.value) {
            HeadTransition::Unchanged => {
                debug!(height = head.value, "head unchanged");
                return IterationOutcome::Unchanged;
            }
            HeadTransition::Reorged { observed, highest, depth } => {
                warn!(observed, highest, depth, "backward block height detected (reorg)");
                return IterationOutcome::Reorged { observed, depth };
            }
            HeadTransition::Advanced(height) => {
                info!(height, "new highest block");
                height
            }
        };

        let check = match self.verifier.check_block(height).await {
            Ok(check) => check,
            Err(error) => {
                warn!(block = height, kind = error.kind(), error = %error, "block check skipped");
                return IterationOutcome::Skipped {
                    height: Some(height),
                    error,
                };
            }
        };

        check.log();
        if check.is_consistent() {
            self.sink.observe(OperationKind::HeightFetch, head.latency);
            self.sink.observe(OperationKind::CompactBlockFetch, check.latencies.compact_block);
            self.sink.observe(OperationKind::ExpandedBlockFetch, check.latencies.expanded_block);
            self.sink.observe(OperationKind::LogsByRangeFetch, check.latencies.logs_by_range);
        }

        IterationOutcome::Validated(Box::new(check))
    }

    /// Poll until `shutdown` carries `true` or its sender is dropped.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            poll_delay_ms = self.config.poll_delay.as_millis() as u64,
            settle_delay_ms = self.config.settle_delay.as_millis() as u64,
            "realtime monitor started"
        );

        loop {
            if wait_or_shutdown(self.config.poll_delay, &mut shutdown).await {
                break;
            }

            let outcome = self.step().await;

            if outcome.is_consistent() && wait_or_shutdown(self.config.settle_delay, &mut shutdown).await {
                break;
            }
        }

        info!(highest = self.tracker.highest(), "realtime monitor stopped");
    }
}

/// Sleep for `delay`; returns `true` if shutdown was requested instead.
async fn wait_or_shutdown(delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    if *shutdown.borrow() {
        return true;
    }

    tokio::select! {
        _ = sleep(delay) => false,
        changed = shutdown.changed() => changed.is_err() || *shutdown.borrow(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_sequence() {
        let mut tracker = HeadTracker::new();
        let transitions: Vec<_> = [5, 5, 7, 6, 9].into_iter().map(|h| tracker.observe(h)).collect();

        assert_eq!(
            transitions,
            vec![
                HeadTransition::Advanced(5),
                HeadTransition::Unchanged,
                HeadTransition::Advanced(7),
                HeadTransition::Reorged { observed: 6, highest: 7, depth: 1 },
                HeadTransition::Advanced(9),
            ]
        );
        assert_eq!(tracker.highest(), 9);
    }

    #[test]
    fn test_highest_never_decreases() {
        let mut tracker = HeadTracker::new();
        tracker.observe(100);
        tracker.observe(3);
        tracker.observe(99);
        assert_eq!(tracker.highest(), 100);
    }

    #[test]
    fn test_initial_zero_is_unchanged() {
        let mut tracker = HeadTracker::new();
        assert_eq!(tracker.observe(0), HeadTransition::Unchanged);
    }

    #[tokio::test]
    async fn test_wait_returns_immediately_when_already_shut_down() {
        let (tx, mut rx) = watch::channel(true);
        assert!(wait_or_shutdown(Duration::from_secs(3600), &mut rx).await);
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_elapses_without_shutdown() {
        let (_tx, mut rx) = watch::channel(false);
        assert!(!wait_or_shutdown(Duration::from_millis(200), &mut rx).await);
    }
}
