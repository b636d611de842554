//! In-process snapshot bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`SnapshotBus`] is shared via `Arc<SnapshotBus>` between the snapshot
//! publisher and every connected stream.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use kilnwatch_core::snapshot::DashboardSnapshot;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// DashboardEvent
// ---------------------------------------------------------------------------

/// A published snapshot.
#[derive(Debug, Clone)]
pub struct DashboardEvent {
    /// Monotonic per-bus sequence number, starting at 1.
    pub sequence: u64,
    pub snapshot: Arc<DashboardSnapshot>,
    pub published_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// SnapshotBus
// ---------------------------------------------------------------------------

/// Default buffer capacity. Snapshots are small and published every few
/// seconds, so a short buffer is plenty.
const DEFAULT_CAPACITY: usize = 16;

/// Fan-out hub: every subscriber independently receives every snapshot.
///
/// ```rust
/// use kilnwatch_core::snapshot::DashboardSnapshot;
/// use kilnwatch_events::SnapshotBus;
///
/// let bus = SnapshotBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(DashboardSnapshot::default());
/// ```
pub struct SnapshotBus {
    sender: broadcast::Sender<DashboardEvent>,
    sequence: AtomicU64,
}

impl SnapshotBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unread snapshots are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            sequence: AtomicU64::new(0),
        }
    }

    /// Publish a snapshot to all current subscribers and return its event.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, snapshot: DashboardSnapshot) -> DashboardEvent {
        let event = DashboardEvent {
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
            snapshot: Arc::new(snapshot),
            published_at: Utc::now(),
        };
        if self.sender.send(event.clone()).is_err() {
            tracing::trace!(sequence = event.sequence, "Snapshot published with no subscribers");
        }
        event
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.sender.subscribe()
    }

    /// Sequence of the most recently published snapshot, `0` before the first.
    pub fn last_sequence(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }

    /// Number of live subscribers (connected streams).
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SnapshotBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use tokio::sync::broadcast::error::RecvError;

    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = SnapshotBus::default();
        let mut rx = bus.subscribe();

        let sent = bus.publish(DashboardSnapshot::default());

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.sequence, 1);
        assert_eq!(received.sequence, sent.sequence);
        assert!(received.snapshot.is_empty());
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = SnapshotBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(DashboardSnapshot::default());

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");
        assert!(Arc::ptr_eq(&e1.snapshot, &e2.snapshot));
    }

    #[test]
    fn sequence_increases_without_subscribers() {
        let bus = SnapshotBus::default();
        assert_eq!(bus.publish(DashboardSnapshot::default()).sequence, 1);
        assert_eq!(bus.publish(DashboardSnapshot::default()).sequence, 2);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn last_sequence_tracks_publishes() {
        let bus = SnapshotBus::default();
        assert_eq!(bus.last_sequence(), 0);
        bus.publish(DashboardSnapshot::default());
        bus.publish(DashboardSnapshot::default());
        assert_eq!(bus.last_sequence(), 2);
    }

    #[tokio::test]
    async fn slow_subscriber_lags() {
        let bus = SnapshotBus::new(2);
        let mut rx = bus.subscribe();

        for _ in 0..5 {
            bus.publish(DashboardSnapshot::default());
        }

        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(3))));
        let next = rx.recv().await.unwrap();
        assert_eq!(next.sequence, 4);
    }

    #[test]
    fn snapshot_payload_serializes() {
        let bus = SnapshotBus::default();
        let event = bus.publish(DashboardSnapshot::default());
        let json = serde_json::to_string(event.snapshot.as_ref()).unwrap();
        assert_eq!(json, r#"{"latest":{},"alerts":{}}"#);
    }
}
