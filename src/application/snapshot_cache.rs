// Snapshot cache - Mutex-guarded slot bridging the two control loops
use std::time::Duration;

use tokio::sync::Mutex;

use crate::domain::telemetry::TelemetrySnapshot;

/// Lock-acquisition budget for the fast loop's reads.
pub const READ_LOCK_WAIT: Duration = Duration::from_millis(10);

/// Outcome of a bounded cache read.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheRead {
    /// Lock acquired; the latest stored snapshot.
    Latest(TelemetrySnapshot),
    /// Lock acquired; nothing stored this session.
    Empty,
    /// Lock not acquired within the wait budget. Callers treat the cycle as
    /// "unchanged", never as an error.
    TimedOut,
}

/// Single-slot cache for the most recent telemetry snapshot. The slow loop
/// stores whole snapshots; the fast loop reads with a bounded wait so lock
/// contention degrades into a stale cycle instead of a stall.
pub struct SharedSnapshotCache {
    slot: Mutex<Option<TelemetrySnapshot>>,
}

impl SharedSnapshotCache {
    pub fn new() -> Self {
        Self { slot: Mutex::new(None) }
    }

    /// Replaces the cached snapshot wholesale.
    pub async fn store(&self, snapshot: TelemetrySnapshot) {
        *self.slot.lock().await = Some(snapshot);
    }

    /// Unbounded read for callers that can afford to wait out a writer.
    pub async fn read(&self) -> Option<TelemetrySnapshot> {
        self.slot.lock().await.clone()
    }

    /// Bounded read: the slot's content in full or `TimedOut`, never a
    /// partially updated snapshot.
    pub async fn read_within(&self, wait: Duration) -> CacheRead {
        match tokio::time::timeout(wait, self.slot.lock()).await {
            Ok(slot) => match slot.as_ref() {
                Some(snapshot) => CacheRead::Latest(snapshot.clone()),
                None => CacheRead::Empty,
            },
            Err(_) => CacheRead::TimedOut,
        }
    }
}
