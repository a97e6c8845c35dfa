// Request pacing for outbound registry lookups.
//
// Public RDAP endpoints throttle aggressive clients. A minimum interval
// between requests keeps batch runs polite. Callers reserve a send slot
// under the lock, then sleep outside it, so concurrent waiters queue up
// fairly instead of stampeding when the lock frees.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Minimum-interval gate between requests.
#[derive(Clone)]
pub struct Pacer {
    inner: Arc<Mutex<PacerInner>>,
}

struct PacerInner {
    min_interval: Duration,
    /// The most recently reserved send slot.
    next_slot: Option<Instant>,
}

impl Pacer {
    pub fn new(min_interval: Duration) -> Self {
        Pacer {
            inner: Arc::new(Mutex::new(PacerInner {
                min_interval,
                next_slot: None,
            })),
        }
    }

    /// Wait until this caller's reserved slot arrives.
    pub async fn pace(&self) {
        let wait = {
            let mut inner = self.inner.lock().await;
            let now = Instant::now();
            let slot = match inner.next_slot {
                Some(prev) => (prev + inner.min_interval).max(now),
                None => now,
            };
            inner.next_slot = Some(slot);
            slot - now
        };
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}
