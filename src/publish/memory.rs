//! In-memory publish channel.

use crate::error::PublishError;
use crate::publish::{LineageEvent, PublishChannel};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Records every accepted event. Individual entity guids can be marked for
/// rejection, and an artificial delay makes concurrency observable.
#[derive(Default)]
pub struct MemoryChannel {
    events: Mutex<Vec<LineageEvent>>,
    rejected: Mutex<HashSet<String>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Fail every publish for the entity with `guid`.
    pub fn reject(&self, guid: impl Into<String>) {
        self.rejected.lock().insert(guid.into());
    }

    pub fn events(&self) -> Vec<LineageEvent> {
        self.events.lock().clone()
    }

    pub fn published_guids(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .map(|e| e.entity().guid.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Highest number of publish calls observed running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PublishChannel for MemoryChannel {
    async fn publish(&self, event: LineageEvent) -> Result<(), PublishError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let guid = event.entity().guid.clone();
        let result = if self.rejected.lock().contains(&guid) {
            Err(PublishError::Rejected(format!("entity {}", guid)))
        } else {
            self.events.lock().push(event);
            Ok(())
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
