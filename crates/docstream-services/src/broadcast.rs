//! Per-document status fan-out.
//!
//! Each document with at least one live subscriber gets its own broadcast
//! channel, keyed by document id. Channels are created lazily on the first
//! subscribe, torn down by [`StatusBroadcaster::complete`] when the document
//! reaches a terminal status, and pruned when the last subscriber disconnects.
//! Events are delivered to subscribers connected at emit time only; there is
//! no replay.
//!
//! State lives in process memory. Subscribers connected to a different
//! instance behind a load balancer will not see events emitted here.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use docstream_core::constants::STATUS_CHANNEL_CAPACITY;
use docstream_core::models::{DocumentStatus, StatusEvent};

/// Registry of live status channels.
pub struct StatusBroadcaster {
    channels: DashMap<Uuid, broadcast::Sender<StatusEvent>>,
}

impl StatusBroadcaster {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Registers a subscriber for `document_id`, creating the channel if this
    /// is the first one. Events emitted before this call are not delivered.
    pub fn subscribe(self: &Arc<Self>, document_id: Uuid) -> Subscription {
        let receiver = self
            .channels
            .entry(document_id)
            .or_insert_with(|| broadcast::channel(STATUS_CHANNEL_CAPACITY).0)
            .subscribe();

        tracing::debug!(document_id = %document_id, "Status subscriber registered");

        Subscription {
            receiver,
            _guard: DisconnectGuard {
                document_id,
                registry: Arc::clone(self),
            },
        }
    }

    /// Fans `status` out to the subscribers currently registered for
    /// `document_id`. No channel or no receivers is a silent no-op. The send
    /// is synchronous and bounded, so a slow subscriber can lag behind but
    /// can never block the caller.
    pub fn emit(&self, document_id: Uuid, status: DocumentStatus) {
        let Some(sender) = self.channels.get(&document_id) else {
            tracing::debug!(
                document_id = %document_id,
                status = %status,
                "No status channel registered, event dropped"
            );
            return;
        };

        let delivered = sender
            .send(StatusEvent::now(document_id, status))
            .unwrap_or(0);

        tracing::debug!(
            document_id = %document_id,
            status = %status,
            subscribers = delivered,
            "Status event emitted"
        );
    }

    /// Tears down the channel for `document_id`. Subscribers drain whatever
    /// is still buffered and then their streams end. Completing a document
    /// with no channel is a no-op, so the call is idempotent.
    pub fn complete(&self, document_id: Uuid) {
        if self.channels.remove(&document_id).is_some() {
            tracing::debug!(document_id = %document_id, "Status channel completed");
        }
    }

    /// Number of documents with a registered channel.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of live subscribers for `document_id`.
    pub fn subscriber_count(&self, document_id: Uuid) -> usize {
        self.channels
            .get(&document_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for StatusBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription to one document's status events.
///
/// Dropping the subscription deregisters it; the channel itself is removed
/// once no subscribers remain. Field order matters: the receiver must drop
/// before the guard so the prune sees an accurate receiver count.
pub struct Subscription {
    receiver: broadcast::Receiver<StatusEvent>,
    _guard: DisconnectGuard,
}

impl Subscription {
    /// Waits for the next status event. Returns `None` once the channel has
    /// been completed and all buffered events are drained. A lagged receiver
    /// skips the overwritten events and picks up at the oldest retained one.
    pub async fn recv(&mut self) -> Option<StatusEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Status subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

struct DisconnectGuard {
    document_id: Uuid,
    registry: Arc<StatusBroadcaster>,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        self.registry
            .channels
            .remove_if(&self.document_id, |_, sender| sender.receiver_count() == 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn broadcaster() -> Arc<StatusBroadcaster> {
        Arc::new(StatusBroadcaster::new())
    }

    #[tokio::test]
    async fn test_single_emission_reaches_every_subscriber() {
        let registry = broadcaster();
        let id = Uuid::new_v4();

        let mut subs = vec![
            registry.subscribe(id),
            registry.subscribe(id),
            registry.subscribe(id),
        ];

        registry.emit(id, DocumentStatus::Ingesting);

        for sub in &mut subs {
            let event = sub.recv().await.expect("subscriber should receive event");
            assert_eq!(event.document_id, id);
            assert_eq!(event.status, DocumentStatus::Ingesting);
        }
    }

    #[tokio::test]
    async fn test_events_before_subscribe_are_not_replayed() {
        let registry = broadcaster();
        let id = Uuid::new_v4();

        // Keep the channel alive so the first emit has somewhere to go.
        let _earlier = registry.subscribe(id);
        registry.emit(id, DocumentStatus::Ingesting);

        let mut late = registry.subscribe(id);
        registry.emit(id, DocumentStatus::Ingested);

        let event = late.recv().await.expect("late subscriber gets new events");
        assert_eq!(event.status, DocumentStatus::Ingested);
    }

    #[tokio::test]
    async fn test_complete_drains_buffered_events_then_closes() {
        let registry = broadcaster();
        let id = Uuid::new_v4();

        let mut sub = registry.subscribe(id);
        registry.emit(id, DocumentStatus::Ingested);
        registry.complete(id);

        let event = sub.recv().await.expect("buffered event survives complete");
        assert_eq!(event.status, DocumentStatus::Ingested);
        assert!(sub.recv().await.is_none(), "stream ends after drain");
    }

    #[tokio::test]
    async fn test_complete_then_subscribe_creates_fresh_channel() {
        let registry = broadcaster();
        let id = Uuid::new_v4();

        let mut old = registry.subscribe(id);
        registry.complete(id);

        let mut fresh = registry.subscribe(id);
        registry.emit(id, DocumentStatus::UnIngested);

        assert!(old.recv().await.is_none(), "old channel stays closed");
        let event = fresh.recv().await.expect("fresh channel is live");
        assert_eq!(event.status, DocumentStatus::UnIngested);
    }

    #[tokio::test]
    async fn test_emit_without_channel_is_noop() {
        let registry = broadcaster();
        registry.emit(Uuid::new_v4(), DocumentStatus::Failed);
        assert_eq!(registry.channel_count(), 0);
    }

    #[tokio::test]
    async fn test_complete_is_idempotent() {
        let registry = broadcaster();
        let id = Uuid::new_v4();

        let _sub = registry.subscribe(id);
        registry.complete(id);
        registry.complete(id);
        assert_eq!(registry.channel_count(), 0);
    }

    #[tokio::test]
    async fn test_disconnect_deregisters_only_that_subscriber() {
        let registry = broadcaster();
        let id = Uuid::new_v4();

        let mut survivor = registry.subscribe(id);
        let dropped = registry.subscribe(id);
        assert_eq!(registry.subscriber_count(id), 2);

        drop(dropped);
        assert_eq!(registry.subscriber_count(id), 1);

        registry.emit(id, DocumentStatus::Ingesting);
        let event = survivor.recv().await.expect("survivor still receives");
        assert_eq!(event.status, DocumentStatus::Ingesting);
    }

    #[tokio::test]
    async fn test_last_disconnect_prunes_channel() {
        let registry = broadcaster();
        let id = Uuid::new_v4();

        let sub = registry.subscribe(id);
        assert_eq!(registry.channel_count(), 1);

        drop(sub);
        assert_eq!(registry.channel_count(), 0);
    }

    #[tokio::test]
    async fn test_events_arrive_in_emission_order() {
        let registry = broadcaster();
        let id = Uuid::new_v4();

        let mut sub = registry.subscribe(id);
        let sequence = [
            DocumentStatus::Ingesting,
            DocumentStatus::Failed,
            DocumentStatus::Ingesting,
            DocumentStatus::Ingested,
        ];
        for status in sequence {
            registry.emit(id, status);
        }

        for expected in sequence {
            let event = sub.recv().await.expect("event in order");
            assert_eq!(event.status, expected);
        }
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags_instead_of_blocking() {
        let registry = broadcaster();
        let id = Uuid::new_v4();

        let mut sub = registry.subscribe(id);

        // Overflow the channel without draining it. Every emit must return
        // immediately even though the subscriber has consumed nothing.
        for _ in 0..(STATUS_CHANNEL_CAPACITY + 16) {
            registry.emit(id, DocumentStatus::Ingesting);
        }

        let event = sub.recv().await.expect("lagged subscriber resumes");
        assert_eq!(event.status, DocumentStatus::Ingesting);
    }

    #[tokio::test]
    async fn test_channels_are_isolated_per_document() {
        let registry = broadcaster();
        let doc_a = Uuid::new_v4();
        let doc_b = Uuid::new_v4();

        let mut sub_a = registry.subscribe(doc_a);
        let mut sub_b = registry.subscribe(doc_b);

        registry.emit(doc_a, DocumentStatus::Ingested);
        registry.emit(doc_b, DocumentStatus::Failed);

        assert_eq!(
            sub_a.recv().await.map(|e| e.status),
            Some(DocumentStatus::Ingested)
        );
        assert_eq!(
            sub_b.recv().await.map(|e| e.status),
            Some(DocumentStatus::Failed)
        );
    }
}
