//! Change feed for realtime invalidation
//!
//! The [`ChangeFeed`] decouples mutations from the pages that display the
//! affected collections. It uses `tokio::sync::broadcast`: backends publish a
//! [`ChangeEvent`] after every committed mutation, and each mounted page holds
//! a [`ChangeSubscription`] scoped to one collection.
//!
//! ```text
//! Backend mutation ──▶ ChangeFeed::publish() ──▶ broadcast channel
//!                                                    │
//!                                     ChangeSubscription::next()
//!                                                    │
//!                                     page refetches the full collection
//! ```
//!
//! Subscribers never inspect the payload beyond the collection name: any
//! notification triggers an unconditional refetch, so a lagged receiver that
//! drops events loses nothing as long as one notification gets through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// The kind of row mutation a change event describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Insert,
    Update,
    Delete,
}

/// A single row-level mutation in a named collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Collection the mutated row belongs to (e.g. "invoices")
    pub collection: String,
    /// What happened to the row
    pub action: ChangeAction,
    /// Id of the affected row
    pub row_id: Uuid,
    /// Row payload after the mutation; absent for deletes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<serde_json::Value>,
}

/// Envelope wrapping a change event with delivery metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEnvelope {
    /// Unique notification id
    pub id: Uuid,
    /// When the change was observed
    pub timestamp: DateTime<Utc>,
    /// The actual change
    pub event: ChangeEvent,
}

impl ChangeEnvelope {
    pub fn new(event: ChangeEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based change feed
///
/// Cheap to clone (the sender is an `Arc` internally) and shared between a
/// backend and all of its subscribers.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEnvelope>,
}

impl ChangeFeed {
    /// Create a feed with the given buffer capacity
    ///
    /// The capacity bounds how many notifications a slow subscriber can fall
    /// behind before it starts lagging.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a change to all subscribers
    ///
    /// Non-blocking and infallible: with no subscribers the notification is
    /// simply dropped. Returns the number of receivers it reached.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        let envelope = ChangeEnvelope::new(event);
        // send() only errors when there are no receivers
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to the raw feed (all collections)
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEnvelope> {
        self.sender.subscribe()
    }

    /// Subscribe to changes of a single collection
    pub fn subscribe_collection(&self, collection: &str) -> ChangeSubscription {
        ChangeSubscription {
            collection: collection.to_string(),
            rx: self.sender.subscribe(),
        }
    }

    /// Current number of active receivers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(1024)
    }
}

/// A change-feed subscription scoped to one collection
///
/// Dropping the subscription releases it; a page holds one of these for the
/// lifetime of its mount and nothing longer.
pub struct ChangeSubscription {
    collection: String,
    rx: broadcast::Receiver<ChangeEnvelope>,
}

impl ChangeSubscription {
    /// The collection this subscription watches
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Wait for the next change to this collection
    ///
    /// Events for other collections are skipped. A lagged receiver logs and
    /// keeps going (missing individual events is harmless since consumers
    /// refetch the whole collection). Returns `None` once the feed is closed.
    pub async fn next(&mut self) -> Option<ChangeEnvelope> {
        loop {
            match self.rx.recv().await {
                Ok(envelope) if envelope.event.collection == self.collection => {
                    return Some(envelope);
                }
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        collection = %self.collection,
                        skipped = skipped,
                        "change subscription lagged"
                    );
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
