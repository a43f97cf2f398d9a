/*!
 * Change Notifications
 * Events published after mutations, the default broadcast bus, and armed subscriptions
 */

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::broadcast;

use super::traits::ChangeNotifier;
use crate::codec::{is_descendant, DocumentId};
use crate::core::limits::DEFAULT_NOTIFY_CAPACITY;

/// What happened under a parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ChangeKind {
    Created,
    Deleted,
    Renamed { from: DocumentId },
}

/// Fire-and-forget change signal keyed by the parent's children URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// `content://<authority>/document/<parent>/children`
    pub uri: String,
    pub parent_id: DocumentId,
    pub document_id: DocumentId,
    #[serde(flatten)]
    pub kind: ChangeKind,
}

/// Event broadcaster implementation
/// Uses tokio broadcast channel for lock-free MPMC
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: Arc<broadcast::Sender<ChangeEvent>>,
}

impl EventBroadcaster {
    /// Create new broadcaster with specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Subscribe to events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Emit event to all subscribers
    pub fn emit(&self, event: ChangeEvent) {
        // No receivers is fine
        let _ = self.sender.send(event);
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFY_CAPACITY)
    }
}

impl ChangeNotifier for EventBroadcaster {
    fn notify_change(&self, event: &ChangeEvent) {
        self.emit(event.clone());
    }
}

/// One armed listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    pub uri: String,
    pub armed_at: SystemTime,
    /// Listings that (re)armed this key
    pub listings: u64,
    /// Notifications published under this key since it was first armed
    pub notifications: u64,
}

/// Parent identifiers whose listings asked to be told about changes
///
/// Keys are canonical parent identifiers, so `root` and `root/` share one entry.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    entries: DashMap<String, Subscription>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) the subscription for a parent
    pub fn arm(&self, parent_id: &str, uri: &str) {
        self.entries
            .entry(parent_id.to_string())
            .and_modify(|s| s.listings += 1)
            .or_insert_with(|| Subscription {
                uri: uri.to_string(),
                armed_at: SystemTime::now(),
                listings: 1,
                notifications: 0,
            });
    }

    /// Count a published notification; true when the key was armed
    pub fn record_notification(&self, parent_id: &str) -> bool {
        match self.entries.get_mut(parent_id) {
            Some(mut s) => {
                s.notifications += 1;
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self, parent_id: &str) -> bool {
        self.entries.contains_key(parent_id)
    }

    pub fn get(&self, parent_id: &str) -> Option<Subscription> {
        self.entries.get(parent_id).map(|s| s.value().clone())
    }

    /// Drop the subscriptions for a document and everything under it
    ///
    /// Returns how many keys were released.
    pub fn release_subtree(&self, document_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !is_descendant(document_id, key));
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
