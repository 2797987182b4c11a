//! Event broadcasting for the ID pipeline
//!
//! Lifecycle events are emitted over a tokio broadcast channel so other
//! subsystems (admin tooling, audit logs) can observe registrations and
//! displays without being wired into the services.

use crate::host::UserId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Lifecycle events emitted by the ID services
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum IdEvent {
    /// A registration form was opened
    FormOpened { user: UserId },

    /// A submitted record passed validation and was committed
    RegistrationCommitted { user: UserId },

    /// A submitted record failed validation and was discarded
    RegistrationRejected { user: UserId },

    /// A committed record was rendered to one or more viewers
    RecordDisplayed { user: UserId, viewers: usize },

    /// A committed record was removed
    RecordDeleted { user: UserId },
}

impl IdEvent {
    /// The user this event concerns
    pub fn user(&self) -> &UserId {
        match self {
            IdEvent::FormOpened { user }
            | IdEvent::RegistrationCommitted { user }
            | IdEvent::RegistrationRejected { user }
            | IdEvent::RecordDisplayed { user, .. }
            | IdEvent::RecordDeleted { user } => user,
        }
    }
}

/// Broadcaster for ID events
///
/// Cheap to clone; all clones share the same channel.
#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<IdEvent>,
}

impl EventBroadcaster {
    /// Create a new broadcaster with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all subscribers
    ///
    /// Returns the number of active subscribers that received the event.
    pub fn emit(&self, event: IdEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<IdEvent> {
        self.tx.subscribe()
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_without_subscribers() {
        let broadcaster = EventBroadcaster::new(8);
        let count = broadcaster.emit(IdEvent::FormOpened {
            user: UserId::new("alice"),
        });
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_subscribe_and_receive() {
        let broadcaster = EventBroadcaster::new(8);
        let mut rx = broadcaster.subscribe();
        assert_eq!(broadcaster.subscriber_count(), 1);

        broadcaster.emit(IdEvent::RegistrationCommitted {
            user: UserId::new("alice"),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.user().as_str(), "alice");
        assert!(matches!(event, IdEvent::RegistrationCommitted { .. }));
    }

    #[tokio::test]
    async fn test_all_subscribers_receive() {
        let broadcaster = EventBroadcaster::new(8);
        let mut rx1 = broadcaster.subscribe();
        let mut rx2 = broadcaster.subscribe();

        let count = broadcaster.emit(IdEvent::RecordDeleted {
            user: UserId::new("bob"),
        });
        assert_eq!(count, 2);

        assert_eq!(rx1.recv().await.unwrap().user().as_str(), "bob");
        assert_eq!(rx2.recv().await.unwrap().user().as_str(), "bob");
    }
}
