//! Transient per-user staging for in-progress registrations
//!
//! The session store holds at most one in-progress record per user while the
//! form is being filled. Field values arrive as independent asynchronous
//! callbacks, so updates against a missing entry are absorbed silently, and
//! the finalize pass consumes the entry with an atomic take so a duplicate
//! submit can never commit twice.

use crate::core_record::IdRecord;
use crate::host::UserId;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A single typed field update delivered by the host UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    FirstName(String),
    LastName(String),
    DateOfBirth(String),
    Address(String),
    Height(i32),
    Weight(i32),
    /// true = male, false = female
    Sex(bool),
}

/// Staging area for in-progress records, keyed by user identity
pub struct SessionStore {
    sessions: RwLock<HashMap<UserId, IdRecord>>,
}

impl SessionStore {
    /// Create an empty session store
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create or replace the staged record for `user`
    ///
    /// Opening is last-open-wins: a second open while one is pending
    /// discards the previously staged fields.
    pub async fn open(&self, user: &UserId) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(user.clone(), IdRecord::default());
    }

    /// Apply a field update to the staged record for `user`
    ///
    /// Returns false when no session exists (the user never opened a form,
    /// or it was already finalized). Stale and duplicate deliveries are
    /// expected traffic, never an error.
    pub async fn set_field(&self, user: &UserId, update: FieldUpdate) -> bool {
        let mut sessions = self.sessions.write().await;
        let Some(record) = sessions.get_mut(user) else {
            return false;
        };

        match update {
            FieldUpdate::FirstName(value) => record.first_name = value,
            FieldUpdate::LastName(value) => record.last_name = value,
            FieldUpdate::DateOfBirth(value) => record.date_of_birth = value,
            FieldUpdate::Address(value) => record.address = value,
            FieldUpdate::Height(value) => record.height = value,
            FieldUpdate::Weight(value) => record.weight = value,
            FieldUpdate::Sex(value) => record.sex = value,
        }
        true
    }

    /// Atomically remove and return the staged record for `user`
    ///
    /// Exactly-once by construction: of two concurrent takes for the same
    /// user, one gets the record and the other observes `None`.
    pub async fn take_and_clear(&self, user: &UserId) -> Option<IdRecord> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(user)
    }

    /// Whether `user` has an open session
    pub async fn contains(&self, user: &UserId) -> bool {
        let sessions = self.sessions.read().await;
        sessions.contains_key(user)
    }

    /// Number of open sessions
    pub async fn len(&self) -> usize {
        let sessions = self.sessions.read().await;
        sessions.len()
    }

    /// Whether no sessions are open
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_open_and_set_field() {
        let store = SessionStore::new();
        let user = UserId::new("alice");

        store.open(&user).await;
        assert!(store.contains(&user).await);

        assert!(
            store
                .set_field(&user, FieldUpdate::FirstName("Alice".to_string()))
                .await
        );
        assert!(store.set_field(&user, FieldUpdate::Height(170)).await);

        let record = store.take_and_clear(&user).await.unwrap();
        assert_eq!(record.first_name, "Alice");
        assert_eq!(record.height, 170);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_stale_update_is_noop() {
        let store = SessionStore::new();
        let user = UserId::new("alice");

        // Never opened: the update reports false and nothing is created.
        assert!(
            !store
                .set_field(&user, FieldUpdate::Address("nowhere".to_string()))
                .await
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_reopen_discards_staged_fields() {
        let store = SessionStore::new();
        let user = UserId::new("alice");

        store.open(&user).await;
        store
            .set_field(&user, FieldUpdate::FirstName("Alice".to_string()))
            .await;

        // Last-open-wins: the second open starts from a fresh record.
        store.open(&user).await;
        store
            .set_field(&user, FieldUpdate::LastName("Smith".to_string()))
            .await;

        let record = store.take_and_clear(&user).await.unwrap();
        assert_eq!(record.first_name, "");
        assert_eq!(record.last_name, "Smith");
    }

    #[tokio::test]
    async fn test_take_is_exactly_once() {
        let store = Arc::new(SessionStore::new());
        let user = UserId::new("alice");
        store.open(&user).await;

        let (a, b) = tokio::join!(store.take_and_clear(&user), store.take_and_clear(&user));

        // One take wins, the other observes an absent session.
        assert!(a.is_some() != b.is_some());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_sessions_are_independent_per_user() {
        let store = SessionStore::new();
        let alice = UserId::new("alice");
        let bob = UserId::new("bob");

        store.open(&alice).await;
        store.open(&bob).await;
        store
            .set_field(&alice, FieldUpdate::FirstName("Alice".to_string()))
            .await;

        assert!(store.take_and_clear(&bob).await.unwrap().first_name.is_empty());
        assert_eq!(
            store.take_and_clear(&alice).await.unwrap().first_name,
            "Alice"
        );
    }
}
