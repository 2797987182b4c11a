//! Host collaborator boundary
//!
//! The ID pipeline never talks to the game server directly. Everything it
//! needs from the host is expressed as a small trait:
//!
//! - `PlayerDirectory`: identity resolution and proximity queries
//! - `AttachmentStore`: durable per-player record storage
//! - `Inventory`: the ID-card capability check and item issuance
//! - `FormTransport`: form presentation, field requests and notifications
//!
//! Implementations wrap the real server API in production and an in-memory
//! double (`test_utils::MockHost`) in tests.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod directory;
pub mod elements;
pub mod inventory;
pub mod storage;
pub mod transport;

pub use directory::PlayerDirectory;
pub use inventory::{Inventory, ID_CARD_ITEM};
pub use storage::{AttachmentStore, ATTACHMENT_KEY};
pub use transport::FormTransport;

/// Stable per-player identity
///
/// Keys the transient session store and the durable attachment store. This is
/// the host's login identity (username), not the canonical numeric identity
/// stamped onto displayed records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Create a new user ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
