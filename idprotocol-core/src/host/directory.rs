//! Identity and proximity lookups

use super::UserId;
use crate::errors::IdResult;
use async_trait::async_trait;

/// Identity/directory lookup provided by the host
///
/// Resolves user handles to identity strings and answers proximity queries
/// for distance-scoped display.
#[async_trait]
pub trait PlayerDirectory: Send + Sync {
    /// Canonical identity string for a connected user
    ///
    /// This is the value stamped onto a record at display time. It is owned
    /// by the host and never user-supplied.
    async fn canonical_id(&self, user: &UserId) -> IdResult<String>;

    /// Human-readable display name for a connected user
    async fn display_name(&self, user: &UserId) -> IdResult<String>;

    /// Resolve a player by display name or canonical identity
    ///
    /// Returns `None` when no connected player matches.
    async fn find_by_name_or_id(&self, query: &str) -> IdResult<Option<UserId>>;

    /// Players within `distance` units of `user`, excluding `user` itself
    async fn players_within(&self, user: &UserId, distance: f32) -> IdResult<Vec<UserId>>;
}
