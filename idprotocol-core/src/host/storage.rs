//! Durable per-player attachment storage

use super::UserId;
use crate::core_record::IdRecord;
use crate::errors::IdResult;
use async_trait::async_trait;

/// Namespace key under which committed records are attached to a profile
pub const ATTACHMENT_KEY: &str = "IDProtocol";

/// Durable attachment store keyed by player identity
///
/// The store is an external transactional resource: a commit is a single
/// keyed write, and the pipeline never needs multi-key transactions.
/// Ownership of a record transfers here at commit time; the session store
/// entry is deleted in the same finalize pass.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Fetch the committed record for `user`, or `None` when absent
    async fn fetch(&self, user: &UserId, key: &str) -> IdResult<Option<IdRecord>>;

    /// Create or overwrite the committed record for `user`
    async fn put(&self, user: &UserId, key: &str, record: &IdRecord) -> IdResult<()>;

    /// Remove the committed record for `user`, returning whether one existed
    async fn remove(&self, user: &UserId, key: &str) -> IdResult<bool>;
}
