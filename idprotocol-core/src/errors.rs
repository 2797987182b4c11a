//! Error types for ID operations

use thiserror::Error;

/// Result type for ID operations
pub type IdResult<T> = Result<T, IdError>;

/// Errors surfaced by the host collaborators
///
/// Nothing in the pipeline itself is fatal: validation failures, policy
/// refusals and stale session events all resolve to a user notification or a
/// silent no-op. These variants only cover failures of the host boundary
/// (directory lookups, attachment storage, UI transport, inventory).
#[derive(Debug, Error)]
pub enum IdError {
    /// Identity/directory lookup failed
    #[error("Directory error: {0}")]
    Directory(String),

    /// Durable attachment store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// UI transport or notification delivery failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Inventory operation failure
    #[error("Inventory error: {0}")]
    Inventory(String),

    /// A referenced player is not connected
    #[error("Player not found: {0}")]
    PlayerNotFound(String),
}
