//! Inventory access: the ID-card capability and item issuance

use super::UserId;
use crate::errors::IdResult;
use async_trait::async_trait;

/// Item name of the physical ID card
pub const ID_CARD_ITEM: &str = "IDCard";

/// Inventory operations provided by the host
#[async_trait]
pub trait Inventory: Send + Sync {
    /// Whether the user currently has `item` in hand
    ///
    /// Models the capability check: display commands require the physical
    /// ID card to be held.
    async fn holding(&self, user: &UserId, item: &str) -> IdResult<bool>;

    /// Add `amount` units of `item` to the user's inventory
    async fn grant(&self, user: &UserId, item: &str, amount: u32) -> IdResult<()>;
}
