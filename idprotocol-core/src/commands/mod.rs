//! Chat command surface
//!
//! Thin routing layer: alias lists from the configuration are flattened into
//! a lookup table once at startup, and incoming command lines dispatch onto
//! the display service or the delete handler.

use crate::{
    config::IdConfig,
    core_display::DisplayService,
    errors::IdResult,
    events::{EventBroadcaster, IdEvent},
    host::{AttachmentStore, FormTransport, PlayerDirectory, UserId, ATTACHMENT_KEY},
    metrics::record_counter,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a command dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The input matched a registered alias and was handled
    Handled,
    /// The input did not match any alias
    Unknown,
}

#[derive(Debug, Clone, Copy)]
enum CommandKind {
    ShowSelf,
    ShowOthers,
    Delete,
}

/// Routes chat commands onto the ID services
pub struct CommandRouter {
    routes: HashMap<String, CommandKind>,
    config: Arc<IdConfig>,
    display: Arc<DisplayService>,
    storage: Arc<dyn AttachmentStore>,
    directory: Arc<dyn PlayerDirectory>,
    ui: Arc<dyn FormTransport>,
    events: EventBroadcaster,
}

impl CommandRouter {
    /// Build the routing table from the configured alias lists
    pub fn new(
        config: Arc<IdConfig>,
        display: Arc<DisplayService>,
        storage: Arc<dyn AttachmentStore>,
        directory: Arc<dyn PlayerDirectory>,
        ui: Arc<dyn FormTransport>,
        events: EventBroadcaster,
    ) -> Self {
        let mut routes = HashMap::new();
        for alias in &config.commands.id {
            routes.insert(alias.to_lowercase(), CommandKind::ShowSelf);
        }
        for alias in &config.commands.show_id {
            routes.insert(alias.to_lowercase(), CommandKind::ShowOthers);
        }
        for alias in &config.commands.delete_id {
            routes.insert(alias.to_lowercase(), CommandKind::Delete);
        }

        Self {
            routes,
            config,
            display,
            storage,
            directory,
            ui,
            events,
        }
    }

    /// Dispatch a command line such as `/id` or `deleteid bob`
    ///
    /// A leading slash is accepted and stripped; alias matching is
    /// case-insensitive.
    pub async fn dispatch(&self, user: &UserId, input: &str) -> IdResult<CommandOutcome> {
        let input = input.trim().trim_start_matches('/');
        let mut parts = input.split_whitespace();
        let Some(word) = parts.next() else {
            return Ok(CommandOutcome::Unknown);
        };
        let arg = parts.next().unwrap_or_default();

        match self.routes.get(&word.to_lowercase()) {
            Some(CommandKind::ShowSelf) => {
                self.display.show_self(user).await?;
                Ok(CommandOutcome::Handled)
            }
            Some(CommandKind::ShowOthers) => {
                self.display.show_to_others(user).await?;
                Ok(CommandOutcome::Handled)
            }
            Some(CommandKind::Delete) => {
                self.delete(user, arg).await?;
                Ok(CommandOutcome::Handled)
            }
            None => Ok(CommandOutcome::Unknown),
        }
    }

    /// Delete the committed record of the player named by `query`
    ///
    /// The target is resolved by display name or canonical identity; an
    /// unknown target is a silent no-op.
    pub async fn delete(&self, actor: &UserId, query: &str) -> IdResult<()> {
        let Some(target) = self.directory.find_by_name_or_id(query).await? else {
            debug!(%actor, query, "delete target not found");
            return Ok(());
        };

        let removed = self.storage.remove(&target, ATTACHMENT_KEY).await?;
        if removed {
            self.events
                .emit(IdEvent::RecordDeleted { user: target.clone() });
            record_counter("id.records.deleted", 1);
            info!(%actor, %target, "committed record deleted");
        }
        self.ui
            .send_message(actor, &self.config.messages.deleted_id)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Inventory;
    use crate::test_utils::MockHost;

    fn router(host: &Arc<MockHost>, config: IdConfig) -> CommandRouter {
        let config = Arc::new(config);
        let events = EventBroadcaster::default();
        let display = Arc::new(DisplayService::new(
            config.clone(),
            host.clone(),
            host.clone(),
            host.clone(),
            host.clone(),
            events.clone(),
        ));
        CommandRouter::new(
            config,
            display,
            host.clone(),
            host.clone(),
            host.clone(),
            events,
        )
    }

    #[tokio::test]
    async fn test_unknown_alias() {
        let host = MockHost::new();
        let alice = UserId::new("alice");
        host.add_player(&alice, "1", "Alice", [0.0, 0.0, 0.0]);

        let router = router(&host, IdConfig::default());
        assert_eq!(
            router.dispatch(&alice, "/frobnicate").await.unwrap(),
            CommandOutcome::Unknown
        );
    }

    #[tokio::test]
    async fn test_alias_routing_is_case_insensitive() {
        let host = MockHost::new();
        let alice = UserId::new("alice");
        host.add_player(&alice, "1", "Alice", [0.0, 0.0, 0.0]);

        let router = router(&host, IdConfig::default());
        // No record and no card: the command still routes (gate notifies).
        assert_eq!(
            router.dispatch(&alice, "/DNI").await.unwrap(),
            CommandOutcome::Handled
        );
        assert_eq!(
            host.last_message(&alice).unwrap(),
            IdConfig::default().messages.need_id_card
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_target_is_silent() {
        let host = MockHost::new();
        let admin = UserId::new("admin");
        host.add_player(&admin, "1", "Admin", [0.0, 0.0, 0.0]);

        let router = router(&host, IdConfig::default());
        router.dispatch(&admin, "deleteid nobody").await.unwrap();
        assert!(host.last_message(&admin).is_none());
    }

    #[tokio::test]
    async fn test_delete_by_name() {
        let host = MockHost::new();
        let admin = UserId::new("admin");
        let bob = UserId::new("bob");
        host.add_player(&admin, "1", "Admin", [0.0, 0.0, 0.0]);
        host.add_player(&bob, "2", "Bob", [0.0, 0.0, 0.0]);
        host.set_holding(&bob, Some(crate::host::ID_CARD_ITEM));
        host.put_record(
            &bob,
            &crate::core_record::IdRecord {
                first_name: "Bob".to_string(),
                last_name: "Jones".to_string(),
                date_of_birth: "01/01/1980".to_string(),
                ..Default::default()
            },
        );
        assert!(host.holding(&bob, crate::host::ID_CARD_ITEM).await.unwrap());

        let router = router(&host, IdConfig::default());
        router.dispatch(&admin, "deleteid Bob").await.unwrap();

        assert!(host.stored(&bob).is_none());
        assert_eq!(
            host.last_message(&admin).unwrap(),
            IdConfig::default().messages.deleted_id
        );
    }
}
