//! Application context wiring the ID services to a game host
//!
//! `IdPlugin` is constructed once at startup and owns the configuration, the
//! services and the host collaborator handles. UI callbacks route through an
//! explicit callback-id mapping rather than reflection over handler names.

use crate::{
    commands::{CommandOutcome, CommandRouter},
    config::IdConfig,
    core_display::DisplayService,
    core_registration::{RegistrationService, SEX_CHOICES},
    core_session::{FieldUpdate, SessionStore},
    errors::IdResult,
    events::{EventBroadcaster, IdEvent},
    host::{elements, AttachmentStore, FormTransport, Inventory, PlayerDirectory, UserId},
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Entity tag that marks the registration NPC
pub const NPC_TAG: &str = "IDProtocolNPC";

/// Payload of a host UI callback
#[derive(Debug, Clone)]
pub enum CallbackPayload {
    /// A button was clicked
    Click { element: String },
    /// A requested text field value arrived
    Text { element: String, text: String },
    /// A requested dropdown selection arrived
    Dropdown { element: String, index: usize },
}

/// One UI callback fired by the host
#[derive(Debug, Clone)]
pub struct CallbackEvent {
    pub user: UserId,
    pub callback: String,
    pub payload: CallbackPayload,
}

/// The ID plugin: configuration, services and callback routing
pub struct IdPlugin {
    config: Arc<IdConfig>,
    registration: Arc<RegistrationService>,
    display: Arc<DisplayService>,
    router: CommandRouter,
    events: EventBroadcaster,
    ui: Arc<dyn FormTransport>,
}

impl IdPlugin {
    /// Wire up the plugin against a host
    pub fn new(
        config: Arc<IdConfig>,
        directory: Arc<dyn PlayerDirectory>,
        storage: Arc<dyn AttachmentStore>,
        inventory: Arc<dyn Inventory>,
        ui: Arc<dyn FormTransport>,
    ) -> Self {
        let events = EventBroadcaster::default();
        let sessions = Arc::new(SessionStore::new());

        let registration = Arc::new(RegistrationService::new(
            config.clone(),
            sessions,
            storage.clone(),
            ui.clone(),
            inventory.clone(),
            events.clone(),
        ));
        let display = Arc::new(DisplayService::new(
            config.clone(),
            storage.clone(),
            directory.clone(),
            ui.clone(),
            inventory,
            events.clone(),
        ));
        let router = CommandRouter::new(
            config.clone(),
            display.clone(),
            storage,
            directory,
            ui.clone(),
            events.clone(),
        );

        info!("ID plugin initialized");
        Self {
            config,
            registration,
            display,
            router,
            events,
            ui,
        }
    }

    /// The loaded configuration
    pub fn config(&self) -> &Arc<IdConfig> {
        &self.config
    }

    /// The registration service
    pub fn registration(&self) -> &Arc<RegistrationService> {
        &self.registration
    }

    /// The display service
    pub fn display(&self) -> &Arc<DisplayService> {
        &self.display
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<IdEvent> {
        self.events.subscribe()
    }

    /// Dispatch a chat command line
    pub async fn dispatch_command(&self, user: &UserId, input: &str) -> IdResult<CommandOutcome> {
        self.router.dispatch(user, input).await
    }

    /// Attach the labeled registration interaction when the ID NPC spawns
    pub async fn on_entity_spawn(&self, entity_tag: &str, user: &UserId) -> IdResult<()> {
        if entity_tag == NPC_TAG {
            self.ui
                .add_interaction(
                    user,
                    elements::callbacks::REGISTER_OPEN,
                    &self.config.label_npc,
                )
                .await?;
        }
        Ok(())
    }

    /// Route a host UI callback to its handler
    ///
    /// Unknown callback ids are logged and ignored.
    pub async fn handle_callback(&self, event: CallbackEvent) -> IdResult<()> {
        match event.callback.as_str() {
            elements::callbacks::REGISTER_OPEN => {
                self.registration.request_open(&event.user).await?;
            }
            elements::callbacks::REGISTER_CLOSE => {
                self.registration.cancel(&event.user).await?;
            }
            elements::callbacks::REGISTER_SUBMIT => {
                self.registration.submit(&event.user).await?;
            }
            elements::callbacks::REGISTER_FIELD => {
                if let CallbackPayload::Text { element, text } = event.payload {
                    if let Some(update) = field_update_for(&element, &text) {
                        self.registration.field_delivered(&event.user, update).await;
                    }
                }
            }
            elements::callbacks::REGISTER_SEX => {
                if let CallbackPayload::Dropdown { index, .. } = event.payload {
                    let male = SEX_CHOICES.get(index).is_some_and(|choice| *choice == "Male");
                    self.registration
                        .field_delivered(&event.user, FieldUpdate::Sex(male))
                        .await;
                }
            }
            elements::callbacks::ID_CLOSE => {
                self.display.close(&event.user).await?;
            }
            other => {
                debug!(callback = other, "unhandled callback");
            }
        }
        Ok(())
    }
}

/// Map a form element id and its delivered text onto a typed field update
///
/// Height and weight parse to integers here, at the boundary; a non-numeric
/// value is dropped and the staged field keeps its default.
fn field_update_for(element: &str, text: &str) -> Option<FieldUpdate> {
    match element {
        elements::FIELD_FIRST_NAME => Some(FieldUpdate::FirstName(text.to_string())),
        elements::FIELD_LAST_NAME => Some(FieldUpdate::LastName(text.to_string())),
        elements::FIELD_DATE_OF_BIRTH => Some(FieldUpdate::DateOfBirth(text.to_string())),
        elements::FIELD_ADDRESS => Some(FieldUpdate::Address(text.to_string())),
        elements::FIELD_HEIGHT => match text.trim().parse::<i32>() {
            Ok(value) => Some(FieldUpdate::Height(value)),
            Err(_) => {
                debug!(element, text, "non-numeric height dropped");
                None
            }
        },
        elements::FIELD_WEIGHT => match text.trim().parse::<i32>() {
            Ok(value) => Some(FieldUpdate::Weight(value)),
            Err(_) => {
                debug!(element, text, "non-numeric weight dropped");
                None
            }
        },
        _ => {
            debug!(element, "text value for unknown element");
            None
        }
    }
}
