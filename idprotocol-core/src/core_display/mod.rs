//! Distance-scoped display of committed identity records
//!
//! Reads the durable record, re-validates it, stamps the holder's canonical
//! identity and renders it to one or more viewers. Purely presentational:
//! this module never writes the profile store.

use crate::{
    config::IdConfig,
    core_record::IdRecord,
    errors::IdResult,
    events::{EventBroadcaster, IdEvent},
    host::{
        elements, AttachmentStore, FormTransport, Inventory, PlayerDirectory, UserId,
        ATTACHMENT_KEY, ID_CARD_ITEM,
    },
    metrics::record_counter,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a display request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOutcome {
    /// The record was rendered
    Displayed { viewers: usize },
    /// No committed record exists
    DoesNotExist,
    /// A committed record exists but no longer passes validation
    NotValid,
    /// The required ID card is not held
    MissingCapability,
}

/// Renders committed records to viewers
pub struct DisplayService {
    config: Arc<IdConfig>,
    storage: Arc<dyn AttachmentStore>,
    directory: Arc<dyn PlayerDirectory>,
    ui: Arc<dyn FormTransport>,
    inventory: Arc<dyn Inventory>,
    events: EventBroadcaster,
}

impl DisplayService {
    /// Create a new display service
    pub fn new(
        config: Arc<IdConfig>,
        storage: Arc<dyn AttachmentStore>,
        directory: Arc<dyn PlayerDirectory>,
        ui: Arc<dyn FormTransport>,
        inventory: Arc<dyn Inventory>,
        events: EventBroadcaster,
    ) -> Self {
        Self {
            config,
            storage,
            directory,
            ui,
            inventory,
            events,
        }
    }

    /// Capability gate: the ID card must be in hand when the config requires it
    ///
    /// Notifies the user on failure, so callers only need to abort.
    async fn has_id_card(&self, user: &UserId) -> IdResult<bool> {
        if self.config.require_id_card && !self.inventory.holding(user, ID_CARD_ITEM).await? {
            self.ui
                .send_message(user, &self.config.messages.need_id_card)
                .await?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Display the user's own ID to themselves
    pub async fn show_self(&self, user: &UserId) -> IdResult<DisplayOutcome> {
        if !self.has_id_card(user).await? {
            return Ok(DisplayOutcome::MissingCapability);
        }

        let Some(record) = self.storage.fetch(user, ATTACHMENT_KEY).await? else {
            self.ui
                .send_message(user, &self.config.messages.id_does_not_exist)
                .await?;
            return Ok(DisplayOutcome::DoesNotExist);
        };

        // A committed record can stop validating after manual edits to the
        // profile store; re-check before rendering.
        if !record.is_valid() {
            self.ui
                .send_message(user, &self.config.messages.id_is_not_valid)
                .await?;
            return Ok(DisplayOutcome::NotValid);
        }

        let mut record = record;
        record.id = self.directory.canonical_id(user).await?;

        self.render_to(user, &record).await?;
        self.ui
            .send_message(user, &self.config.messages.displaying_id)
            .await?;

        self.events.emit(IdEvent::RecordDisplayed {
            user: user.clone(),
            viewers: 1,
        });
        record_counter("id.display.self", 1);
        info!(%user, "ID displayed to holder");
        Ok(DisplayOutcome::Displayed { viewers: 1 })
    }

    /// Show the user's ID to every player within the configured distance
    ///
    /// Each viewer gets the rendered record, a notification naming the
    /// holder, and an independent auto-close timer. The holder also sees
    /// their own ID via `show_self`.
    pub async fn show_to_others(&self, user: &UserId) -> IdResult<DisplayOutcome> {
        if !self.has_id_card(user).await? {
            return Ok(DisplayOutcome::MissingCapability);
        }

        let Some(record) = self.storage.fetch(user, ATTACHMENT_KEY).await? else {
            return Ok(DisplayOutcome::DoesNotExist);
        };
        if !record.is_valid() {
            return Ok(DisplayOutcome::NotValid);
        }

        let mut record = record;
        record.id = self.directory.canonical_id(user).await?;

        let viewers = self
            .directory
            .players_within(user, self.config.show_distance)
            .await?;
        let holder_name = self.directory.display_name(user).await?;
        let notification = self.config.messages.format_show_id(&holder_name);

        for viewer in &viewers {
            self.render_to(viewer, &record).await?;
            self.ui.send_message(viewer, &notification).await?;
        }

        self.events.emit(IdEvent::RecordDisplayed {
            user: user.clone(),
            viewers: viewers.len(),
        });
        record_counter("id.display.others", 1);
        info!(%user, viewers = viewers.len(), "ID shown to nearby players");

        // The holder sees their own ID as part of showing it around.
        self.show_self(user).await?;

        Ok(DisplayOutcome::Displayed {
            viewers: viewers.len() + 1,
        })
    }

    /// Hide the ID view (close-button handler)
    pub async fn close(&self, user: &UserId) -> IdResult<()> {
        self.ui
            .display_element(user, elements::ID_VIEW, false)
            .await
    }

    /// Render the record to a single viewer and arm its auto-close timer
    async fn render_to(&self, viewer: &UserId, record: &IdRecord) -> IdResult<()> {
        self.ui
            .display_element(viewer, elements::ID_VIEW, true)
            .await?;
        self.ui
            .add_button_callback(
                viewer,
                elements::ID_CLOSE_BUTTON,
                elements::callbacks::ID_CLOSE,
            )
            .await?;

        self.ui
            .set_text(viewer, elements::VIEW_TITLE_LABEL, &self.config.id_title)
            .await?;
        self.ui.set_text(viewer, elements::VIEW_ID, &record.id).await?;
        self.ui
            .set_text(viewer, elements::VIEW_FIRST_NAME, &record.first_name)
            .await?;
        self.ui
            .set_text(viewer, elements::VIEW_LAST_NAME, &record.last_name)
            .await?;
        self.ui
            .set_text(viewer, elements::VIEW_DATE_OF_BIRTH, &record.date_of_birth)
            .await?;
        self.ui
            .set_text(viewer, elements::VIEW_ADDRESS, &record.address)
            .await?;
        self.ui
            .set_text(viewer, elements::VIEW_SEX, record.sex_label())
            .await?;
        self.ui
            .set_text(viewer, elements::VIEW_HEIGHT, &record.height.to_string())
            .await?;
        self.ui
            .set_text(viewer, elements::VIEW_WEIGHT, &record.weight.to_string())
            .await?;

        self.arm_auto_close(viewer);
        Ok(())
    }

    /// Schedule the auto-close for one viewer's display
    ///
    /// A zero delay disables auto-close entirely. The delayed hide is
    /// idempotent: firing against an already-closed view is a no-op on the
    /// host side.
    fn arm_auto_close(&self, viewer: &UserId) {
        let delay = self.config.close_id_after;
        if delay.is_zero() {
            return;
        }

        let ui = Arc::clone(&self.ui);
        let viewer = viewer.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = ui.display_element(&viewer, elements::ID_VIEW, false).await {
                debug!(%viewer, error = %e, "auto-close failed");
            }
        });
    }
}
