//! Registration pipeline: open, collect, validate, commit or reject
//!
//! Field values arrive one at a time as asynchronous UI callbacks, so a
//! submit cannot finalize immediately: the client is asked for the current
//! value of every field, the answers trickle in as callbacks, and the
//! finalize pass runs after a short grace window. Values that land during
//! the window are accepted; anything arriving after the session is consumed
//! is absorbed as a no-op.

use crate::{
    config::IdConfig,
    core_session::{FieldUpdate, SessionStore},
    errors::IdResult,
    events::{EventBroadcaster, IdEvent},
    host::{
        elements, AttachmentStore, FormTransport, Inventory, UserId, ATTACHMENT_KEY, ID_CARD_ITEM,
    },
    metrics::record_counter,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Choices for the fixed two-option sex selector, in dropdown order
pub const SEX_CHOICES: [&str; 2] = ["Male", "Female"];

/// Outcome of a form-open request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The form was presented and a fresh session staged
    Opened,
    /// Refused: a committed record exists and overwrite is disabled
    OverwriteRefused,
}

/// Outcome of a finalize pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// The record validated and was committed to the profile store
    Committed,
    /// The record failed validation and was discarded
    Rejected,
    /// No session existed (already consumed by an earlier finalize)
    Stale,
}

/// Orchestrates one registration attempt per user
///
/// Cheap to clone; clones share the session store and collaborators.
#[derive(Clone)]
pub struct RegistrationService {
    config: Arc<IdConfig>,
    sessions: Arc<SessionStore>,
    storage: Arc<dyn AttachmentStore>,
    ui: Arc<dyn FormTransport>,
    inventory: Arc<dyn Inventory>,
    events: EventBroadcaster,
}

impl RegistrationService {
    /// Create a new registration service
    pub fn new(
        config: Arc<IdConfig>,
        sessions: Arc<SessionStore>,
        storage: Arc<dyn AttachmentStore>,
        ui: Arc<dyn FormTransport>,
        inventory: Arc<dyn Inventory>,
        events: EventBroadcaster,
    ) -> Self {
        Self {
            config,
            sessions,
            storage,
            ui,
            inventory,
            events,
        }
    }

    /// Open the registration form for `user`
    ///
    /// Guarded by the overwrite policy: when overwrite is disabled and a
    /// committed record already exists, the request is refused and the user
    /// notified. Otherwise a fresh session is staged (replacing any pending
    /// one, last-open-wins) and the form presented.
    pub async fn request_open(&self, user: &UserId) -> IdResult<OpenOutcome> {
        if !self.config.allow_overwrite
            && self.storage.fetch(user, ATTACHMENT_KEY).await?.is_some()
        {
            warn!(%user, "registration refused: overwrite disabled");
            self.ui
                .send_message(user, &self.config.messages.overwrite_not_allowed)
                .await?;
            return Ok(OpenOutcome::OverwriteRefused);
        }

        self.sessions.open(user).await;

        self.ui
            .display_element(user, elements::REGISTER_FORM, true)
            .await?;
        self.ui
            .set_text(
                user,
                elements::REGISTER_TITLE_LABEL,
                &self.config.label_register_menu_title,
            )
            .await?;
        self.ui
            .add_button_callback(
                user,
                elements::REGISTER_CLOSE_BUTTON,
                elements::callbacks::REGISTER_CLOSE,
            )
            .await?;
        self.ui
            .add_button_callback(
                user,
                elements::REGISTER_SUBMIT_BUTTON,
                elements::callbacks::REGISTER_SUBMIT,
            )
            .await?;
        self.ui
            .set_dropdown_choices(user, elements::SEX_DROPDOWN, &SEX_CHOICES)
            .await?;
        self.ui.cursor_visible(user, true).await?;

        self.events.emit(IdEvent::FormOpened { user: user.clone() });
        record_counter("id.registration.opened", 1);
        info!(%user, "registration form opened");
        Ok(OpenOutcome::Opened)
    }

    /// Apply a field value delivered by the host UI layer
    ///
    /// Delivery is unordered relative to submit; a value arriving after the
    /// session was consumed is dropped silently.
    pub async fn field_delivered(&self, user: &UserId, update: FieldUpdate) {
        if !self.sessions.set_field(user, update).await {
            debug!(%user, "field delivered to a closed session, dropped");
        }
    }

    /// Close the form without submitting
    ///
    /// The staged session entry stays; reopening replaces it.
    pub async fn cancel(&self, user: &UserId) -> IdResult<()> {
        self.ui
            .display_element(user, elements::REGISTER_FORM, false)
            .await?;
        self.ui.cursor_visible(user, false).await
    }

    /// Submit the form
    ///
    /// Asks the client for the current value of every field (answers arrive
    /// as callbacks), hides the form immediately, and schedules the finalize
    /// pass after the configured grace window.
    pub async fn submit(&self, user: &UserId) -> IdResult<()> {
        for field in elements::REGISTER_TEXT_FIELDS {
            self.ui
                .request_text_field(user, field, elements::callbacks::REGISTER_FIELD)
                .await?;
        }
        self.ui
            .request_dropdown_value(
                user,
                elements::SEX_DROPDOWN,
                elements::callbacks::REGISTER_SEX,
            )
            .await?;

        // Hiding the form is a submit side effect, independent of the
        // finalize outcome.
        self.ui
            .display_element(user, elements::REGISTER_FORM, false)
            .await?;
        self.ui.cursor_visible(user, false).await?;

        let service = self.clone();
        let user = user.clone();
        let grace = self.config.submit_grace;
        debug!(%user, ?grace, "submit received, finalize scheduled");
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            if let Err(e) = service.finalize(&user).await {
                error!(%user, error = %e, "finalize failed");
            }
        });

        Ok(())
    }

    /// Validate and commit or reject the staged session
    ///
    /// The session entry is consumed with an atomic take, so of two
    /// concurrent finalize passes only one commits or rejects; the other
    /// finds the session gone and does nothing.
    pub async fn finalize(&self, user: &UserId) -> IdResult<FinalizeOutcome> {
        let Some(record) = self.sessions.take_and_clear(user).await else {
            debug!(%user, "finalize found no session");
            record_counter("id.registration.stale", 1);
            return Ok(FinalizeOutcome::Stale);
        };

        if record.is_valid() {
            self.storage
                .put(user, ATTACHMENT_KEY, &record.normalized())
                .await?;
            self.ui
                .send_message(user, &self.config.messages.success_registration)
                .await?;
            self.inventory.grant(user, ID_CARD_ITEM, 1).await?;

            self.events
                .emit(IdEvent::RegistrationCommitted { user: user.clone() });
            record_counter("id.registration.committed", 1);
            info!(%user, "registration committed");
            Ok(FinalizeOutcome::Committed)
        } else {
            self.ui
                .send_message(user, &self.config.messages.error_register)
                .await?;

            self.events
                .emit(IdEvent::RegistrationRejected { user: user.clone() });
            record_counter("id.registration.rejected", 1);
            info!(%user, "registration rejected by validation");
            Ok(FinalizeOutcome::Rejected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockHost;

    fn service(host: &Arc<MockHost>, config: IdConfig) -> Arc<RegistrationService> {
        Arc::new(RegistrationService::new(
            Arc::new(config),
            Arc::new(SessionStore::new()),
            host.clone(),
            host.clone(),
            host.clone(),
            EventBroadcaster::default(),
        ))
    }

    fn deliver_valid_fields() -> Vec<FieldUpdate> {
        vec![
            FieldUpdate::FirstName("alice".to_string()),
            FieldUpdate::LastName("smith".to_string()),
            FieldUpdate::DateOfBirth("14/03/1990".to_string()),
            FieldUpdate::Address("12 Harbor Street".to_string()),
            FieldUpdate::Height(170),
            FieldUpdate::Weight(60),
            FieldUpdate::Sex(false),
        ]
    }

    #[tokio::test]
    async fn test_open_commit_grants_card() {
        let host = MockHost::new();
        let alice = UserId::new("alice");
        host.add_player(&alice, "1", "Alice", [0.0, 0.0, 0.0]);
        let service = service(&host, IdConfig::default());

        assert_eq!(
            service.request_open(&alice).await.unwrap(),
            OpenOutcome::Opened
        );
        for update in deliver_valid_fields() {
            service.field_delivered(&alice, update).await;
        }

        assert_eq!(
            service.finalize(&alice).await.unwrap(),
            FinalizeOutcome::Committed
        );

        let stored = host.stored(&alice).unwrap();
        assert_eq!(stored.first_name, "Alice");
        assert_eq!(stored.last_name, "Smith");
        assert_eq!(host.grants_for(&alice), vec![(ID_CARD_ITEM.to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_invalid_record_rejected() {
        let host = MockHost::new();
        let alice = UserId::new("alice");
        host.add_player(&alice, "1", "Alice", [0.0, 0.0, 0.0]);
        let service = service(&host, IdConfig::default());

        service.request_open(&alice).await.unwrap();
        service
            .field_delivered(&alice, FieldUpdate::FirstName("Alice".to_string()))
            .await;
        // Last name and date of birth never delivered: record is invalid.

        assert_eq!(
            service.finalize(&alice).await.unwrap(),
            FinalizeOutcome::Rejected
        );
        assert!(host.stored(&alice).is_none());
        assert!(host.grants_for(&alice).is_empty());
        assert_eq!(
            host.last_message(&alice).unwrap(),
            IdConfig::default().messages.error_register
        );
    }

    #[tokio::test]
    async fn test_duplicate_finalize_is_stale() {
        let host = MockHost::new();
        let alice = UserId::new("alice");
        host.add_player(&alice, "1", "Alice", [0.0, 0.0, 0.0]);
        let service = service(&host, IdConfig::default());

        service.request_open(&alice).await.unwrap();
        for update in deliver_valid_fields() {
            service.field_delivered(&alice, update).await;
        }

        assert_eq!(
            service.finalize(&alice).await.unwrap(),
            FinalizeOutcome::Committed
        );
        assert_eq!(
            service.finalize(&alice).await.unwrap(),
            FinalizeOutcome::Stale
        );
        assert_eq!(host.grants_for(&alice).len(), 1);
    }

    #[tokio::test]
    async fn test_overwrite_policy() {
        let host = MockHost::new();
        let alice = UserId::new("alice");
        host.add_player(&alice, "1", "Alice", [0.0, 0.0, 0.0]);
        let service = service(&host, IdConfig::default());

        service.request_open(&alice).await.unwrap();
        for update in deliver_valid_fields() {
            service.field_delivered(&alice, update).await;
        }
        service.finalize(&alice).await.unwrap();

        // Overwrite disabled by default: the second open is refused.
        assert_eq!(
            service.request_open(&alice).await.unwrap(),
            OpenOutcome::OverwriteRefused
        );
        assert_eq!(
            host.last_message(&alice).unwrap(),
            IdConfig::default().messages.overwrite_not_allowed
        );
    }

    #[tokio::test]
    async fn test_overwrite_allowed_by_config() {
        let host = MockHost::new();
        let alice = UserId::new("alice");
        host.add_player(&alice, "1", "Alice", [0.0, 0.0, 0.0]);

        let mut config = IdConfig::default();
        config.allow_overwrite = true;
        let service = service(&host, config);

        service.request_open(&alice).await.unwrap();
        for update in deliver_valid_fields() {
            service.field_delivered(&alice, update).await;
        }
        service.finalize(&alice).await.unwrap();

        assert_eq!(
            service.request_open(&alice).await.unwrap(),
            OpenOutcome::Opened
        );
    }

    #[tokio::test]
    async fn test_sex_choices_order() {
        // The dropdown contract: index 0 is "Male", which maps to true.
        assert_eq!(SEX_CHOICES, ["Male", "Female"]);
    }
}
