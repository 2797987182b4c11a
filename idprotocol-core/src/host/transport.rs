//! Form/UI transport and the notification channel

use super::UserId;
use crate::errors::IdResult;
use async_trait::async_trait;

/// Form/UI transport provided by the host
///
/// Field reads are asynchronous: `request_text_field` and
/// `request_dropdown_value` only ask the client for the current value. The
/// answer arrives later as a callback carrying the registered callback id,
/// which is why submission finalizes on a grace delay rather than
/// immediately.
#[async_trait]
pub trait FormTransport: Send + Sync {
    /// Show or hide a named visual element
    async fn display_element(&self, user: &UserId, element: &str, visible: bool) -> IdResult<()>;

    /// Set the displayed text of a named element
    async fn set_text(&self, user: &UserId, element: &str, value: &str) -> IdResult<()>;

    /// Populate a named dropdown's choice list
    async fn set_dropdown_choices(
        &self,
        user: &UserId,
        element: &str,
        choices: &[&str],
    ) -> IdResult<()>;

    /// Register a callback id to fire when a named button is clicked
    async fn add_button_callback(
        &self,
        user: &UserId,
        element: &str,
        callback: &str,
    ) -> IdResult<()>;

    /// Ask the client for the current value of a named text field
    async fn request_text_field(&self, user: &UserId, element: &str, callback: &str)
        -> IdResult<()>;

    /// Ask the client for the selected index of a named dropdown
    async fn request_dropdown_value(
        &self,
        user: &UserId,
        element: &str,
        callback: &str,
    ) -> IdResult<()>;

    /// Show or hide the user's cursor
    async fn cursor_visible(&self, user: &UserId, visible: bool) -> IdResult<()>;

    /// Attach a labeled interaction to the user's current target entity
    ///
    /// Used to expose the registration action on the ID NPC.
    async fn add_interaction(&self, user: &UserId, callback: &str, label: &str) -> IdResult<()>;

    /// Deliver a user-facing text message
    async fn send_message(&self, user: &UserId, text: &str) -> IdResult<()>;
}
