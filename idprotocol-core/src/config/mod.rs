//! Configuration management for the ID plugin
//!
//! Configuration is loaded once at startup and stays static for the life of
//! the process. A missing file is replaced with the documented defaults and
//! persisted, so server operators always have a file to edit.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

mod error;

pub use error::ConfigError;

/// Main plugin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdConfig {
    /// Title shown at the top of displayed IDs
    pub id_title: String,

    /// Delay after which a displayed ID closes on its own (zero disables auto-close)
    #[serde(with = "humantime_serde")]
    pub close_id_after: Duration,

    /// Grace window between submit and finalize, letting in-flight field
    /// values land before the record is validated
    #[serde(with = "humantime_serde")]
    pub submit_grace: Duration,

    /// Maximum distance in game units at which an ID can be shown to others
    pub show_distance: f32,

    /// Interaction label attached to the registration NPC
    pub label_npc: String,

    /// Title label on the registration menu
    pub label_register_menu_title: String,

    /// Allow re-registering over an existing committed record
    pub allow_overwrite: bool,

    /// Require the ID card item in hand for the display commands
    pub require_id_card: bool,

    /// Chat command aliases
    pub commands: CommandAliases,

    /// User-facing message templates
    pub messages: Messages,
}

/// Chat command aliases, one list per command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandAliases {
    /// Display your own ID
    pub id: Vec<String>,

    /// Show your ID to nearby players
    pub show_id: Vec<String>,

    /// Delete a player's ID
    pub delete_id: Vec<String>,
}

/// User-facing message templates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Messages {
    /// Submitted data failed validation
    pub error_register: String,

    /// Registration committed
    pub success_registration: String,

    /// No committed record exists
    pub id_does_not_exist: String,

    /// Committed record no longer passes validation
    pub id_is_not_valid: String,

    /// Registration refused because a record already exists
    pub overwrite_not_allowed: String,

    /// A record was deleted
    pub deleted_id: String,

    /// The ID card item is required but not held
    pub need_id_card: String,

    /// The user displayed their own ID
    pub displaying_id: String,

    /// Delivered to nearby viewers; `{0}` is the holder's display name
    pub show_id: String,
}

impl Messages {
    /// Fill the `{0}` placeholder of the show template with a display name
    pub fn format_show_id(&self, display_name: &str) -> String {
        self.show_id.replace("{0}", display_name)
    }
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            id_title: "Example ID Title".to_string(),
            close_id_after: Duration::ZERO,
            submit_grace: Duration::from_secs(1),
            show_distance: 30.0,
            label_npc: "Register DNI".to_string(),
            label_register_menu_title: "Register DNI Title".to_string(),
            allow_overwrite: false,
            require_id_card: true,
            commands: CommandAliases::default(),
            messages: Messages::default(),
        }
    }
}

impl Default for CommandAliases {
    fn default() -> Self {
        Self {
            id: vec!["id".to_string(), "dni".to_string()],
            show_id: vec!["showid".to_string(), "showdni".to_string()],
            delete_id: vec!["deleteid".to_string(), "deletedni".to_string()],
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            error_register: "Registration failed, try again using the correct format."
                .to_string(),
            success_registration: "Registration successful! Try your ID with /id".to_string(),
            id_does_not_exist: "Your ID does not exist, try to register it!".to_string(),
            id_is_not_valid: "Your ID is not valid, contact the staff".to_string(),
            overwrite_not_allowed: "You already have an ID, overwrite is not enabled".to_string(),
            deleted_id: "You have deleted the ID of the player".to_string(),
            need_id_card: "You need an ID card to run this command".to_string(),
            displaying_id: "You have displayed your ID".to_string(),
            show_id: "{0} is displaying their ID to you".to_string(),
        }
    }
}

impl IdConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError(e.to_string()))?;

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, generating and persisting the defaults when the file is missing
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        let config = Self::default();
        config.save_to_file(path)?;
        info!(path = %path.display(), "Generated a new configuration file");
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, contents).map_err(|e| ConfigError::FileWriteError(e.to_string()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.show_distance.is_finite() || self.show_distance < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "show_distance must be a non-negative number".to_string(),
            ));
        }

        for (name, aliases) in [
            ("commands.id", &self.commands.id),
            ("commands.show_id", &self.commands.show_id),
            ("commands.delete_id", &self.commands.delete_id),
        ] {
            if aliases.is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "{} must have at least one alias",
                    name
                )));
            }
        }

        for (name, message) in [
            ("error_register", &self.messages.error_register),
            ("success_registration", &self.messages.success_registration),
            ("id_does_not_exist", &self.messages.id_does_not_exist),
            ("id_is_not_valid", &self.messages.id_is_not_valid),
            ("overwrite_not_allowed", &self.messages.overwrite_not_allowed),
            ("deleted_id", &self.messages.deleted_id),
            ("need_id_card", &self.messages.need_id_card),
            ("displaying_id", &self.messages.displaying_id),
            ("show_id", &self.messages.show_id),
        ] {
            if message.is_empty() {
                return Err(ConfigError::ValidationFailed(format!(
                    "messages.{} must not be empty",
                    name
                )));
            }
        }

        Ok(())
    }
}
