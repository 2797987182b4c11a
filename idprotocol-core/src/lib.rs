//! In-world identity-document ("ID/DNI") feature for a multiplayer game
//!
//! Players register personal data through a multi-step on-screen form; the
//! data is validated and committed to their persistent profile, and other
//! players can request to view it, scoped by distance and an optional
//! auto-close timer.
//!
//! # Architecture
//!
//! The core is the registration pipeline:
//!
//! - `core_record`: the identity record and its validation rule
//! - `core_session`: transient per-user staging while the form is filled
//! - `core_registration`: open, collect, validate, commit or reject
//! - `core_display`: distance-scoped rendering of committed records
//!
//! Everything the pipeline needs from the game server is behind the trait
//! seams in `host`; `plugin::IdPlugin` wires it all together once at
//! startup.

pub mod commands;
pub mod config;
pub mod core_display;
pub mod core_record;
pub mod core_registration;
pub mod core_session;
pub mod errors;
pub mod events;
pub mod host;
pub mod logging;
pub mod metrics;
pub mod plugin;
pub mod test_utils;

pub use config::IdConfig;
pub use errors::{IdError, IdResult};
pub use logging::{init_logging, LogLevel};
pub use plugin::IdPlugin;
