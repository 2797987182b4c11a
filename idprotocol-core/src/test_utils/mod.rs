//! In-memory host doubles for tests and the scenario harness
//!
//! `MockHost` implements all four collaborator traits against simple maps
//! and records every side effect, so tests can assert on delivered
//! messages, element visibility and granted items without a game server.

use crate::{
    core_record::IdRecord,
    errors::{IdError, IdResult},
    host::{
        AttachmentStore, FormTransport, Inventory, PlayerDirectory, UserId, ATTACHMENT_KEY,
    },
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A connected player known to the mock directory
#[derive(Debug, Clone)]
pub struct MockPlayer {
    pub canonical_id: String,
    pub display_name: String,
    pub position: [f32; 3],
    /// Item currently in hand, if any
    pub holding: Option<String>,
}

/// In-memory implementation of every host collaborator
#[derive(Default)]
pub struct MockHost {
    players: Mutex<HashMap<UserId, MockPlayer>>,
    attachments: Mutex<HashMap<(UserId, String), serde_json::Value>>,
    messages: Mutex<Vec<(UserId, String)>>,
    visible: Mutex<HashMap<(UserId, String), bool>>,
    texts: Mutex<HashMap<(UserId, String), String>>,
    dropdown_choices: Mutex<HashMap<(UserId, String), Vec<String>>>,
    button_callbacks: Mutex<HashMap<(UserId, String), String>>,
    field_requests: Mutex<Vec<(UserId, String, String)>>,
    cursor: Mutex<HashMap<UserId, bool>>,
    grants: Mutex<Vec<(UserId, String, u32)>>,
    interactions: Mutex<Vec<(UserId, String, String)>>,
}

impl MockHost {
    /// Create a shared mock host
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a connected player
    pub fn add_player(
        &self,
        user: &UserId,
        canonical_id: &str,
        display_name: &str,
        position: [f32; 3],
    ) {
        self.players.lock().unwrap().insert(
            user.clone(),
            MockPlayer {
                canonical_id: canonical_id.to_string(),
                display_name: display_name.to_string(),
                position,
                holding: None,
            },
        );
    }

    /// Put an item into (or clear from) a player's hand
    pub fn set_holding(&self, user: &UserId, item: Option<&str>) {
        if let Some(player) = self.players.lock().unwrap().get_mut(user) {
            player.holding = item.map(str::to_string);
        }
    }

    /// Seed a committed record directly, bypassing the pipeline
    pub fn put_record(&self, user: &UserId, record: &IdRecord) {
        let value = serde_json::to_value(record).expect("record serializes");
        self.attachments
            .lock()
            .unwrap()
            .insert((user.clone(), ATTACHMENT_KEY.to_string()), value);
    }

    /// The committed record for `user`, if any
    pub fn stored(&self, user: &UserId) -> Option<IdRecord> {
        self.attachments
            .lock()
            .unwrap()
            .get(&(user.clone(), ATTACHMENT_KEY.to_string()))
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// All messages delivered to `user`, in order
    pub fn messages_for(&self, user: &UserId) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| u == user)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// The most recent message delivered to `user`
    pub fn last_message(&self, user: &UserId) -> Option<String> {
        self.messages_for(user).pop()
    }

    /// Whether a named element is currently shown to `user`
    pub fn is_visible(&self, user: &UserId, element: &str) -> bool {
        self.visible
            .lock()
            .unwrap()
            .get(&(user.clone(), element.to_string()))
            .copied()
            .unwrap_or(false)
    }

    /// The displayed text of a named element for `user`
    pub fn text_of(&self, user: &UserId, element: &str) -> Option<String> {
        self.texts
            .lock()
            .unwrap()
            .get(&(user.clone(), element.to_string()))
            .cloned()
    }

    /// The choice list of a named dropdown for `user`
    pub fn dropdown_choices_of(&self, user: &UserId, element: &str) -> Option<Vec<String>> {
        self.dropdown_choices
            .lock()
            .unwrap()
            .get(&(user.clone(), element.to_string()))
            .cloned()
    }

    /// The callback registered for a named button of `user`
    pub fn button_callback_of(&self, user: &UserId, element: &str) -> Option<String> {
        self.button_callbacks
            .lock()
            .unwrap()
            .get(&(user.clone(), element.to_string()))
            .cloned()
    }

    /// Pending field value requests as (user, element, callback) triples
    pub fn pending_field_requests(&self) -> Vec<(UserId, String, String)> {
        self.field_requests.lock().unwrap().clone()
    }

    /// Whether the cursor is shown for `user`
    pub fn cursor_shown(&self, user: &UserId) -> bool {
        self.cursor
            .lock()
            .unwrap()
            .get(user)
            .copied()
            .unwrap_or(false)
    }

    /// Items granted to `user`, in order
    pub fn grants_for(&self, user: &UserId) -> Vec<(String, u32)> {
        self.grants
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _, _)| u == user)
            .map(|(_, item, amount)| (item.clone(), *amount))
            .collect()
    }

    /// Interactions attached for `user` as (callback, label) pairs
    pub fn interactions_for(&self, user: &UserId) -> Vec<(String, String)> {
        self.interactions
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _, _)| u == user)
            .map(|(_, callback, label)| (callback.clone(), label.clone()))
            .collect()
    }

    fn player(&self, user: &UserId) -> IdResult<MockPlayer> {
        self.players
            .lock()
            .unwrap()
            .get(user)
            .cloned()
            .ok_or_else(|| IdError::PlayerNotFound(user.to_string()))
    }
}

#[async_trait]
impl PlayerDirectory for MockHost {
    async fn canonical_id(&self, user: &UserId) -> IdResult<String> {
        Ok(self.player(user)?.canonical_id)
    }

    async fn display_name(&self, user: &UserId) -> IdResult<String> {
        Ok(self.player(user)?.display_name)
    }

    async fn find_by_name_or_id(&self, query: &str) -> IdResult<Option<UserId>> {
        let players = self.players.lock().unwrap();
        Ok(players
            .iter()
            .find(|(_, p)| p.display_name == query || p.canonical_id == query)
            .map(|(user, _)| user.clone()))
    }

    async fn players_within(&self, user: &UserId, distance: f32) -> IdResult<Vec<UserId>> {
        let origin = self.player(user)?.position;
        let players = self.players.lock().unwrap();
        Ok(players
            .iter()
            .filter(|(other, _)| *other != user)
            .filter(|(_, p)| {
                let dx = p.position[0] - origin[0];
                let dy = p.position[1] - origin[1];
                let dz = p.position[2] - origin[2];
                (dx * dx + dy * dy + dz * dz).sqrt() <= distance
            })
            .map(|(other, _)| other.clone())
            .collect())
    }
}

#[async_trait]
impl AttachmentStore for MockHost {
    async fn fetch(&self, user: &UserId, key: &str) -> IdResult<Option<IdRecord>> {
        let attachments = self.attachments.lock().unwrap();
        match attachments.get(&(user.clone(), key.to_string())) {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| IdError::Storage(e.to_string())),
            None => Ok(None),
        }
    }

    async fn put(&self, user: &UserId, key: &str, record: &IdRecord) -> IdResult<()> {
        let value = serde_json::to_value(record).map_err(|e| IdError::Storage(e.to_string()))?;
        self.attachments
            .lock()
            .unwrap()
            .insert((user.clone(), key.to_string()), value);
        Ok(())
    }

    async fn remove(&self, user: &UserId, key: &str) -> IdResult<bool> {
        Ok(self
            .attachments
            .lock()
            .unwrap()
            .remove(&(user.clone(), key.to_string()))
            .is_some())
    }
}

#[async_trait]
impl Inventory for MockHost {
    async fn holding(&self, user: &UserId, item: &str) -> IdResult<bool> {
        Ok(self
            .player(user)?
            .holding
            .as_deref()
            .is_some_and(|held| held.starts_with(item)))
    }

    async fn grant(&self, user: &UserId, item: &str, amount: u32) -> IdResult<()> {
        self.grants
            .lock()
            .unwrap()
            .push((user.clone(), item.to_string(), amount));
        Ok(())
    }
}

#[async_trait]
impl FormTransport for MockHost {
    async fn display_element(&self, user: &UserId, element: &str, visible: bool) -> IdResult<()> {
        self.visible
            .lock()
            .unwrap()
            .insert((user.clone(), element.to_string()), visible);
        Ok(())
    }

    async fn set_text(&self, user: &UserId, element: &str, value: &str) -> IdResult<()> {
        self.texts
            .lock()
            .unwrap()
            .insert((user.clone(), element.to_string()), value.to_string());
        Ok(())
    }

    async fn set_dropdown_choices(
        &self,
        user: &UserId,
        element: &str,
        choices: &[&str],
    ) -> IdResult<()> {
        self.dropdown_choices.lock().unwrap().insert(
            (user.clone(), element.to_string()),
            choices.iter().map(|c| c.to_string()).collect(),
        );
        Ok(())
    }

    async fn add_button_callback(
        &self,
        user: &UserId,
        element: &str,
        callback: &str,
    ) -> IdResult<()> {
        self.button_callbacks
            .lock()
            .unwrap()
            .insert((user.clone(), element.to_string()), callback.to_string());
        Ok(())
    }

    async fn request_text_field(
        &self,
        user: &UserId,
        element: &str,
        callback: &str,
    ) -> IdResult<()> {
        self.field_requests.lock().unwrap().push((
            user.clone(),
            element.to_string(),
            callback.to_string(),
        ));
        Ok(())
    }

    async fn request_dropdown_value(
        &self,
        user: &UserId,
        element: &str,
        callback: &str,
    ) -> IdResult<()> {
        self.field_requests.lock().unwrap().push((
            user.clone(),
            element.to_string(),
            callback.to_string(),
        ));
        Ok(())
    }

    async fn cursor_visible(&self, user: &UserId, visible: bool) -> IdResult<()> {
        self.cursor.lock().unwrap().insert(user.clone(), visible);
        Ok(())
    }

    async fn add_interaction(&self, user: &UserId, callback: &str, label: &str) -> IdResult<()> {
        self.interactions.lock().unwrap().push((
            user.clone(),
            callback.to_string(),
            label.to_string(),
        ));
        Ok(())
    }

    async fn send_message(&self, user: &UserId, text: &str) -> IdResult<()> {
        self.messages
            .lock()
            .unwrap()
            .push((user.clone(), text.to_string()));
        Ok(())
    }
}
