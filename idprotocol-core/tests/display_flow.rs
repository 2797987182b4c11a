//! Display controller tests: self display, distance-scoped fan-out,
//! auto-close, and deletion.

use idprotocol_core::{
    config::IdConfig,
    core_display::DisplayOutcome,
    core_record::IdRecord,
    host::{elements, UserId, ID_CARD_ITEM},
    plugin::{CallbackEvent, CallbackPayload, IdPlugin},
    test_utils::MockHost,
};
use std::sync::Arc;
use std::time::Duration;

fn committed_record() -> IdRecord {
    IdRecord {
        id: String::new(),
        first_name: "Alice".to_string(),
        last_name: "Smith".to_string(),
        date_of_birth: "14/03/1990".to_string(),
        address: "12 Harbor Street".to_string(),
        sex: false,
        height: 170,
        weight: 60,
    }
}

fn plugin_with(host: &Arc<MockHost>, config: IdConfig) -> IdPlugin {
    IdPlugin::new(
        Arc::new(config),
        host.clone(),
        host.clone(),
        host.clone(),
        host.clone(),
    )
}

fn holder(host: &Arc<MockHost>) -> UserId {
    let alice = UserId::new("alice");
    host.add_player(&alice, "42", "Alice", [0.0, 0.0, 0.0]);
    host.set_holding(&alice, Some(ID_CARD_ITEM));
    host.put_record(&alice, &committed_record());
    alice
}

#[tokio::test]
async fn test_round_trip_stamps_identity_key_only() {
    let host = MockHost::new();
    let alice = holder(&host);
    let plugin = plugin_with(&host, IdConfig::default());

    let outcome = plugin.display().show_self(&alice).await.unwrap();
    assert_eq!(outcome, DisplayOutcome::Displayed { viewers: 1 });

    // Every rendered field equals the committed one except the identity
    // key, which is populated with the canonical identity.
    let record = committed_record();
    assert_eq!(host.text_of(&alice, elements::VIEW_ID).unwrap(), "42");
    assert_eq!(
        host.text_of(&alice, elements::VIEW_FIRST_NAME).unwrap(),
        record.first_name
    );
    assert_eq!(
        host.text_of(&alice, elements::VIEW_LAST_NAME).unwrap(),
        record.last_name
    );
    assert_eq!(
        host.text_of(&alice, elements::VIEW_DATE_OF_BIRTH).unwrap(),
        record.date_of_birth
    );
    assert_eq!(
        host.text_of(&alice, elements::VIEW_ADDRESS).unwrap(),
        record.address
    );
    assert_eq!(host.text_of(&alice, elements::VIEW_SEX).unwrap(), "F");
    assert_eq!(host.text_of(&alice, elements::VIEW_HEIGHT).unwrap(), "170");
    assert_eq!(host.text_of(&alice, elements::VIEW_WEIGHT).unwrap(), "60");
    assert_eq!(
        host.last_message(&alice).unwrap(),
        IdConfig::default().messages.displaying_id
    );
}

#[tokio::test]
async fn test_show_to_others_is_distance_scoped() {
    let host = MockHost::new();
    let alice = holder(&host);

    let near = UserId::new("near");
    let far = UserId::new("far");
    host.add_player(&near, "2", "Near", [29.0, 0.0, 0.0]);
    host.add_player(&far, "3", "Far", [31.0, 0.0, 0.0]);

    let plugin = plugin_with(&host, IdConfig::default());
    let outcome = plugin.display().show_to_others(&alice).await.unwrap();

    // The near viewer and the holder; the far viewer is excluded.
    assert_eq!(outcome, DisplayOutcome::Displayed { viewers: 2 });

    assert!(host.is_visible(&near, elements::ID_VIEW));
    assert_eq!(
        host.last_message(&near).unwrap(),
        "Alice is displaying their ID to you"
    );

    assert!(!host.is_visible(&far, elements::ID_VIEW));
    assert!(host.messages_for(&far).is_empty());

    // The holder also sees their own ID (show-to-others includes self).
    assert!(host.is_visible(&alice, elements::ID_VIEW));
    assert_eq!(
        host.last_message(&alice).unwrap(),
        IdConfig::default().messages.displaying_id
    );
}

#[tokio::test]
async fn test_show_to_others_without_record_is_silent() {
    let host = MockHost::new();
    let alice = UserId::new("alice");
    host.add_player(&alice, "42", "Alice", [0.0, 0.0, 0.0]);
    host.set_holding(&alice, Some(ID_CARD_ITEM));

    let plugin = plugin_with(&host, IdConfig::default());
    let outcome = plugin.display().show_to_others(&alice).await.unwrap();

    // Only the self path reports missing records.
    assert_eq!(outcome, DisplayOutcome::DoesNotExist);
    assert!(host.messages_for(&alice).is_empty());
}

#[tokio::test]
async fn test_auto_close_disabled_when_zero() {
    let host = MockHost::new();
    let alice = holder(&host);

    // Default close_id_after is zero: no timer is armed.
    let plugin = plugin_with(&host, IdConfig::default());
    plugin.display().show_self(&alice).await.unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(host.is_visible(&alice, elements::ID_VIEW));
}

#[tokio::test]
async fn test_auto_close_hides_view() {
    let host = MockHost::new();
    let alice = holder(&host);

    let mut config = IdConfig::default();
    config.close_id_after = Duration::from_millis(40);
    let plugin = plugin_with(&host, config);

    plugin.display().show_self(&alice).await.unwrap();
    assert!(host.is_visible(&alice, elements::ID_VIEW));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!host.is_visible(&alice, elements::ID_VIEW));
}

#[tokio::test]
async fn test_close_button_hides_view() {
    let host = MockHost::new();
    let alice = holder(&host);
    let plugin = plugin_with(&host, IdConfig::default());

    plugin.display().show_self(&alice).await.unwrap();
    assert_eq!(
        host.button_callback_of(&alice, elements::ID_CLOSE_BUTTON)
            .unwrap(),
        elements::callbacks::ID_CLOSE
    );

    plugin
        .handle_callback(CallbackEvent {
            user: alice.clone(),
            callback: elements::callbacks::ID_CLOSE.to_string(),
            payload: CallbackPayload::Click {
                element: elements::ID_CLOSE_BUTTON.to_string(),
            },
        })
        .await
        .unwrap();

    assert!(!host.is_visible(&alice, elements::ID_VIEW));
}

#[tokio::test]
async fn test_delete_then_show_reports_does_not_exist() {
    let host = MockHost::new();
    let alice = holder(&host);
    let admin = UserId::new("admin");
    host.add_player(&admin, "1", "Admin", [0.0, 0.0, 0.0]);

    let plugin = plugin_with(&host, IdConfig::default());
    plugin.dispatch_command(&admin, "/deleteid Alice").await.unwrap();
    assert_eq!(
        host.last_message(&admin).unwrap(),
        IdConfig::default().messages.deleted_id
    );

    // Not "not valid": the record is gone entirely.
    let outcome = plugin.display().show_self(&alice).await.unwrap();
    assert_eq!(outcome, DisplayOutcome::DoesNotExist);
    assert_eq!(
        host.last_message(&alice).unwrap(),
        IdConfig::default().messages.id_does_not_exist
    );
}

#[tokio::test]
async fn test_display_events_are_emitted() {
    let host = MockHost::new();
    let alice = holder(&host);
    let plugin = plugin_with(&host, IdConfig::default());

    let mut rx = plugin.subscribe();
    plugin.display().show_self(&alice).await.unwrap();

    let event = rx.recv().await.unwrap();
    assert_eq!(event.user().as_str(), "alice");
}
