//! ID pipeline scenario harness
//!
//! Runs a scripted registration and display scenario against the in-memory
//! mock host, printing every message the "players" would see. Useful for
//! eyeballing the pipeline without a game server.

use anyhow::Result;
use clap::Parser;
use idprotocol_core::{
    config::IdConfig,
    host::{elements, UserId},
    logging::{init_logging_with_config, LogConfig, LogLevel},
    plugin::{CallbackEvent, CallbackPayload, IdPlugin, NPC_TAG},
    test_utils::MockHost,
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "test-harness")]
#[command(about = "Scripted ID registration/display scenario", long_about = None)]
struct Args {
    /// Submit grace window in milliseconds
    #[arg(long, default_value = "100")]
    grace_ms: u64,

    /// Auto-close delay in seconds (0 disables auto-close)
    #[arg(long, default_value = "0")]
    close_after_secs: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn text_value(user: &UserId, element: &str, text: &str) -> CallbackEvent {
    CallbackEvent {
        user: user.clone(),
        callback: elements::callbacks::REGISTER_FIELD.to_string(),
        payload: CallbackPayload::Text {
            element: element.to_string(),
            text: text.to_string(),
        },
    }
}

fn click(user: &UserId, element: &str, callback: &str) -> CallbackEvent {
    CallbackEvent {
        user: user.clone(),
        callback: callback.to_string(),
        payload: CallbackPayload::Click {
            element: element.to_string(),
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    init_logging_with_config(LogConfig::new(level))?;
    idprotocol_core::metrics::init_metrics();

    let mut config = IdConfig::default();
    config.submit_grace = Duration::from_millis(args.grace_ms);
    config.close_id_after = Duration::from_secs(args.close_after_secs);

    let host = MockHost::new();
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");
    let carol = UserId::new("carol");
    host.add_player(&alice, "42", "Alice", [0.0, 0.0, 0.0]);
    host.add_player(&bob, "43", "Bob", [10.0, 0.0, 0.0]);
    host.add_player(&carol, "44", "Carol", [100.0, 0.0, 0.0]);

    let plugin = IdPlugin::new(
        Arc::new(config),
        host.clone(),
        host.clone(),
        host.clone(),
        host.clone(),
    );

    println!("== Alice registers a valid ID ==");
    plugin.on_entity_spawn(NPC_TAG, &alice).await?;
    plugin
        .handle_callback(click(&alice, "NPC", elements::callbacks::REGISTER_OPEN))
        .await?;
    plugin
        .handle_callback(click(
            &alice,
            elements::REGISTER_SUBMIT_BUTTON,
            elements::callbacks::REGISTER_SUBMIT,
        ))
        .await?;
    for (element, value) in [
        (elements::FIELD_FIRST_NAME, "aLiCe"),
        (elements::FIELD_LAST_NAME, "smith"),
        (elements::FIELD_DATE_OF_BIRTH, "14/03/1990"),
        (elements::FIELD_ADDRESS, "12 Harbor Street"),
        (elements::FIELD_HEIGHT, "170"),
        (elements::FIELD_WEIGHT, "60"),
    ] {
        plugin.handle_callback(text_value(&alice, element, value)).await?;
    }
    plugin
        .handle_callback(CallbackEvent {
            user: alice.clone(),
            callback: elements::callbacks::REGISTER_SEX.to_string(),
            payload: CallbackPayload::Dropdown {
                element: elements::SEX_DROPDOWN.to_string(),
                index: 1,
            },
        })
        .await?;

    tokio::time::sleep(Duration::from_millis(args.grace_ms + 100)).await;
    match host.stored(&alice) {
        Some(record) => println!(
            "committed: {} {} born {}",
            record.first_name, record.last_name, record.date_of_birth
        ),
        None => println!("no record committed"),
    }

    println!();
    println!("== Bob submits a malformed date ==");
    plugin
        .handle_callback(click(&bob, "NPC", elements::callbacks::REGISTER_OPEN))
        .await?;
    for (element, value) in [
        (elements::FIELD_FIRST_NAME, "Bob"),
        (elements::FIELD_LAST_NAME, "Jones"),
        (elements::FIELD_DATE_OF_BIRTH, "1990-03-14"),
    ] {
        plugin.handle_callback(text_value(&bob, element, value)).await?;
    }
    plugin
        .handle_callback(click(
            &bob,
            elements::REGISTER_SUBMIT_BUTTON,
            elements::callbacks::REGISTER_SUBMIT,
        ))
        .await?;
    tokio::time::sleep(Duration::from_millis(args.grace_ms + 100)).await;
    println!("bob committed: {}", host.stored(&bob).is_some());

    println!();
    println!("== Alice equips her new card and shows her ID around ==");
    host.set_holding(&alice, Some("IDCard"));
    plugin.dispatch_command(&alice, "/showid").await?;

    println!();
    for user in [&alice, &bob, &carol] {
        println!("messages for {}:", user);
        for message in host.messages_for(user) {
            println!("  {}", message);
        }
    }

    Ok(())
}
