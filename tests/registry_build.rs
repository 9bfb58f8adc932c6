//! Registry construction across features.

mod common;

use common::{Calls, RecordingSession, command_event};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;
use switchyard::error::{BuildError, HandlerResult};
use switchyard::features::{Feature, active_features};
use switchyard::handlers::{Context, Dispatcher, Registry, RouteCategory};
use switchyard::proto::{ApplicationCommand, EventKind, GatewayEvent, Intents, Interaction};

async fn noop(_ctx: Context, _interaction: Arc<Interaction>) -> HandlerResult {
    Ok(())
}

async fn noop_event(_ctx: Context, _event: Arc<GatewayEvent>) -> HandlerResult {
    Ok(())
}

#[test]
fn conflicting_features_fail_before_dispatch() {
    let echo = Feature::new("Echo")
        .command(ApplicationCommand::chat_input("ping", "Echo ping"))
        .on_command("ping", noop);

    let mut features = active_features();
    features.push(echo);

    let err = Registry::build(features).unwrap_err();
    let BuildError::Conflict {
        category,
        id,
        feature,
        registered_by,
    } = &err;
    assert_eq!(*category, RouteCategory::ApplicationCommand);
    assert_eq!(id, "ping");
    assert_eq!(feature, "Echo");
    assert_eq!(registered_by, "Ping");
    assert_eq!(
        err.to_string(),
        "application-command handler with ID 'ping' from feature 'Echo' is already registered by feature 'Ping'"
    );
}

#[test]
fn first_conflict_in_activation_order_is_reported() {
    let a = Feature::new("A").on_component("x", noop).on_modal("y", noop);
    let b = Feature::new("B").on_component("x", noop);
    let c = Feature::new("C").on_modal("y", noop);

    let err = Registry::build([a, b, c]).unwrap_err();
    assert!(matches!(
        err,
        BuildError::Conflict { category: RouteCategory::Component, ref feature, .. } if feature == "B"
    ));
}

#[test]
fn intents_and_commands_merge_in_order() {
    let moderation = Feature::new("Moderation")
        .intents(Intents::GUILDS | Intents::GUILD_MEMBERS)
        .command(ApplicationCommand::chat_input("kick", "Kick a member"))
        .on_command("kick", noop);
    let logging = Feature::new("Logging")
        .intents(Intents::GUILD_MESSAGES | Intents::MESSAGE_CONTENT)
        .on_event(EventKind::MessageCreate, noop_event)
        .on_event(EventKind::MessageDelete, noop_event);

    let mut features = active_features();
    features.push(moderation);
    features.push(logging);
    let registry = Registry::build(features).unwrap();

    let expected = Intents::GUILDS
        | Intents::GUILD_MEMBERS
        | Intents::GUILD_MESSAGES
        | Intents::MESSAGE_CONTENT;
    assert_eq!(registry.intents(), expected);

    let names: Vec<_> = registry.commands().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["ping", "kick"]);
    assert_eq!(
        registry.route_keys(RouteCategory::ApplicationCommand),
        vec!["kick", "ping"]
    );
    assert_eq!(registry.event_handler_count(), 2);
    assert_eq!(
        registry.feature_names().collect::<Vec<_>>(),
        vec!["Ping", "Moderation", "Logging"]
    );
}

#[test]
fn duplicate_feature_names_are_allowed() {
    let a = Feature::new("Twin").on_command("one", noop);
    let b = Feature::new("Twin").on_command("two", noop);
    let registry = Registry::build([a, b]).unwrap();
    assert_eq!(registry.route_count(RouteCategory::ApplicationCommand), 2);
}

#[tokio::test]
async fn build_then_dispatch_end_to_end() {
    let calls = Calls::default();
    let registry = Registry::build(vec![
        Feature::new("Counter").on_command("count", calls.interaction_handler()),
    ])
    .unwrap();
    let dispatcher = Dispatcher::new(Arc::new(registry), Arc::new(RecordingSession::new()));

    dispatcher.dispatch(command_event("count")).join().await;
    dispatcher.dispatch(command_event("count")).join().await;
    assert_eq!(calls.count(), 2);
}

proptest! {
    #[test]
    fn build_succeeds_iff_keys_are_disjoint(
        left in prop::collection::btree_set("[a-d]{1,2}", 0..6),
        right in prop::collection::btree_set("[a-d]{1,2}", 0..6),
    ) {
        let feature = |name: &str, keys: &BTreeSet<String>| {
            keys.iter()
                .fold(Feature::new(name), |f, key| f.on_component(key.clone(), noop))
        };

        let result = Registry::build([feature("L", &left), feature("R", &right)]);
        let disjoint = left.is_disjoint(&right);
        prop_assert_eq!(result.is_ok(), disjoint);

        if let Ok(registry) = result {
            prop_assert_eq!(
                registry.route_count(RouteCategory::Component),
                left.len() + right.len()
            );
        }
    }
}
