//! Dispatch routing and per-handler isolation.

mod common;

use common::{
    Calls, RecordingSession, autocomplete_event, command_event, component_event, interaction,
    message_event, modal_event,
};
use std::sync::Arc;
use std::time::Duration;
use switchyard::error::{HandlerError, HandlerResult};
use switchyard::features::Feature;
use switchyard::handlers::{Context, Dispatcher, HandlerOutcome, Registry, Route, RouteCategory};
use switchyard::proto::{EventKind, GatewayEvent, Interaction, InteractionKind};
use tokio::sync::Notify;

fn dispatcher(features: Vec<Feature>) -> Dispatcher {
    let registry = Registry::build(features).expect("features should not conflict");
    Dispatcher::new(Arc::new(registry), Arc::new(RecordingSession::new()))
}

async fn explode(_ctx: Context, _event: Arc<GatewayEvent>) -> HandlerResult {
    panic!("feature A exploded")
}

async fn fail(_ctx: Context, _interaction: Arc<Interaction>) -> HandlerResult {
    Err(HandlerError::Internal("database unavailable".into()))
}

#[tokio::test]
async fn routed_command_runs_once_and_unknown_is_dropped() {
    let calls = Calls::default();
    let dispatcher = dispatcher(vec![
        Feature::new("Ping").on_command("ping", calls.interaction_handler()),
    ]);

    let dispatched = dispatcher.dispatch(command_event("ping"));
    assert_eq!(dispatched.launched(), 1);
    assert_eq!(dispatched.join().await, vec![HandlerOutcome::Completed]);
    assert_eq!(calls.count(), 1);

    let dispatched = dispatcher.dispatch(command_event("pong"));
    assert_eq!(dispatched.launched(), 0);
    assert!(dispatched.join().await.is_empty());
    assert_eq!(calls.count(), 1);

    let stats = dispatcher.stats();
    assert_eq!(stats.events, 2);
    assert_eq!(stats.matched, 1);
    assert_eq!(stats.unmatched, 1);
    assert_eq!(stats.completed, 1);
}

#[tokio::test]
async fn categories_are_separate_namespaces() {
    let command = Calls::default();
    let component = Calls::default();
    let modal = Calls::default();
    let autocomplete = Calls::default();
    let dispatcher = dispatcher(vec![
        Feature::new("Confirm")
            .on_command("confirm", command.interaction_handler())
            .on_component("confirm", component.interaction_handler())
            .on_modal("confirm", modal.interaction_handler())
            .on_autocomplete("confirm", autocomplete.interaction_handler()),
    ]);

    dispatcher.dispatch(component_event("confirm")).join().await;
    assert_eq!(
        (command.count(), component.count(), modal.count(), autocomplete.count()),
        (0, 1, 0, 0)
    );

    dispatcher.dispatch(modal_event("confirm")).join().await;
    dispatcher.dispatch(autocomplete_event("confirm")).join().await;
    dispatcher.dispatch(command_event("confirm")).join().await;
    assert_eq!(
        (command.count(), component.count(), modal.count(), autocomplete.count()),
        (1, 1, 1, 1)
    );
}

#[tokio::test]
async fn platform_ping_and_keyless_interactions_are_dropped() {
    let calls = Calls::default();
    let dispatcher = dispatcher(vec![
        Feature::new("Ping").on_command("ping", calls.interaction_handler()),
    ]);

    let ping = GatewayEvent::interaction(interaction(InteractionKind::Ping, None));
    assert_eq!(dispatcher.dispatch(ping).launched(), 0);

    let keyless = GatewayEvent::interaction(interaction(InteractionKind::ApplicationCommand, None));
    assert_eq!(dispatcher.dispatch(keyless).launched(), 0);

    assert_eq!(calls.count(), 0);
    assert_eq!(dispatcher.stats().unmatched, 2);
}

#[tokio::test]
async fn interaction_also_reaches_generic_handlers() {
    let routed = Calls::default();
    let audit = Calls::default();
    let dispatcher = dispatcher(vec![
        Feature::new("Ping").on_command("ping", routed.interaction_handler()),
        Feature::new("Audit").on_event(EventKind::InteractionCreate, audit.event_handler()),
    ]);

    let dispatched = dispatcher.dispatch(command_event("ping"));
    assert_eq!(dispatched.launched(), 2);
    dispatched.join().await;
    assert_eq!((routed.count(), audit.count()), (1, 1));

    // Unrouted interactions still reach generic handlers.
    dispatcher.dispatch(command_event("unknown")).join().await;
    assert_eq!((routed.count(), audit.count()), (1, 2));
}

#[tokio::test]
async fn panicking_handler_does_not_affect_sibling() {
    let survivor = Calls::default();
    let dispatcher = dispatcher(vec![
        Feature::new("A").on_event(EventKind::MessageCreate, explode),
        Feature::new("B").on_event(EventKind::MessageCreate, survivor.event_handler()),
    ]);

    let outcomes = dispatcher.dispatch(message_event("hello")).join().await;
    assert_eq!(
        outcomes,
        vec![
            HandlerOutcome::Panicked("feature A exploded".into()),
            HandlerOutcome::Completed,
        ]
    );
    assert_eq!(survivor.count(), 1);

    // The dispatcher keeps working afterwards.
    dispatcher.dispatch(message_event("again")).join().await;
    assert_eq!(survivor.count(), 2);
    assert_eq!(dispatcher.stats().panics, 2);
}

#[tokio::test]
async fn panic_between_handlers_spares_both_neighbours() {
    let before = Calls::default();
    let after = Calls::default();
    let dispatcher = dispatcher(vec![
        Feature::new("Logger").on_event(EventKind::MessageCreate, before.event_handler()),
        Feature::new("A").on_event(EventKind::MessageCreate, explode),
        Feature::new("Filter").on_event(EventKind::MessageCreate, after.event_handler()),
    ]);

    let outcomes = dispatcher.dispatch(message_event("hello")).join().await;
    assert_eq!(
        outcomes,
        vec![
            HandlerOutcome::Completed,
            HandlerOutcome::Panicked("feature A exploded".into()),
            HandlerOutcome::Completed,
        ]
    );
    assert_eq!((before.count(), after.count()), (1, 1));
    let stats = dispatcher.stats();
    assert_eq!((stats.completed, stats.panics), (2, 1));
}

#[tokio::test]
async fn unknown_handler_sees_every_unrecognised_name() {
    let names = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let seen = Arc::clone(&names);
    let dispatcher = dispatcher(vec![Feature::new("Catchall").on_event(
        EventKind::Unknown,
        move |_ctx: Context, event: Arc<GatewayEvent>| {
            seen.lock().push(event.name.clone());
            std::future::ready(HandlerResult::Ok(()))
        },
    )]);

    for name in ["SOMETHING_NEW", "SOMETHING_ELSE"] {
        let event = GatewayEvent::decode(name, None, serde_json::json!({})).unwrap();
        assert_eq!(event.kind, EventKind::Unknown);
        dispatcher.dispatch(event).join().await;
    }
    assert_eq!(*names.lock(), vec!["SOMETHING_NEW", "SOMETHING_ELSE"]);
}

#[tokio::test]
async fn handler_error_is_contained() {
    let dispatcher = dispatcher(vec![Feature::new("Broken").on_command("broken", fail)]);

    let outcomes = dispatcher.dispatch(command_event("broken")).join().await;
    assert_eq!(outcomes, vec![HandlerOutcome::Failed("internal_error")]);
    assert_eq!(dispatcher.stats().errors, 1);
}

#[tokio::test]
async fn slow_handler_does_not_block_dispatch() {
    let gate = Arc::new(Notify::new());
    let fast = Calls::default();
    let slow = {
        let gate = Arc::clone(&gate);
        move |_ctx: Context, _interaction: Arc<Interaction>| {
            let gate = Arc::clone(&gate);
            async move {
                gate.notified().await;
                HandlerResult::Ok(())
            }
        }
    };
    let dispatcher = dispatcher(vec![
        Feature::new("Slow").on_command("slow", slow),
        Feature::new("Fast").on_command("fast", fast.interaction_handler()),
    ]);

    let pending = dispatcher.dispatch(command_event("slow"));
    let done = dispatcher.dispatch(command_event("fast")).join().await;
    assert_eq!(done, vec![HandlerOutcome::Completed]);
    assert_eq!(fast.count(), 1);
    assert_eq!(dispatcher.in_flight(), 1);

    gate.notify_one();
    assert_eq!(pending.join().await, vec![HandlerOutcome::Completed]);
}

#[tokio::test]
async fn handlers_see_their_feature_and_route() {
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let record = {
        let seen = Arc::clone(&seen);
        move |ctx: Context, _interaction: Arc<Interaction>| {
            seen.lock().push((ctx.feature.to_string(), ctx.route.clone()));
            std::future::ready(HandlerResult::Ok(()))
        }
    };
    let dispatcher = dispatcher(vec![Feature::new("Forms").on_modal("signup", record)]);

    dispatcher.dispatch(modal_event("signup")).join().await;
    assert_eq!(
        seen.lock().clone(),
        vec![(
            "Forms".to_string(),
            Route::Interaction {
                category: RouteCategory::ModalSubmit,
                key: "signup".to_string()
            }
        )]
    );
}

#[tokio::test(start_paused = true)]
async fn deadline_drops_overrunning_handler() {
    let sleepy = |_ctx: Context, _event: Arc<GatewayEvent>| async {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        HandlerResult::Ok(())
    };
    let registry = Registry::build(vec![
        Feature::new("Sleepy").on_event(EventKind::MessageCreate, sleepy),
    ])
    .unwrap();
    let dispatcher = Dispatcher::new(Arc::new(registry), Arc::new(RecordingSession::new()))
        .with_handler_timeout(Some(Duration::from_secs(5)));

    let outcomes = dispatcher.dispatch(message_event("zzz")).join().await;
    assert_eq!(outcomes, vec![HandlerOutcome::TimedOut]);
    assert_eq!(dispatcher.stats().timeouts, 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_reports_stuck_handlers() {
    let stuck = |_ctx: Context, _event: Arc<GatewayEvent>| std::future::pending::<HandlerResult>();
    let dispatcher = dispatcher(vec![
        Feature::new("Stuck").on_event(EventKind::MessageCreate, stuck),
    ]);

    dispatcher.dispatch(message_event("hang")).detach();
    assert!(!dispatcher.shutdown(Duration::from_secs(1)).await);
    assert_eq!(dispatcher.in_flight(), 1);
}

#[tokio::test]
async fn shutdown_drains_finished_handlers() {
    let calls = Calls::default();
    let dispatcher = dispatcher(vec![
        Feature::new("Log").on_event(EventKind::MessageCreate, calls.event_handler()),
    ]);

    for _ in 0..10 {
        dispatcher.dispatch(message_event("hi")).detach();
    }
    assert!(dispatcher.shutdown(Duration::from_secs(5)).await);
    assert_eq!(calls.count(), 10);
    assert_eq!(dispatcher.in_flight(), 0);
}
