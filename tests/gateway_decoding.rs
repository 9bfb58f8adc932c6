//! Gateway frames decoded from JSON and dispatched end to end.

mod common;

use common::{Calls, RecordingSession};
use serde_json::json;
use std::sync::Arc;
use switchyard::features::Feature;
use switchyard::handlers::{Dispatcher, HandlerOutcome, Registry};
use switchyard::proto::{EventKind, EventPayload, GatewayEvent, GatewayFrame};

fn dispatcher(features: Vec<Feature>) -> Dispatcher {
    let registry = Registry::build(features).expect("features should not conflict");
    Dispatcher::new(Arc::new(registry), Arc::new(RecordingSession::new()))
}

fn dispatch_frame(name: &str, data: serde_json::Value) -> GatewayEvent {
    let text = json!({"op": 0, "s": 12, "t": name, "d": data}).to_string();
    let frame: GatewayFrame = serde_json::from_str(&text).unwrap();
    GatewayEvent::from_frame(frame).unwrap().unwrap()
}

#[tokio::test]
async fn unrecognised_interaction_type_still_reaches_generic_handlers() {
    let routed = Calls::default();
    let audit = Calls::default();
    let dispatcher = dispatcher(vec![
        Feature::new("Ping").on_command("ping", routed.interaction_handler()),
        Feature::new("Audit").on_event(EventKind::InteractionCreate, audit.event_handler()),
    ]);

    let event = dispatch_frame(
        "INTERACTION_CREATE",
        json!({"id": "1", "application_id": "2", "type": 6, "token": "t", "data": {"name": "ping"}}),
    );
    assert_eq!(event.kind, EventKind::InteractionCreate);
    assert!(matches!(event.payload, EventPayload::Raw(_)));

    let outcomes = dispatcher.dispatch(event).join().await;
    assert_eq!(outcomes, vec![HandlerOutcome::Completed]);
    assert_eq!((routed.count(), audit.count()), (0, 1));
    assert_eq!(dispatcher.stats().matched, 0);
}

#[tokio::test]
async fn malformed_message_still_reaches_message_handlers() {
    let calls = Calls::default();
    let dispatcher = dispatcher(vec![
        Feature::new("Logger").on_event(EventKind::MessageCreate, calls.event_handler()),
    ]);

    let event = dispatch_frame("MESSAGE_CREATE", json!({"id": "1"}));
    assert_eq!(event.sequence, Some(12));
    assert!(event.as_message().is_none());

    dispatcher.dispatch(event).join().await;
    assert_eq!(calls.count(), 1);
}

#[tokio::test]
async fn well_formed_command_frame_is_routed() {
    let routed = Calls::default();
    let dispatcher = dispatcher(vec![
        Feature::new("Ping").on_command("ping", routed.interaction_handler()),
    ]);

    let event = dispatch_frame(
        "INTERACTION_CREATE",
        json!({"id": "1", "application_id": "2", "type": 2, "token": "t", "data": {"name": "ping"}}),
    );
    dispatcher.dispatch(event).join().await;
    assert_eq!(routed.count(), 1);
}
