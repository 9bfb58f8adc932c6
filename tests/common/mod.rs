//! Integration test common infrastructure.
//!
//! Provides a recording `Session`, interaction and event builders, and
//! small handler helpers for asserting on dispatch flows.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::future::{Ready, ready};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use switchyard::error::{HandlerResult, SessionError};
use switchyard::handlers::Context;
use switchyard::network::Session;
use switchyard::proto::{
    ApplicationCommand, GatewayEvent, Interaction, InteractionData, InteractionKind,
    InteractionResponse, Message, User,
};

/// Session double that records every call.
#[derive(Default)]
pub struct RecordingSession {
    latency: Option<Duration>,
    application_id: Option<String>,
    reject: bool,
    responses: Mutex<Vec<(String, InteractionResponse)>>,
    published: Mutex<Vec<(String, Vec<ApplicationCommand>)>>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self {
            application_id: Some("app-1".to_string()),
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Every REST call fails with a 500.
    pub fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }

    /// Responses sent so far, as `(interaction id, response)`.
    pub fn responses(&self) -> Vec<(String, InteractionResponse)> {
        self.responses.lock().clone()
    }

    /// Command sets published so far, as `(guild id, commands)`.
    pub fn published(&self) -> Vec<(String, Vec<ApplicationCommand>)> {
        self.published.lock().clone()
    }

    fn rejection() -> SessionError {
        SessionError::Rejected {
            status: 500,
            body: "internal server error".to_string(),
        }
    }
}

#[async_trait]
impl Session for RecordingSession {
    fn heartbeat_latency(&self) -> Option<Duration> {
        self.latency
    }

    fn application_id(&self) -> Option<String> {
        self.application_id.clone()
    }

    async fn respond(
        &self,
        interaction: &Interaction,
        response: InteractionResponse,
    ) -> Result<(), SessionError> {
        if self.reject {
            return Err(Self::rejection());
        }
        self.responses
            .lock()
            .push((interaction.id.clone(), response));
        Ok(())
    }

    async fn bulk_overwrite_commands(
        &self,
        guild_id: &str,
        commands: &[ApplicationCommand],
    ) -> Result<Vec<ApplicationCommand>, SessionError> {
        if self.reject {
            return Err(Self::rejection());
        }
        self.published
            .lock()
            .push((guild_id.to_string(), commands.to_vec()));
        Ok(commands.to_vec())
    }
}

pub fn interaction(kind: InteractionKind, data: Option<InteractionData>) -> Interaction {
    Interaction {
        id: "interaction-1".to_string(),
        application_id: "app-1".to_string(),
        kind,
        token: "interaction-token".to_string(),
        data,
        guild_id: Some("guild-1".to_string()),
        channel_id: Some("channel-1".to_string()),
        member: None,
        user: Some(user()),
    }
}

pub fn command_event(name: &str) -> GatewayEvent {
    GatewayEvent::interaction(interaction(
        InteractionKind::ApplicationCommand,
        Some(InteractionData {
            name: Some(name.to_string()),
            ..InteractionData::default()
        }),
    ))
}

pub fn component_event(custom_id: &str) -> GatewayEvent {
    GatewayEvent::interaction(interaction(
        InteractionKind::MessageComponent,
        Some(InteractionData {
            custom_id: Some(custom_id.to_string()),
            component_type: Some(2),
            ..InteractionData::default()
        }),
    ))
}

pub fn modal_event(custom_id: &str) -> GatewayEvent {
    GatewayEvent::interaction(interaction(
        InteractionKind::ModalSubmit,
        Some(InteractionData {
            custom_id: Some(custom_id.to_string()),
            ..InteractionData::default()
        }),
    ))
}

pub fn autocomplete_event(name: &str) -> GatewayEvent {
    GatewayEvent::interaction(interaction(
        InteractionKind::Autocomplete,
        Some(InteractionData {
            name: Some(name.to_string()),
            ..InteractionData::default()
        }),
    ))
}

pub fn message_event(content: &str) -> GatewayEvent {
    GatewayEvent::message(Message {
        id: "message-1".to_string(),
        channel_id: "channel-1".to_string(),
        guild_id: Some("guild-1".to_string()),
        author: user(),
        content: content.to_string(),
    })
}

pub fn user() -> User {
    User {
        id: "user-1".to_string(),
        username: "ana".to_string(),
        bot: false,
    }
}

/// Shared invocation counter for handler assertions.
#[derive(Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    /// Interaction handler that only counts.
    pub fn interaction_handler(
        &self,
    ) -> impl Fn(Context, Arc<Interaction>) -> Ready<HandlerResult> + Send + Sync + use<> {
        let calls = self.clone();
        move |_ctx, _interaction| {
            calls.hit();
            ready(Ok(()))
        }
    }

    /// Event handler that only counts.
    pub fn event_handler(
        &self,
    ) -> impl Fn(Context, Arc<GatewayEvent>) -> Ready<HandlerResult> + Send + Sync + use<> {
        let calls = self.clone();
        move |_ctx, _event| {
            calls.hit();
            ready(Ok(()))
        }
    }
}
