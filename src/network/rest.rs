//! REST-backed session.

use super::session::Session;
use crate::error::SessionError;
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use switchyard_proto::{ApplicationCommand, Interaction, InteractionResponse};
use tracing::debug;

const UNKNOWN_LATENCY: u64 = u64::MAX;

/// Session that talks to the platform's HTTP API.
///
/// Gateway state the handlers care about (heartbeat latency, application id)
/// is pushed in by the gateway connection.
pub struct HttpSession {
    client: Client,
    api_base: String,
    latency_micros: AtomicU64,
    application_id: RwLock<Option<String>>,
}

impl HttpSession {
    pub fn new(api_base: &str, token: &str) -> Result<Self, SessionError> {
        let mut auth = HeaderValue::from_str(&format!("Bot {token}"))
            .map_err(|_| SessionError::InvalidToken)?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .user_agent(concat!("switchyard/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            latency_micros: AtomicU64::new(UNKNOWN_LATENCY),
            application_id: RwLock::new(None),
        })
    }

    pub fn record_heartbeat_latency(&self, latency: Duration) {
        let micros = u64::try_from(latency.as_micros()).unwrap_or(UNKNOWN_LATENCY - 1);
        self.latency_micros.store(micros, Ordering::Relaxed);
    }

    pub fn set_application_id(&self, id: impl Into<String>) {
        *self.application_id.write() = Some(id.into());
    }

    fn callback_url(&self, interaction: &Interaction) -> String {
        format!(
            "{}/interactions/{}/{}/callback",
            self.api_base, interaction.id, interaction.token
        )
    }

    fn guild_commands_url(&self, application_id: &str, guild_id: &str) -> String {
        format!(
            "{}/applications/{}/guilds/{}/commands",
            self.api_base, application_id, guild_id
        )
    }
}

async fn check(response: Response) -> Result<Response, SessionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SessionError::Rejected {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl Session for HttpSession {
    fn heartbeat_latency(&self) -> Option<Duration> {
        match self.latency_micros.load(Ordering::Relaxed) {
            UNKNOWN_LATENCY => None,
            micros => Some(Duration::from_micros(micros)),
        }
    }

    fn application_id(&self) -> Option<String> {
        self.application_id.read().clone()
    }

    async fn respond(
        &self,
        interaction: &Interaction,
        response: InteractionResponse,
    ) -> Result<(), SessionError> {
        debug!(interaction = %interaction.id, kind = ?response.kind, "Responding to interaction");
        let sent = self
            .client
            .post(self.callback_url(interaction))
            .json(&response)
            .send()
            .await?;
        check(sent).await?;
        Ok(())
    }

    async fn bulk_overwrite_commands(
        &self,
        guild_id: &str,
        commands: &[ApplicationCommand],
    ) -> Result<Vec<ApplicationCommand>, SessionError> {
        let application_id = self.application_id().ok_or(SessionError::NotReady)?;
        let sent = self
            .client
            .put(self.guild_commands_url(&application_id, guild_id))
            .json(commands)
            .send()
            .await?;
        Ok(check(sent).await?.json().await?)
    }
}

impl std::fmt::Debug for HttpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSession")
            .field("api_base", &self.api_base)
            .field("latency", &self.heartbeat_latency())
            .field("application_id", &self.application_id())
            .finish_non_exhaustive()
    }
}
