//! Gateway websocket connection.
//!
//! Connects, waits for `HELLO`, identifies with the registry's intents and
//! then runs one task that heartbeats and feeds decoded dispatch events to
//! the [`Dispatcher`]. There is no resume: reconnect requests, invalid
//! sessions, missed heartbeat ACKs and remote closes all end the task with
//! a [`GatewayError`].

use super::rest::HttpSession;
use crate::error::GatewayError;
use crate::handlers::Dispatcher;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use switchyard_proto::{
    ConnectionProperties, EventPayload, GatewayEvent, GatewayFrame, Identify, Intents, Opcode,
};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Sink = SplitSink<Socket, Message>;
type Stream = SplitStream<Socket>;

/// Parameters for [`GatewayConnection::connect`].
#[derive(Clone)]
pub struct GatewayOptions {
    pub url: String,
    pub token: String,
    pub intents: Intents,
}

impl std::fmt::Debug for GatewayOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayOptions")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("intents", &self.intents)
            .finish()
    }
}

/// A running gateway session.
pub struct GatewayConnection {
    shutdown: CancellationToken,
    ready: watch::Receiver<bool>,
    task: Option<JoinHandle<Result<(), GatewayError>>>,
}

impl GatewayConnection {
    /// Connect, complete the `HELLO`/`IDENTIFY` exchange and start the session task.
    pub async fn connect(
        options: GatewayOptions,
        session: Arc<HttpSession>,
        dispatcher: Arc<Dispatcher>,
    ) -> Result<Self, GatewayError> {
        info!(url = %options.url, intents = %options.intents, "Connecting to gateway");
        let (socket, _response) = connect_async(options.url.as_str()).await?;
        let (mut sink, mut stream) = socket.split();

        let hello = loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    let frame = GatewayFrame::from_json(&text)?;
                    if frame.op != Opcode::Hello {
                        return Err(GatewayError::UnexpectedFrame(frame.op));
                    }
                    break frame.hello()?;
                }
                Some(Ok(Message::Close(frame))) => return Err(closed(frame)),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
                None => return Err(GatewayError::NotReady),
            }
        };
        debug!(interval_ms = hello.heartbeat_interval, "Received HELLO");

        let identify = Identify {
            token: options.token,
            intents: options.intents,
            properties: ConnectionProperties::default(),
        };
        let frame = GatewayFrame::identify(&identify)?;
        sink.send(Message::Text(frame.to_json()?)).await?;
        debug!("Sent IDENTIFY");

        let shutdown = CancellationToken::new();
        let (ready_tx, ready) = watch::channel(false);
        let session_loop = SessionLoop {
            sink,
            stream,
            session,
            dispatcher,
            heartbeat_interval: hello.interval(),
            last_sequence: None,
            awaiting_ack: false,
            heartbeat_sent_at: Instant::now(),
            ready_tx,
            shutdown: shutdown.clone(),
        };
        let task = tokio::spawn(session_loop.run());

        Ok(Self {
            shutdown,
            ready,
            task: Some(task),
        })
    }

    /// Resolve once `READY` has been received.
    ///
    /// If the session ends first, returns the error that ended it.
    pub async fn wait_ready(&mut self) -> Result<(), GatewayError> {
        if self.ready.wait_for(|ready| *ready).await.is_ok() {
            return Ok(());
        }
        self.closed().await?;
        Err(GatewayError::NotReady)
    }

    /// Resolve when the session task ends. Cancel safe.
    pub async fn closed(&mut self) -> Result<(), GatewayError> {
        let Some(task) = self.task.as_mut() else {
            return Ok(());
        };
        let result = task.await;
        self.task = None;
        result?
    }

    /// Send a normal close frame and wait for the session task to finish.
    pub async fn close(mut self) -> Result<(), GatewayError> {
        self.shutdown.cancel();
        self.closed().await
    }
}

impl Drop for GatewayConnection {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Outcome of one `select!` round in the session loop.
enum SelectResult {
    Continue,
    Heartbeat,
    Frame(String),
    Stop,
}

struct SessionLoop {
    sink: Sink,
    stream: Stream,
    session: Arc<HttpSession>,
    dispatcher: Arc<Dispatcher>,
    heartbeat_interval: Duration,
    last_sequence: Option<u64>,
    awaiting_ack: bool,
    heartbeat_sent_at: Instant,
    ready_tx: watch::Sender<bool>,
    shutdown: CancellationToken,
}

impl SessionLoop {
    async fn run(mut self) -> Result<(), GatewayError> {
        let mut heartbeat = tokio::time::interval(self.heartbeat_interval);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Gateway session running");
        loop {
            let select_result = tokio::select! {
                _ = self.shutdown.cancelled() => SelectResult::Stop,
                _ = heartbeat.tick() => SelectResult::Heartbeat,
                incoming = self.stream.next() => match incoming {
                    Some(Ok(Message::Text(text))) => SelectResult::Frame(text),
                    Some(Ok(Message::Close(frame))) => return Err(closed(frame)),
                    Some(Ok(_)) => SelectResult::Continue,
                    Some(Err(e)) => return Err(e.into()),
                    None => {
                        return Err(GatewayError::Closed {
                            code: None,
                            reason: "stream ended".to_string(),
                        });
                    }
                },
            };

            match select_result {
                SelectResult::Continue => continue,
                SelectResult::Heartbeat => {
                    if self.awaiting_ack {
                        return Err(GatewayError::Zombied);
                    }
                    self.send_heartbeat().await?;
                }
                SelectResult::Frame(text) => self.on_frame(&text).await?,
                SelectResult::Stop => {
                    info!("Closing gateway session");
                    let frame = CloseFrame {
                        code: CloseCode::Normal,
                        reason: Cow::Borrowed("shutting down"),
                    };
                    if let Err(e) = self.sink.send(Message::Close(Some(frame))).await {
                        debug!(error = %e, "Close frame not delivered");
                    }
                    return Ok(());
                }
            }
        }
    }

    async fn send_heartbeat(&mut self) -> Result<(), GatewayError> {
        let frame = GatewayFrame::heartbeat(self.last_sequence);
        self.sink.send(Message::Text(frame.to_json()?)).await?;
        self.awaiting_ack = true;
        self.heartbeat_sent_at = Instant::now();
        Ok(())
    }

    async fn on_frame(&mut self, text: &str) -> Result<(), GatewayError> {
        let frame = match GatewayFrame::from_json(text) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "Skipping malformed gateway frame");
                return Ok(());
            }
        };

        match frame.op {
            Opcode::Dispatch => {
                if let Some(seq) = frame.s {
                    self.last_sequence = Some(seq);
                }
                let Some(name) = frame.t else {
                    warn!(sequence = ?frame.s, "Skipping dispatch without event name");
                    return Ok(());
                };
                let (event, error) = GatewayEvent::decode_or_raw(&name, frame.s, frame.d);
                if let Some(e) = error {
                    warn!(event = %name, error = %e, "Dispatching event with raw payload");
                }
                self.on_event(event);
            }
            Opcode::Heartbeat => self.send_heartbeat().await?,
            Opcode::HeartbeatAck => {
                self.awaiting_ack = false;
                let latency = self.heartbeat_sent_at.elapsed();
                self.session.record_heartbeat_latency(latency);
                debug!(latency_ms = latency.as_millis() as u64, "Heartbeat acknowledged");
            }
            Opcode::Reconnect => return Err(GatewayError::ReconnectRequested),
            Opcode::InvalidSession => return Err(GatewayError::InvalidSession),
            other => debug!(op = ?other, "Ignoring gateway frame"),
        }
        Ok(())
    }

    fn on_event(&mut self, event: GatewayEvent) {
        if let EventPayload::Ready(ready) = &event.payload {
            info!(
                user = %ready.user.username,
                application = %ready.application.id,
                "Gateway session ready"
            );
            self.session.set_application_id(ready.application.id.clone());
            self.ready_tx.send_replace(true);
        }
        self.dispatcher.dispatch(event).detach();
    }
}

fn closed(frame: Option<CloseFrame<'_>>) -> GatewayError {
    match frame {
        Some(frame) => GatewayError::Closed {
            code: Some(u16::from(frame.code)),
            reason: frame.reason.into_owned(),
        },
        None => GatewayError::Closed {
            code: None,
            reason: String::new(),
        },
    }
}
