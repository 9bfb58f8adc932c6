//! Gateway dispatch events.
//!
//! Every dispatch frame is tagged with an [`EventKind`] when it is decoded.
//! Handlers key on that tag instead of inspecting payload shapes. Payloads
//! the bot has a typed model for are decoded eagerly; everything else is
//! kept as raw JSON.

use crate::error::{ProtoError, Result};
use crate::gateway::{GatewayFrame, Opcode};
use crate::interaction::Interaction;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

macro_rules! event_kinds {
    ( $( $(#[$meta:meta])* $variant:ident => $wire:literal ),+ $(,)? ) => {
        /// Tag naming the concrete type of a gateway dispatch event.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum EventKind {
            $( $(#[$meta])* $variant, )+
            /// Any dispatch name this crate does not know about.
            Unknown,
        }

        impl EventKind {
            /// Every known kind, in declaration order.
            pub const ALL: &'static [EventKind] = &[ $( EventKind::$variant, )+ ];

            /// Wire name (`t` field) of this kind. `Unknown` has no wire name.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( EventKind::$variant => $wire, )+
                    EventKind::Unknown => "UNKNOWN",
                }
            }

            /// Map a wire name onto a kind.
            pub fn from_name(name: &str) -> Self {
                match name {
                    $( $wire => EventKind::$variant, )+
                    _ => EventKind::Unknown,
                }
            }
        }
    };
}

event_kinds! {
    /// Session is established.
    Ready => "READY",
    /// Session was resumed.
    Resumed => "RESUMED",
    /// Slash command permissions changed.
    ApplicationCommandPermissionsUpdate => "APPLICATION_COMMAND_PERMISSIONS_UPDATE",
    /// Channel created.
    ChannelCreate => "CHANNEL_CREATE",
    /// Channel updated.
    ChannelUpdate => "CHANNEL_UPDATE",
    /// Channel deleted.
    ChannelDelete => "CHANNEL_DELETE",
    /// Message pinned or unpinned.
    ChannelPinsUpdate => "CHANNEL_PINS_UPDATE",
    /// Thread created.
    ThreadCreate => "THREAD_CREATE",
    /// Guild became available or the bot joined one.
    GuildCreate => "GUILD_CREATE",
    /// Guild updated.
    GuildUpdate => "GUILD_UPDATE",
    /// Guild unavailable or the bot left.
    GuildDelete => "GUILD_DELETE",
    /// User banned.
    GuildBanAdd => "GUILD_BAN_ADD",
    /// User unbanned.
    GuildBanRemove => "GUILD_BAN_REMOVE",
    /// Member joined.
    GuildMemberAdd => "GUILD_MEMBER_ADD",
    /// Member updated.
    GuildMemberUpdate => "GUILD_MEMBER_UPDATE",
    /// Member left or was removed.
    GuildMemberRemove => "GUILD_MEMBER_REMOVE",
    /// Role created.
    GuildRoleCreate => "GUILD_ROLE_CREATE",
    /// Role updated.
    GuildRoleUpdate => "GUILD_ROLE_UPDATE",
    /// Role deleted.
    GuildRoleDelete => "GUILD_ROLE_DELETE",
    /// Interaction created (commands, components, modals, autocomplete).
    InteractionCreate => "INTERACTION_CREATE",
    /// Invite created.
    InviteCreate => "INVITE_CREATE",
    /// Invite deleted.
    InviteDelete => "INVITE_DELETE",
    /// Message posted.
    MessageCreate => "MESSAGE_CREATE",
    /// Message edited.
    MessageUpdate => "MESSAGE_UPDATE",
    /// Message deleted.
    MessageDelete => "MESSAGE_DELETE",
    /// Messages bulk-deleted.
    MessageDeleteBulk => "MESSAGE_DELETE_BULK",
    /// Reaction added.
    MessageReactionAdd => "MESSAGE_REACTION_ADD",
    /// Reaction removed.
    MessageReactionRemove => "MESSAGE_REACTION_REMOVE",
    /// User presence changed.
    PresenceUpdate => "PRESENCE_UPDATE",
    /// User started typing.
    TypingStart => "TYPING_START",
    /// Bot user updated.
    UserUpdate => "USER_UPDATE",
    /// Voice state changed.
    VoiceStateUpdate => "VOICE_STATE_UPDATE",
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A platform user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Snowflake id.
    pub id: String,
    /// Account name.
    pub username: String,
    /// Whether the account is a bot.
    #[serde(default)]
    pub bot: bool,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message id.
    pub id: String,
    /// Channel the message was posted in.
    pub channel_id: String,
    /// Guild, absent for direct messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    /// Author of the message.
    pub author: User,
    /// Text content. Empty without the message-content intent.
    #[serde(default)]
    pub content: String,
}

/// Application reference sent with `READY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadyApplication {
    /// Application id, needed for command sync.
    pub id: String,
}

/// Payload of the `READY` dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ready {
    /// Gateway protocol version.
    #[serde(default)]
    pub v: u8,
    /// The bot's own user.
    pub user: User,
    /// Session id (for resuming).
    pub session_id: String,
    /// The bot's application.
    pub application: ReadyApplication,
}

/// Decoded payload of a dispatch event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    /// `INTERACTION_CREATE`.
    Interaction(Interaction),
    /// `MESSAGE_CREATE`.
    Message(Message),
    /// `READY`.
    Ready(Ready),
    /// Anything without a typed model.
    Raw(Value),
}

/// A dispatch event, tagged with its kind.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayEvent {
    /// Kind tag used for generic routing.
    pub kind: EventKind,
    /// Wire name as received (differs from `kind.as_str()` only for `Unknown`).
    pub name: String,
    /// Gateway sequence number.
    pub sequence: Option<u64>,
    /// Decoded payload.
    pub payload: EventPayload,
}

impl GatewayEvent {
    /// Decode the payload of a dispatch named `name`.
    ///
    /// Fails if a kind with a typed model carries a payload that does not
    /// match it. See [`GatewayEvent::decode_or_raw`] for the lenient form.
    pub fn decode(name: &str, sequence: Option<u64>, data: Value) -> Result<Self> {
        let kind = EventKind::from_name(name);
        let payload = typed_payload(kind, name, &data)?.unwrap_or(EventPayload::Raw(data));
        Ok(Self::named(kind, name, sequence, payload))
    }

    /// Decode like [`GatewayEvent::decode`], but keep the event when its
    /// typed payload does not parse.
    ///
    /// The kind is preserved and the payload falls back to
    /// [`EventPayload::Raw`]; the parse error is returned alongside so the
    /// caller can report it.
    pub fn decode_or_raw(
        name: &str,
        sequence: Option<u64>,
        data: Value,
    ) -> (Self, Option<ProtoError>) {
        let kind = EventKind::from_name(name);
        let (payload, error) = match typed_payload(kind, name, &data) {
            Ok(Some(payload)) => (payload, None),
            Ok(None) => (EventPayload::Raw(data), None),
            Err(e) => (EventPayload::Raw(data), Some(e)),
        };
        (Self::named(kind, name, sequence, payload), error)
    }

    /// Turn a gateway frame into an event. Non-dispatch frames yield `None`.
    ///
    /// Payloads that do not fit their typed model are kept raw.
    pub fn from_frame(frame: GatewayFrame) -> Result<Option<Self>> {
        if frame.op != Opcode::Dispatch {
            return Ok(None);
        }
        let name = frame.t.ok_or(ProtoError::MissingEventName)?;
        Ok(Some(Self::decode_or_raw(&name, frame.s, frame.d).0))
    }

    fn named(kind: EventKind, name: &str, sequence: Option<u64>, payload: EventPayload) -> Self {
        Self {
            kind,
            name: name.to_string(),
            sequence,
            payload,
        }
    }

    /// Wrap an interaction as an `INTERACTION_CREATE` event.
    pub fn interaction(interaction: Interaction) -> Self {
        Self::tagged(EventKind::InteractionCreate, EventPayload::Interaction(interaction))
    }

    /// Wrap a message as a `MESSAGE_CREATE` event.
    pub fn message(message: Message) -> Self {
        Self::tagged(EventKind::MessageCreate, EventPayload::Message(message))
    }

    /// Event of `kind` with a raw JSON payload.
    pub fn raw(kind: EventKind, data: Value) -> Self {
        Self::tagged(kind, EventPayload::Raw(data))
    }

    fn tagged(kind: EventKind, payload: EventPayload) -> Self {
        Self {
            kind,
            name: kind.as_str().to_string(),
            sequence: None,
            payload,
        }
    }

    /// The interaction, if this is an `INTERACTION_CREATE`.
    pub fn as_interaction(&self) -> Option<&Interaction> {
        match &self.payload {
            EventPayload::Interaction(i) => Some(i),
            _ => None,
        }
    }

    /// The message, if this is a `MESSAGE_CREATE`.
    pub fn as_message(&self) -> Option<&Message> {
        match &self.payload {
            EventPayload::Message(m) => Some(m),
            _ => None,
        }
    }
}

fn typed_payload(kind: EventKind, name: &str, data: &Value) -> Result<Option<EventPayload>> {
    fn parse<T: DeserializeOwned>(name: &str, data: &Value) -> Result<T> {
        T::deserialize(data).map_err(|e| ProtoError::decode(name, e))
    }

    let payload = match kind {
        EventKind::InteractionCreate => EventPayload::Interaction(parse(name, data)?),
        EventKind::MessageCreate => EventPayload::Message(parse(name, data)?),
        EventKind::Ready => EventPayload::Ready(parse(name, data)?),
        _ => return Ok(None),
    };
    Ok(Some(payload))
}
