//! Gateway intents.
//!
//! Intents select which event families the gateway will deliver. Every
//! feature declares the intents it needs and the bot identifies with the
//! union of all of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Flag set of gateway intents (u64 newtype, wire form is the raw integer).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Intents(u64);

impl Intents {
    /// Guild create/update/delete, role and channel events.
    pub const GUILDS: Self = Self(1 << 0);
    /// Member add/update/remove (privileged).
    pub const GUILD_MEMBERS: Self = Self(1 << 1);
    /// Ban add/remove and audit log entries.
    pub const GUILD_MODERATION: Self = Self(1 << 2);
    /// Emoji and sticker updates.
    pub const GUILD_EXPRESSIONS: Self = Self(1 << 3);
    /// Integration updates.
    pub const GUILD_INTEGRATIONS: Self = Self(1 << 4);
    /// Webhook updates.
    pub const GUILD_WEBHOOKS: Self = Self(1 << 5);
    /// Invite create/delete.
    pub const GUILD_INVITES: Self = Self(1 << 6);
    /// Voice state updates.
    pub const GUILD_VOICE_STATES: Self = Self(1 << 7);
    /// Presence updates (privileged).
    pub const GUILD_PRESENCES: Self = Self(1 << 8);
    /// Messages in guild channels.
    pub const GUILD_MESSAGES: Self = Self(1 << 9);
    /// Reactions in guild channels.
    pub const GUILD_MESSAGE_REACTIONS: Self = Self(1 << 10);
    /// Typing indicators in guild channels.
    pub const GUILD_MESSAGE_TYPING: Self = Self(1 << 11);
    /// Direct messages.
    pub const DIRECT_MESSAGES: Self = Self(1 << 12);
    /// Reactions in direct messages.
    pub const DIRECT_MESSAGE_REACTIONS: Self = Self(1 << 13);
    /// Typing indicators in direct messages.
    pub const DIRECT_MESSAGE_TYPING: Self = Self(1 << 14);
    /// Message content in payloads (privileged).
    pub const MESSAGE_CONTENT: Self = Self(1 << 15);
    /// Scheduled event updates.
    pub const GUILD_SCHEDULED_EVENTS: Self = Self(1 << 16);

    /// The empty set.
    pub const NONE: Self = Self(0);

    /// Create an intents value from raw bits.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Raw bit representation.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// True when no intent is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Bitwise OR of two sets.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for Intents {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for Intents {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Intents {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for Intents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
