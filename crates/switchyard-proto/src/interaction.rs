//! Interactions: user-initiated requests that expect a direct response.
//!
//! An interaction carries a discriminated [`InteractionKind`] and a data
//! block whose routing-relevant field depends on that kind: the command
//! name for commands and autocomplete, the custom id for components and
//! modal submissions.

use crate::event::User;
use serde::{Deserialize, Serialize};
use serde_json::Value;

wire_enum! {
    /// Interaction subtype.
    pub enum InteractionKind {
        /// Platform liveness check. Never routed to a feature.
        Ping = 1,
        /// Slash or context-menu command invocation.
        ApplicationCommand = 2,
        /// Button click or select-menu choice.
        MessageComponent = 3,
        /// Autocomplete query for a command option.
        Autocomplete = 4,
        /// Modal form submission.
        ModalSubmit = 5,
    }
}

impl InteractionKind {
    /// Human-readable category name, used in logs and errors.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::ApplicationCommand => "application-command",
            Self::MessageComponent => "component",
            Self::Autocomplete => "autocomplete",
            Self::ModalSubmit => "modal-submit",
        }
    }
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data block of an interaction.
///
/// The platform sends different shapes per subtype; the union of the
/// fields the bot cares about is kept here and everything else is left in
/// the raw `options` / `components` values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionData {
    /// Command id (commands and autocomplete).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Command name (commands and autocomplete).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Developer-defined id (components and modals).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    /// Component type number for component interactions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<u8>,
    /// Selected values for select menus.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// Command options as sent by the platform.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Value>,
    /// Submitted modal components.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Value>,
}

/// Guild member wrapper; only the user is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// The member's user.
    pub user: User,
}

/// An interaction as delivered in an `INTERACTION_CREATE` dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Interaction id, needed to respond.
    pub id: String,
    /// Application the interaction targets.
    pub application_id: String,
    /// Interaction subtype.
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    /// Continuation token, needed to respond.
    pub token: String,
    /// Subtype-specific data. Absent for pings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<InteractionData>,
    /// Guild the interaction came from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<String>,
    /// Channel the interaction came from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    /// Invoking member (guild context).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Member>,
    /// Invoking user (direct-message context).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Interaction {
    /// Key used to look up this interaction's handler.
    ///
    /// Command name for application commands and autocomplete, custom id
    /// for components and modal submissions, `None` for pings or when the
    /// platform omitted the field.
    pub fn routing_key(&self) -> Option<&str> {
        let data = self.data.as_ref()?;
        match self.kind {
            InteractionKind::ApplicationCommand | InteractionKind::Autocomplete => {
                data.name.as_deref()
            }
            InteractionKind::MessageComponent | InteractionKind::ModalSubmit => {
                data.custom_id.as_deref()
            }
            InteractionKind::Ping => None,
        }
    }

    /// The invoking user, from either the member or the user field.
    pub fn invoker(&self) -> Option<&User> {
        self.member
            .as_ref()
            .map(|m| &m.user)
            .or(self.user.as_ref())
    }
}
