//! Interaction responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

wire_enum! {
    /// Callback type of an interaction response.
    pub enum ResponseKind {
        /// Acknowledge a ping.
        Pong = 1,
        /// Reply with a message.
        ChannelMessageWithSource = 4,
        /// Acknowledge now, send the message later.
        DeferredChannelMessageWithSource = 5,
        /// Acknowledge a component, edit the message later.
        DeferredUpdateMessage = 6,
        /// Edit the message the component is attached to.
        UpdateMessage = 7,
        /// Autocomplete choices.
        AutocompleteResult = 8,
        /// Open a modal.
        Modal = 9,
    }
}

/// Message flag: only the invoking user sees the reply.
pub const FLAG_EPHEMERAL: u64 = 1 << 6;

/// Payload of an interaction response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseData {
    /// Message text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Message flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
    /// Autocomplete choices (`{"name", "value"}` objects).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Value>>,
    /// Modal or message custom id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    /// Modal title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Message or modal components.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Value>,
}

/// Response to an interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionResponse {
    /// Callback type.
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    /// Optional payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl InteractionResponse {
    /// Plain message reply.
    pub fn message(content: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::ChannelMessageWithSource,
            data: Some(ResponseData {
                content: Some(content.into()),
                ..ResponseData::default()
            }),
        }
    }

    /// Message reply only visible to the invoking user.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            kind: ResponseKind::ChannelMessageWithSource,
            data: Some(ResponseData {
                content: Some(content.into()),
                flags: Some(FLAG_EPHEMERAL),
                ..ResponseData::default()
            }),
        }
    }

    /// Deferred reply ("thinking..."), to be followed up later.
    pub fn deferred() -> Self {
        Self {
            kind: ResponseKind::DeferredChannelMessageWithSource,
            data: None,
        }
    }

    /// Autocomplete choices as `(name, value)` pairs.
    pub fn autocomplete<I, N, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<Value>,
    {
        let choices = choices
            .into_iter()
            .map(|(name, value)| {
                serde_json::json!({ "name": name.into(), "value": value.into() })
            })
            .collect();
        Self {
            kind: ResponseKind::AutocompleteResult,
            data: Some(ResponseData {
                choices: Some(choices),
                ..ResponseData::default()
            }),
        }
    }

    /// Acknowledge a ping interaction.
    pub fn pong() -> Self {
        Self {
            kind: ResponseKind::Pong,
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_response_shape() {
        let value = serde_json::to_value(InteractionResponse::message("hello")).unwrap();
        assert_eq!(value, json!({"type": 4, "data": {"content": "hello"}}));
    }

    #[test]
    fn ephemeral_sets_flag() {
        let value = serde_json::to_value(InteractionResponse::ephemeral("psst")).unwrap();
        assert_eq!(value["data"]["flags"], json!(64));
    }

    #[test]
    fn autocomplete_choices() {
        let resp = InteractionResponse::autocomplete([("Red", "red"), ("Blue", "blue")]);
        let value = serde_json::to_value(resp).unwrap();
        assert_eq!(value["type"], json!(8));
        assert_eq!(value["data"]["choices"][1], json!({"name": "Blue", "value": "blue"}));
    }

    #[test]
    fn pong_has_no_data() {
        let value = serde_json::to_value(InteractionResponse::pong()).unwrap();
        assert_eq!(value, json!({"type": 1}));
    }
}
