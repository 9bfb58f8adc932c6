//! Application command definitions.
//!
//! These are the descriptors pushed to the platform by the bulk-overwrite
//! call. The bot never interprets them beyond the name; they are passed
//! through exactly as features declare them.

use serde::{Deserialize, Serialize};

wire_enum! {
    /// Kind of application command.
    #[derive(Default)]
    pub enum CommandType {
        /// Slash command typed in the chat input.
        #[default]
        ChatInput = 1,
        /// Context-menu command on a user.
        User = 2,
        /// Context-menu command on a message.
        Message = 3,
    }
}

wire_enum! {
    /// Type of a command option.
    pub enum OptionType {
        /// Nested subcommand.
        SubCommand = 1,
        /// Group of subcommands.
        SubCommandGroup = 2,
        /// Free text.
        String = 3,
        /// 53-bit integer.
        Integer = 4,
        /// Boolean flag.
        Boolean = 5,
        /// User mention.
        User = 6,
        /// Channel mention.
        Channel = 7,
        /// Role mention.
        Role = 8,
        /// User or role.
        Mentionable = 9,
        /// Double-precision number.
        Number = 10,
        /// File upload.
        Attachment = 11,
    }
}

/// A single option of an application command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    /// Option type.
    #[serde(rename = "type")]
    pub kind: OptionType,
    /// Option name (1-32 chars).
    pub name: String,
    /// Option description (1-100 chars).
    pub description: String,
    /// Whether the user must supply it.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Whether the platform sends autocomplete interactions for it.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub autocomplete: bool,
    /// Nested options for subcommands and groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    /// Create an optional option of the given type.
    pub fn new(kind: OptionType, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: description.into(),
            required: false,
            autocomplete: false,
            options: Vec::new(),
        }
    }

    /// Mark the option as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Enable autocomplete for the option.
    pub fn with_autocomplete(mut self) -> Self {
        self.autocomplete = true;
        self
    }
}

/// Application command descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCommand {
    /// Command name, also the routing key for its interactions.
    pub name: String,
    /// Description shown in the client. Empty for context-menu commands.
    #[serde(default)]
    pub description: String,
    /// Command kind.
    #[serde(rename = "type", default)]
    pub kind: CommandType,
    /// Options, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<CommandOption>,
}

impl ApplicationCommand {
    /// Slash command with a name and description.
    pub fn chat_input(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: CommandType::ChatInput,
            options: Vec::new(),
        }
    }

    /// Context-menu command on users.
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind: CommandType::User,
            options: Vec::new(),
        }
    }

    /// Context-menu command on messages.
    pub fn message(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind: CommandType::Message,
            options: Vec::new(),
        }
    }

    /// Append an option.
    pub fn option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }
}
