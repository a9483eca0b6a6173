//! Message parser - Turns raw chat input into dialogue events

use crate::domain::entities::{DialogueEvent, Incoming, User};

/// Parses incoming text and button presses into `Incoming` events
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: User) -> Incoming {
        let text = text.into();
        let event = if self.is_start_command(&text) {
            DialogueEvent::Start
        } else {
            DialogueEvent::Text(text)
        };
        Incoming::new(chat_id, sender, event)
    }

    /// Parse a callback query (inline button press)
    pub fn parse_callback(
        &self,
        chat_id: impl Into<String>,
        callback_id: impl Into<String>,
        data: impl Into<String>,
        sender: User,
    ) -> Incoming {
        Incoming::new(chat_id, sender, DialogueEvent::Callback(data.into()))
            .with_callback_id(callback_id)
    }

    /// `/start`, `/start@some_bot` and `/start payload` all count
    fn is_start_command(&self, text: &str) -> bool {
        let Some(cmd_text) = text.strip_prefix(self.command_prefix.as_str()) else {
            return false;
        };
        let name = cmd_text.split_whitespace().next().unwrap_or("");
        let name = name.split('@').next().unwrap_or("");
        name == "start"
    }
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::new("/")
    }
}
