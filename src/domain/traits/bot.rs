use async_trait::async_trait;
use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Send a message to a chat, returns the platform message id
    async fn send_message(&self, chat_id: &str, text: &str, markup: ReplyMarkup) -> Result<String, BotError>;

    /// Answer a callback query
    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Keyboard button, used by both reply and inline keyboards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardButton {
    pub text: String,
    pub callback_data: Option<String>,
}

impl KeyboardButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: None,
        }
    }

    pub fn with_callback(mut self, data: impl Into<String>) -> Self {
        self.callback_data = Some(data.into());
        self
    }
}

/// Markup attached to an outgoing message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReplyMarkup {
    #[default]
    None,
    /// Persistent reply keyboard shown instead of the system keyboard
    Keyboard {
        rows: Vec<Vec<KeyboardButton>>,
        placeholder: Option<String>,
    },
    /// Hide a previously shown reply keyboard
    RemoveKeyboard,
    /// Buttons attached to the message itself
    Inline(Vec<Vec<KeyboardButton>>),
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
