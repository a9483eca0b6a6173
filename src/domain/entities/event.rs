use super::User;

/// Callback token carried by the "Вернуться" inline button
pub const TO_MAIN_CALLBACK: &str = "to_main";

/// What the user did, as far as the dialogue is concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueEvent {
    /// `/start` command
    Start,
    /// Any other text, commands included
    Text(String),
    /// Inline button press with its callback data
    Callback(String),
}

/// An inbound event together with who sent it and where to answer
#[derive(Debug, Clone)]
pub struct Incoming {
    pub chat_id: String,
    pub sender: User,
    pub event: DialogueEvent,
    /// Set for callback queries, which must be answered by id
    pub callback_id: Option<String>,
}

impl Incoming {
    pub fn new(chat_id: impl Into<String>, sender: User, event: DialogueEvent) -> Self {
        Self {
            chat_id: chat_id.into(),
            sender,
            event,
            callback_id: None,
        }
    }

    pub fn with_callback_id(mut self, id: impl Into<String>) -> Self {
        self.callback_id = Some(id.into());
        self
    }
}
