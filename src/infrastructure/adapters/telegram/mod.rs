//! Telegram adapter

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::application::messaging::MessageParser;
use crate::domain::entities::{Incoming, User as ChatUser};
use crate::domain::traits::{Bot, BotInfo, ReplyMarkup};

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Limit for ordinary Bot API calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Extra time a long poll may take beyond its own timeout
const POLL_MARGIN: Duration = Duration::from_secs(10);

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

impl From<&User> for ChatUser {
    fn from(user: &User) -> Self {
        ChatUser {
            id: user.id.to_string(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

impl Update {
    /// Text messages and button presses become dialogue events; everything
    /// else (stickers, edits, anonymous posts) is dropped
    pub fn to_incoming(&self, parser: &MessageParser) -> Option<Incoming> {
        if let Some(msg) = &self.message {
            let from = msg.from.as_ref()?;
            let text = msg.text.as_ref()?;
            return Some(parser.parse(msg.chat.id.to_string(), text.as_str(), from.into()));
        }

        if let Some(cb) = &self.callback_query {
            // The button's message gives the chat; fall back to a private chat with the sender
            let chat_id = cb
                .message
                .as_ref()
                .map(|m| m.chat.id)
                .unwrap_or(cb.from.id);
            let data = cb.data.clone().unwrap_or_default();
            return Some(parser.parse_callback(chat_id.to_string(), cb.id.as_str(), data, (&cb.from).into()));
        }

        None
    }
}

/// Wire shape of `reply_markup`
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum TgReplyMarkup {
    Keyboard {
        keyboard: Vec<Vec<TgKeyboardButton>>,
        resize_keyboard: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        input_field_placeholder: Option<String>,
    },
    Remove {
        remove_keyboard: bool,
    },
    Inline {
        inline_keyboard: Vec<Vec<TgInlineKeyboardButton>>,
    },
}

#[derive(Debug, Serialize)]
struct TgKeyboardButton {
    text: String,
}

#[derive(Debug, Serialize)]
struct TgInlineKeyboardButton {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_data: Option<String>,
}

impl TgReplyMarkup {
    fn from_markup(markup: ReplyMarkup) -> Option<Self> {
        match markup {
            ReplyMarkup::None => None,
            ReplyMarkup::Keyboard { rows: buttons, placeholder } => Some(TgReplyMarkup::Keyboard {
                keyboard: buttons
                    .into_iter()
                    .map(|row| row.into_iter().map(|b| TgKeyboardButton { text: b.text }).collect())
                    .collect(),
                resize_keyboard: true,
                input_field_placeholder: placeholder,
            }),
            ReplyMarkup::RemoveKeyboard => Some(TgReplyMarkup::Remove { remove_keyboard: true }),
            ReplyMarkup::Inline(buttons) => Some(TgReplyMarkup::Inline {
                inline_keyboard: buttons
                    .into_iter()
                    .map(|row| {
                        row.into_iter()
                            .map(|b| TgInlineKeyboardButton {
                                text: b.text,
                                callback_data: b.callback_data,
                            })
                            .collect()
                    })
                    .collect(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest {
    chat_id: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<TgReplyMarkup>,
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "weather-informer-bot".to_string(),
                username: "weather_informer_bot".to_string(),
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct Response {
            result: BotInfoResponse,
        }

        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: String,
        }

        let url = self.api_url("getMe");
        let response = self.client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Telegram API error: {}", response.status())));
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        self.info = BotInfo {
            id: data.result.id.to_string(),
            name: data.result.first_name,
            username: data.result.username,
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: i64,
            allowed_updates: Vec<String>,
        }

        #[derive(Deserialize)]
        struct Response {
            result: Vec<Update>,
        }

        let url = self.api_url("getUpdates");
        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string(), "callback_query".to_string()],
        };

        let response = self.client
            .post(&url)
            .json(&request)
            .timeout(Self::poll_request_timeout(timeout))
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Telegram API error: {}", response.status())));
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(data.result)
    }

    /// A long poll legitimately stays open for `timeout` seconds
    fn poll_request_timeout(timeout: i64) -> Duration {
        Duration::from_secs(timeout.max(0) as u64) + POLL_MARGIN
    }

    /// Offset acknowledging every update in the batch
    pub fn get_next_offset(updates: &[Update], current: i64) -> i64 {
        updates.iter()
            .map(|u| u.update_id + 1)
            .max()
            .unwrap_or(current)
            .max(current)
    }

    /// Register bot commands with Telegram
    pub async fn register_commands(&self) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Command {
            command: String,
            description: String,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest {
            commands: Vec<Command>,
        }

        let commands = vec![
            Command { command: "start".to_string(), description: "Запустить бота".to_string() },
        ];

        let url = self.api_url("setMyCommands");
        let request = SetMyCommandsRequest { commands };

        let response = self.client
            .post(&url)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(BotError::Network(format!("Failed to register commands: {}", error)));
        }

        tracing::info!("Registered bot commands with Telegram");
        Ok(())
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn send_message(&self, chat_id: &str, text: &str, markup: ReplyMarkup) -> Result<String, BotError> {
        tracing::debug!("Sending to {}: {}", chat_id, text);

        #[derive(Deserialize)]
        struct Response {
            result: MessageResult,
        }

        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        let url = self.api_url("sendMessage");
        let request = SendMessageRequest {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            reply_markup: TgReplyMarkup::from_markup(markup),
        };

        let response = self.client
            .post(&url)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Telegram API error: {}", response.status())));
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(data.result.message_id.to_string())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct AnswerRequest {
            callback_query_id: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            text: Option<String>,
        }

        let url = self.api_url("answerCallbackQuery");
        let request = AnswerRequest {
            callback_query_id: callback_id.to_string(),
            text: text.map(|s| s.to_string()),
        };

        let response = self.client
            .post(&url)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Telegram API error: {}", response.status())));
        }

        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
