//! Dialogue engine - per-user forecast conversation

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex, RwLock};

use crate::application::errors::BotError;
use crate::application::messaging::dispatcher::{return_keyboard, FAILURE_TEXT};
use crate::application::messaging::{Dispatcher, Effect};
use crate::application::services::WeatherService;
use crate::domain::entities::{DialogueEvent, DialogueSession, ForecastMode, Incoming, LogEntry, User};
use crate::domain::traits::{Bot, ReplyMarkup, RequestLog};

/// Drives every user's dialogue. Sessions are keyed by user id and the
/// session lock is never held while talking to the outside world.
pub struct DialogueEngine {
    bot: Arc<dyn Bot>,
    weather: WeatherService,
    request_log: Arc<dyn RequestLog>,
    dispatcher: Dispatcher,
    sessions: RwLock<HashMap<String, DialogueSession>>,
    /// Queues of users that currently have a task draining their events
    queues: Mutex<HashMap<String, mpsc::UnboundedSender<Incoming>>>,
}

impl DialogueEngine {
    pub fn new(
        bot: Arc<dyn Bot>,
        weather: WeatherService,
        request_log: Arc<dyn RequestLog>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            bot,
            weather,
            request_log,
            dispatcher,
            sessions: RwLock::new(HashMap::new()),
            queues: Mutex::new(HashMap::new()),
        }
    }

    /// Current session snapshot; unknown users are Idle
    #[cfg(test)]
    pub async fn session(&self, user_id: &str) -> DialogueSession {
        let sessions = self.sessions.read().await;
        sessions
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| DialogueSession::new(user_id))
    }

    /// Queue an event behind the sender's earlier ones. Each user's events
    /// are handled one at a time in arrival order; different users run
    /// concurrently.
    pub async fn dispatch(self: &Arc<Self>, incoming: Incoming) {
        let mut queues = self.queues.lock().await;
        let user_id = incoming.sender.id.clone();

        let incoming = match queues.get(&user_id) {
            Some(tx) => match tx.send(incoming) {
                Ok(()) => return,
                Err(mpsc::error::SendError(incoming)) => incoming,
            },
            None => incoming,
        };

        let (tx, rx) = mpsc::unbounded_channel();
        queues.insert(user_id.clone(), tx);
        tokio::spawn(Arc::clone(self).drain(user_id, incoming, rx));
    }

    async fn drain(self: Arc<Self>, user_id: String, first: Incoming, mut rx: mpsc::UnboundedReceiver<Incoming>) {
        self.handle(first).await;
        loop {
            // Senders only push while holding the queue map, so an empty
            // channel seen under the lock stays empty once the entry is gone.
            let next = {
                let mut queues = self.queues.lock().await;
                match rx.try_recv() {
                    Ok(incoming) => incoming,
                    Err(_) => {
                        queues.remove(&user_id);
                        return;
                    }
                }
            };
            self.handle(next).await;
        }
    }

    /// Process one inbound event to completion
    pub async fn handle(&self, incoming: Incoming) {
        let mut pending = VecDeque::from([incoming.event.clone()]);

        while let Some(event) = pending.pop_front() {
            if event == DialogueEvent::Start {
                tracing::info!("User {} started the bot", incoming.sender);
            }

            let transition = {
                let mut sessions = self.sessions.write().await;
                let session = sessions
                    .entry(incoming.sender.id.clone())
                    .or_insert_with(|| DialogueSession::new(incoming.sender.id.as_str()));
                let transition = self.dispatcher.transition(session.state, &event);
                session.state = transition.next;
                tracing::debug!("User {} is now {:?}", session.user_id, session.state);
                transition
            };

            for effect in transition.effects {
                match effect {
                    Effect::Reply { text, markup } => {
                        self.reply(&incoming.chat_id, &text, markup).await;
                    }
                    Effect::AnswerCallback { text } => {
                        let Some(callback_id) = incoming.callback_id.as_deref() else {
                            continue;
                        };
                        if let Err(e) = self.bot.answer_callback(callback_id, text.as_deref()).await {
                            tracing::warn!("Failed to answer callback {}: {}", callback_id, e);
                        }
                    }
                    Effect::Pause(delay) => tokio::time::sleep(delay).await,
                    Effect::QueryWeather { city, mode } => {
                        if let Err(e) = self.complete_request(&incoming, &city, mode).await {
                            tracing::error!(
                                "Failed to handle city '{}' from user {}: {}",
                                city,
                                incoming.sender,
                                e
                            );
                            self.reset(&incoming.sender.id).await;
                            self.reply(&incoming.chat_id, FAILURE_TEXT, ReplyMarkup::None).await;
                        }
                    }
                    Effect::Replay(event) => pending.push_back(event),
                }
            }
        }
    }

    /// Terminal step: answer with the weather, then log the request
    async fn complete_request(&self, incoming: &Incoming, city: &str, mode: ForecastMode) -> Result<(), BotError> {
        let text = self.weather.describe(city, mode).await;
        self.bot.send_message(&incoming.chat_id, &text, return_keyboard()).await?;
        tracing::info!("User {} requested {} weather for city {}", incoming.sender, mode, city);

        self.append_log(&incoming.sender, city, mode).await?;
        Ok(())
    }

    async fn append_log(&self, user: &User, city: &str, mode: ForecastMode) -> Result<(), BotError> {
        let entry = LogEntry::new(user.display_name(), city, mode);
        self.request_log.append(entry).await?;
        Ok(())
    }

    async fn reset(&self, user_id: &str) {
        self.sessions.write().await.insert(user_id.to_string(), DialogueSession::new(user_id));
    }

    async fn reply(&self, chat_id: &str, text: &str, markup: ReplyMarkup) {
        if let Err(e) = self.bot.send_message(chat_id, text, markup).await {
            tracing::error!("Failed to send message to {}: {}", chat_id, e);
        }
    }
}
