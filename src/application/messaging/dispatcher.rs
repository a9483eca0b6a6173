//! Dialogue dispatcher - Routes events to transitions by (state, event)

use std::time::Duration;

use crate::domain::entities::{DialogueEvent, DialogueState, ForecastMode};
use crate::domain::entities::event::TO_MAIN_CALLBACK;
use crate::domain::traits::{KeyboardButton, ReplyMarkup};

pub const GREETING_TEXT: &str = "Привет, я бот - погодный информер";
pub const CHOOSE_MODE_TEXT: &str = "Выберите прогноз";
pub const CHOOSE_MODE_PLACEHOLDER: &str = "Выберите...";
pub const CITY_PROMPT_TEXT: &str = "Введите название города, информации о погоде которого Вам нужно узнать.\n\
    Учтите, что нужно написать правильно не допуская орфографических ошибок.\n\
    Не используйте никакие знаки препинания, а также спец. символы.";
pub const REPROMPT_TEXT: &str = "Пожалуйста, выберите вариант из предложенных на клавиатуре.";
pub const RETURN_BUTTON_TEXT: &str = "Вернуться";
pub const RETURN_ACK_TEXT: &str = "Возвращаю в главное меню...";
pub const FAILURE_TEXT: &str = "Произошла ошибка при обработке запроса. Пожалуйста, попробуйте позже.";

/// Default pause before the main menu is shown again
pub const DEFAULT_RETURN_DELAY: Duration = Duration::from_secs(2);

/// Outbound work requested by a transition, executed in order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Reply { text: String, markup: ReplyMarkup },
    AnswerCallback { text: Option<String> },
    Pause(Duration),
    /// Terminal step: query the weather, answer, write the log row
    QueryWeather { city: String, mode: ForecastMode },
    /// Feed another event through the table for the same user
    Replay(DialogueEvent),
}

/// Result of routing one event
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: DialogueState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn stay(state: DialogueState) -> Self {
        Self { next: state, effects: Vec::new() }
    }
}

/// Pure transition table for the forecast dialogue
#[derive(Debug, Clone)]
pub struct Dispatcher {
    return_delay: Duration,
}

impl Dispatcher {
    pub fn new(return_delay: Duration) -> Self {
        Self { return_delay }
    }

    pub fn transition(&self, state: DialogueState, event: &DialogueEvent) -> Transition {
        match (state, event) {
            (_, DialogueEvent::Start) => Transition {
                next: DialogueState::AwaitingModeSelection,
                effects: vec![
                    reply(GREETING_TEXT, ReplyMarkup::None),
                    reply(CHOOSE_MODE_TEXT, mode_keyboard()),
                ],
            },

            (_, DialogueEvent::Callback(data)) if data == TO_MAIN_CALLBACK => Transition {
                next: state,
                effects: vec![
                    Effect::AnswerCallback { text: Some(RETURN_ACK_TEXT.to_string()) },
                    Effect::Pause(self.return_delay),
                    Effect::Replay(DialogueEvent::Start),
                ],
            },

            (_, DialogueEvent::Callback(_)) => Transition {
                next: state,
                effects: vec![Effect::AnswerCallback { text: None }],
            },

            (DialogueState::AwaitingModeSelection, DialogueEvent::Text(text)) => {
                match ForecastMode::from_label(text) {
                    Some(mode) => Transition {
                        next: DialogueState::AwaitingCityInput { mode },
                        effects: vec![reply(CITY_PROMPT_TEXT, ReplyMarkup::RemoveKeyboard)],
                    },
                    None => Transition {
                        next: state,
                        effects: vec![reply(REPROMPT_TEXT, ReplyMarkup::None)],
                    },
                }
            }

            (DialogueState::AwaitingCityInput { mode }, DialogueEvent::Text(city)) => Transition {
                next: DialogueState::Idle,
                effects: vec![Effect::QueryWeather { city: city.clone(), mode }],
            },

            (DialogueState::Idle, DialogueEvent::Text(_)) => Transition::stay(state),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_RETURN_DELAY)
    }
}

fn reply(text: &str, markup: ReplyMarkup) -> Effect {
    Effect::Reply { text: text.to_string(), markup }
}

/// Two-row reply keyboard with the forecast options
pub fn mode_keyboard() -> ReplyMarkup {
    ReplyMarkup::Keyboard {
        rows: ForecastMode::all()
            .iter()
            .map(|mode| vec![KeyboardButton::new(mode.label())])
            .collect(),
        placeholder: Some(CHOOSE_MODE_PLACEHOLDER.to_string()),
    }
}

/// Inline "Вернуться" button under a weather answer
pub fn return_keyboard() -> ReplyMarkup {
    ReplyMarkup::Inline(vec![vec![
        KeyboardButton::new(RETURN_BUTTON_TEXT).with_callback(TO_MAIN_CALLBACK),
    ]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_states() -> Vec<DialogueState> {
        vec![
            DialogueState::Idle,
            DialogueState::AwaitingModeSelection,
            DialogueState::AwaitingCityInput { mode: ForecastMode::Today },
            DialogueState::AwaitingCityInput { mode: ForecastMode::Tomorrow },
        ]
    }

    #[test]
    fn test_start_from_any_state() {
        let dispatcher = Dispatcher::default();
        for state in all_states() {
            let t = dispatcher.transition(state, &DialogueEvent::Start);
            assert_eq!(t.next, DialogueState::AwaitingModeSelection);
            assert_eq!(t.effects.len(), 2);
            assert_eq!(t.effects[0], reply(GREETING_TEXT, ReplyMarkup::None));
            assert_eq!(t.effects[1], reply(CHOOSE_MODE_TEXT, mode_keyboard()));
        }
    }

    #[test]
    fn test_mode_keyboard_labels() {
        let ReplyMarkup::Keyboard { rows, placeholder } = mode_keyboard() else {
            panic!("expected reply keyboard");
        };
        let labels: Vec<&str> = rows.iter().flatten().map(|b| b.text.as_str()).collect();
        assert_eq!(labels, vec!["Прогноз на сегодня", "Прогноз на завтра"]);
        assert_eq!(placeholder.as_deref(), Some("Выберите..."));
    }

    #[test]
    fn test_valid_mode_selection() {
        let dispatcher = Dispatcher::default();
        let t = dispatcher.transition(
            DialogueState::AwaitingModeSelection,
            &DialogueEvent::Text("прогноз на ЗАВТРА".to_string()),
        );
        assert_eq!(t.next, DialogueState::AwaitingCityInput { mode: ForecastMode::Tomorrow });
        assert_eq!(t.effects, vec![reply(CITY_PROMPT_TEXT, ReplyMarkup::RemoveKeyboard)]);
    }

    #[test]
    fn test_invalid_mode_selection_reprompts() {
        let dispatcher = Dispatcher::default();
        for text in ["London", "today", "Прогноз", ""] {
            let t = dispatcher.transition(
                DialogueState::AwaitingModeSelection,
                &DialogueEvent::Text(text.to_string()),
            );
            assert_eq!(t.next, DialogueState::AwaitingModeSelection);
            assert_eq!(t.effects, vec![reply(REPROMPT_TEXT, ReplyMarkup::None)]);
        }
    }

    #[test]
    fn test_city_input_is_terminal() {
        let dispatcher = Dispatcher::default();
        let t = dispatcher.transition(
            DialogueState::AwaitingCityInput { mode: ForecastMode::Today },
            &DialogueEvent::Text("Нижний Новгород!".to_string()),
        );
        assert_eq!(t.next, DialogueState::Idle);
        assert_eq!(
            t.effects,
            vec![Effect::QueryWeather {
                city: "Нижний Новгород!".to_string(),
                mode: ForecastMode::Today,
            }]
        );
    }

    #[test]
    fn test_text_while_idle_is_ignored() {
        let dispatcher = Dispatcher::default();
        let t = dispatcher.transition(DialogueState::Idle, &DialogueEvent::Text("hi".to_string()));
        assert_eq!(t, Transition::stay(DialogueState::Idle));
    }

    #[test]
    fn test_return_to_main_keeps_state_until_replay() {
        let dispatcher = Dispatcher::new(Duration::from_millis(10));
        for state in all_states() {
            let t = dispatcher.transition(state, &DialogueEvent::Callback("to_main".to_string()));
            assert_eq!(t.next, state);
            assert_eq!(
                t.effects,
                vec![
                    Effect::AnswerCallback { text: Some(RETURN_ACK_TEXT.to_string()) },
                    Effect::Pause(Duration::from_millis(10)),
                    Effect::Replay(DialogueEvent::Start),
                ]
            );
        }
    }

    #[test]
    fn test_unknown_callback_is_only_acknowledged() {
        let dispatcher = Dispatcher::default();
        let state = DialogueState::AwaitingModeSelection;
        let t = dispatcher.transition(state, &DialogueEvent::Callback("other".to_string()));
        assert_eq!(t.next, state);
        assert_eq!(t.effects, vec![Effect::AnswerCallback { text: None }]);
    }

    #[test]
    fn test_return_keyboard_token() {
        let ReplyMarkup::Inline(rows) = return_keyboard() else {
            panic!("expected inline keyboard");
        };
        assert_eq!(rows[0][0].text, "Вернуться");
        assert_eq!(rows[0][0].callback_data.as_deref(), Some("to_main"));
    }
}
