use std::fmt;

/// Forecast horizon chosen from the reply keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastMode {
    Today,
    Tomorrow,
}

impl ForecastMode {
    /// Value stored in the `forecast_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMode::Today => "today",
            ForecastMode::Tomorrow => "tomorrow",
        }
    }

    /// Reply keyboard label
    pub fn label(&self) -> &'static str {
        match self {
            ForecastMode::Today => "Прогноз на сегодня",
            ForecastMode::Tomorrow => "Прогноз на завтра",
        }
    }

    pub const fn all() -> &'static [ForecastMode] {
        &[ForecastMode::Today, ForecastMode::Tomorrow]
    }

    /// Case-insensitive match of user text against the keyboard labels
    pub fn from_label(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|mode| mode.label().to_lowercase() == lower)
    }
}

impl fmt::Display for ForecastMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a user is in the forecast dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogueState {
    #[default]
    Idle,
    AwaitingModeSelection,
    AwaitingCityInput { mode: ForecastMode },
}

/// Snapshot of one user's dialogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueSession {
    pub user_id: String,
    pub state: DialogueState,
}

impl DialogueSession {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            state: DialogueState::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_is_case_insensitive() {
        assert_eq!(ForecastMode::from_label("Прогноз на сегодня"), Some(ForecastMode::Today));
        assert_eq!(ForecastMode::from_label("ПРОГНОЗ НА ЗАВТРА"), Some(ForecastMode::Tomorrow));
        assert_eq!(ForecastMode::from_label("прогноз на завтра"), Some(ForecastMode::Tomorrow));
    }

    #[test]
    fn test_from_label_rejects_other_text() {
        assert_eq!(ForecastMode::from_label("today"), None);
        assert_eq!(ForecastMode::from_label(" Прогноз на сегодня"), None);
        assert_eq!(ForecastMode::from_label(""), None);
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = DialogueSession::new("1");
        assert_eq!(session.user_id, "1");
        assert_eq!(session.state, DialogueState::Idle);
    }
}
