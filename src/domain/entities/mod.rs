//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod event;
pub mod session;
pub mod weather;
pub mod log_entry;

pub use user::User;
pub use event::{DialogueEvent, Incoming};
pub use session::{DialogueSession, DialogueState, ForecastMode};
pub use weather::{CurrentWeather, TomorrowForecast};
pub use log_entry::LogEntry;
