//! Application services - Business logic orchestration

pub mod dialogue_service;
pub mod weather_service;

pub use dialogue_service::DialogueEngine;
pub use weather_service::WeatherService;
