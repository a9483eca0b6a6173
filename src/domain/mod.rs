//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (User, DialogueSession, LogEntry)
//! - Traits: Abstractions for infrastructure (Bot, RequestLog, WeatherProvider)

pub mod entities;
pub mod traits;
