//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Configuration loading
//! - Database: SQLite access for the statistics table
//! - Storage: RequestLog backed by the database
//! - Weather: WeatherAPI.com client
//! - Adapters: Platform integrations (Telegram)

pub mod config;
pub mod database;
pub mod storage;
pub mod weather;
pub mod adapters;
