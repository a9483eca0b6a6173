//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Errors: Domain-specific errors
//! - Messaging: Event parsing and the dialogue transition table
//! - Services: Dialogue engine and weather rendering

pub mod errors;
pub mod services;
pub mod messaging;
