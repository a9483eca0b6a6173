//! Platform adapters

pub mod telegram;
