//! Message handling - Event-driven dialogue processing

pub mod dispatcher;
pub mod parser;

pub use dispatcher::{Dispatcher, Effect};
pub use parser::MessageParser;
