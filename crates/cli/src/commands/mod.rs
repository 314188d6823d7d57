//! Command handlers for the sikkim CLI.

mod ask;
mod serve;

pub use ask::AskCommand;
pub use serve::ServeCommand;
