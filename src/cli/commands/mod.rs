//! CLI command implementations.

pub mod check;
pub mod dispatcher;

pub use check::CheckCommand;
pub use dispatcher::CommandDispatcher;
