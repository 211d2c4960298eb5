//! Interactive chat mode.
//!
//! Provides the command grammar, the interpreter that applies it to a
//! session, and the REPL that drives both.

/// Slash command parsing and autocomplete.
pub mod command;
mod interpreter;
mod repl;
mod ui;

pub use interpreter::{CommandInterpreter, Outcome, SharedInterpreter, StatusReport};
pub use repl::{ChatRepl, SessionInfo};
