//! # rolechat - Role-switchable Chat CLI
//!
//! `rolechat` is a conversational command-line client for OpenAI-compatible
//! chat-completion endpoints (a local Ollama server by default). Each session
//! has one active persona, a transcript seeded with that persona's system
//! prompt, and a set of generation parameters that slash commands adjust.
//!
//! ## Quick Start
//!
//! ```bash
//! # Chat with the default persona (tutor)
//! rolechat
//!
//! # Start as the pirate, a bit calmer
//! rolechat --role pirate --temperature 0.5
//!
//! # List personas
//! rolechat personas
//! ```
//!
//! Inside a session:
//!
//! ```text
//! /role pirate       switch persona (resets the conversation)
//! /temp 0.3          set temperature (0.0-1.2)
//! /top_p 0.9         set top_p (0.1-1.0)
//! /max_tokens 160    set max tokens per reply
//! /reset             reset the conversation, keep the persona
//! /status            show persona and parameters
//! /help              list commands
//! quit               exit
//! ```
//!
//! ## Configuration
//!
//! Settings are read from `~/.config/rolechat/config.toml`:
//!
//! ```toml
//! [rolechat]
//! provider = "ollama"
//! model = "llama3:8b"
//! role = "tutor"
//!
//! [providers.ollama]
//! endpoint = "http://localhost:11434"
//! models = ["llama3:8b"]
//!
//! [personas.critic]
//! description = "Terse code reviewer"
//! prompt = "You are a terse, exacting code reviewer."
//! ```

/// Interactive chat mode: command grammar, interpreter and REPL.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and provider settings.
pub mod config;

/// The chat engine trait and its HTTP client.
pub mod engine;

/// Recoverable chat errors.
pub mod error;

/// Line input for non-interactive sessions.
pub mod input;

/// Diagnostic logging setup.
pub mod logging;

/// Global output configuration (colors).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Built-in and custom personas.
pub mod persona;

/// Conversation state and generation parameters.
pub mod session;

/// Terminal UI components (spinner, colors).
pub mod ui;
