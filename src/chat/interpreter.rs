//! Applies one line of input to a session.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use super::command::{Input, SlashCommand, parse_input};
use crate::engine::ChatEngine;
use crate::error::{ChatError, ChatResult};
use crate::session::{Message, ParameterSet, SessionStore};

/// Read-only view of the session settings, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub role: String,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}

// Floats use `Debug` so that whole values keep their decimal point (`1.0`).
impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "role: {}", self.role)?;
        writeln!(f, "temperature: {:?}", self.temperature)?;
        writeln!(f, "top_p: {:?}", self.top_p)?;
        write!(f, "max_tokens: {}", self.max_tokens)
    }
}

/// What a successfully handled line produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The assistant's reply to a conversation turn.
    Reply(String),
    RoleSwitched(String),
    TemperatureSet(f64),
    TopPSet(f64),
    MaxTokensSet(u32),
    Reset,
    Status(StatusReport),
    Help,
}

/// Owns a session and its parameters and drives the chat engine.
///
/// Commands never reach the engine. Conversation turns are committed to the
/// transcript before the engine is called, and stay there if it fails.
pub struct CommandInterpreter<E> {
    store: SessionStore,
    params: ParameterSet,
    engine: E,
    timeout: Option<Duration>,
}

impl<E: ChatEngine> CommandInterpreter<E> {
    pub const fn new(store: SessionStore, params: ParameterSet, engine: E) -> Self {
        Self {
            store,
            params,
            engine,
            timeout: None,
        }
    }

    /// Bounds every engine call; an elapsed call counts as a failed turn.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Handles one line of input.
    pub async fn handle(&mut self, line: &str) -> ChatResult<Outcome> {
        match parse_input(line)? {
            Input::Empty => Err(ChatError::EmptyInput),
            Input::Command(cmd) => self.execute(cmd),
            Input::Text(text) => self.take_turn(&text).await.map(Outcome::Reply),
        }
    }

    fn execute(&mut self, cmd: SlashCommand) -> ChatResult<Outcome> {
        tracing::debug!(?cmd, "executing command");
        match cmd {
            SlashCommand::Role(key) => {
                self.store.switch_role(&key)?;
                Ok(Outcome::RoleSwitched(key))
            }
            SlashCommand::Temperature(value) => {
                self.params.set_temperature(value).map(Outcome::TemperatureSet)
            }
            SlashCommand::TopP(value) => self.params.set_top_p(value).map(Outcome::TopPSet),
            SlashCommand::MaxTokens(value) => {
                self.params.set_max_tokens(value).map(Outcome::MaxTokensSet)
            }
            SlashCommand::Reset => {
                self.store.reset_conversation();
                Ok(Outcome::Reset)
            }
            SlashCommand::Status => Ok(Outcome::Status(self.status())),
            SlashCommand::Help => Ok(Outcome::Help),
        }
    }

    async fn take_turn(&mut self, text: &str) -> ChatResult<String> {
        self.store.append_user_turn(text)?;

        let transcript = self.store.current_transcript();
        let params = self.params.snapshot();
        tracing::debug!(
            role = %self.store.active_role(),
            messages = transcript.len(),
            "invoking chat engine"
        );

        let call = self.engine.complete(transcript, params);
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(anyhow::anyhow!("no reply within {}s", limit.as_secs_f64()))),
            None => call.await,
        };

        match result {
            Ok(reply) => Ok(self.store.append_assistant_turn(reply.trim()).to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "chat engine failed; user turn kept");
                Err(ChatError::Inference(format!("{e:#}")))
            }
        }
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            role: self.store.active_role().to_string(),
            temperature: self.params.temperature(),
            top_p: self.params.top_p(),
            max_tokens: self.params.max_tokens(),
        }
    }

    pub fn transcript(&self) -> &[Message] {
        self.store.current_transcript()
    }

    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    pub const fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub const fn engine(&self) -> &E {
        &self.engine
    }
}

/// A session that can be shared between tasks.
///
/// Each `submit` holds the session lock for the whole line, engine call
/// included, so turns for one session never interleave. Separate
/// `SharedInterpreter`s share nothing.
pub struct SharedInterpreter<E> {
    inner: Arc<Mutex<CommandInterpreter<E>>>,
}

impl<E> Clone for SharedInterpreter<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: ChatEngine> SharedInterpreter<E> {
    pub fn new(interpreter: CommandInterpreter<E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(interpreter)),
        }
    }

    pub async fn submit(&self, line: &str) -> ChatResult<Outcome> {
        self.inner.lock().await.handle(line).await
    }

    pub async fn status(&self) -> StatusReport {
        self.inner.lock().await.status()
    }

    pub async fn transcript(&self) -> Vec<Message> {
        self.inner.lock().await.transcript().to_vec()
    }
}
