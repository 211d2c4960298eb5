use std::sync::Arc;

use super::message::{Message, Role};
use crate::error::{ChatError, ChatResult};
use crate::persona::{Persona, PersonaRegistry};

/// Stored in place of an empty assistant reply.
pub const NO_RESPONSE: &str = "[No response]";

/// Owns the active persona and the conversation transcript.
///
/// `transcript[0]` is always the system message of the active persona. The
/// transcript can only be changed through the methods below.
#[derive(Debug, Clone)]
pub struct SessionStore {
    registry: Arc<PersonaRegistry>,
    active_role: String,
    transcript: Vec<Message>,
}

impl SessionStore {
    /// Starts a session with `role`, which must be in the registry.
    pub fn new(registry: Arc<PersonaRegistry>, role: &str) -> ChatResult<Self> {
        let mut store = Self {
            registry,
            active_role: String::new(),
            transcript: Vec::new(),
        };
        store.switch_role(role)?;
        Ok(store)
    }

    /// Makes `key` the active persona and discards the conversation.
    pub fn switch_role(&mut self, key: &str) -> ChatResult<()> {
        let persona = self
            .registry
            .get(key)
            .ok_or_else(|| ChatError::UnknownRole {
                key: key.to_string(),
                available: self.registry.keys(),
            })?;

        self.transcript = vec![Message::system(&persona.system_prompt)];
        self.active_role = persona.key.clone();
        tracing::debug!(role = %self.active_role, "conversation reseeded");
        Ok(())
    }

    /// Discards the conversation but keeps the active persona.
    pub fn reset_conversation(&mut self) {
        let Some(persona) = self.registry.get(&self.active_role) else {
            // active_role always comes from the registry, which never shrinks.
            return;
        };
        self.transcript = vec![Message::system(&persona.system_prompt)];
        tracing::debug!(role = %self.active_role, "conversation reset");
    }

    pub fn append_user_turn(&mut self, text: &str) -> ChatResult<()> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyInput);
        }
        self.transcript.push(Message::user(text));
        Ok(())
    }

    /// Appends the reply; an empty reply is stored as [`NO_RESPONSE`].
    /// Returns the text that was stored.
    pub fn append_assistant_turn(&mut self, text: &str) -> &str {
        let content = if text.is_empty() { NO_RESPONSE } else { text };
        self.transcript.push(Message::assistant(content));
        &self.transcript[self.transcript.len() - 1].content
    }

    pub fn current_transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn active_role(&self) -> &str {
        &self.active_role
    }

    pub fn persona(&self) -> Option<&Persona> {
        self.registry.get(&self.active_role)
    }

    /// Number of user turns in the current conversation.
    pub fn turn_count(&self) -> usize {
        self.transcript
            .iter()
            .filter(|m| m.role == Role::User)
            .count()
    }
}
