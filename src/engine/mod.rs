//! The chat-completion collaborator.
//!
//! The session core only sees the [`ChatEngine`] trait; [`CompletionClient`]
//! is the HTTP implementation used by the binary.

mod client;
mod sse_parser;

use async_trait::async_trait;

use crate::session::{Message, ParamSnapshot};

pub use client::CompletionClient;

/// Produces one assistant reply for a transcript.
#[async_trait]
pub trait ChatEngine: Send + Sync {
    /// Returns the raw reply text. Errors are opaque to the caller and are
    /// reported as inference failures.
    async fn complete(
        &self,
        transcript: &[Message],
        params: ParamSnapshot,
    ) -> anyhow::Result<String>;
}

#[async_trait]
impl<E: ChatEngine + ?Sized> ChatEngine for std::sync::Arc<E> {
    async fn complete(
        &self,
        transcript: &[Message],
        params: ParamSnapshot,
    ) -> anyhow::Result<String> {
        (**self).complete(transcript, params).await
    }
}
