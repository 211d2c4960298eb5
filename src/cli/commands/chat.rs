use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use super::load_config_file;
use crate::chat::{ChatRepl, CommandInterpreter, SessionInfo};
use crate::config::{ResolveOptions, resolve_config};
use crate::engine::CompletionClient;
use crate::session::SessionStore;

pub struct ChatOptions {
    pub config: Option<PathBuf>,
    pub resolve: ResolveOptions,
}

pub async fn run_chat(options: ChatOptions) -> Result<()> {
    let file_config = load_config_file(options.config.as_deref())?;
    let resolved = resolve_config(&options.resolve, &file_config)?;

    tracing::debug!(
        provider = %resolved.provider_name,
        model = %resolved.model,
        role = %resolved.role,
        "starting chat session"
    );

    let client = CompletionClient::new(
        resolved.endpoint.clone(),
        resolved.model.clone(),
        resolved.api_key,
    );
    let store = SessionStore::new(Arc::new(resolved.personas), &resolved.role)?;

    let mut interpreter = CommandInterpreter::new(store, resolved.params, client);
    if let Some(timeout) = resolved.timeout {
        interpreter = interpreter.with_timeout(timeout);
    }

    let info = SessionInfo {
        provider_name: resolved.provider_name,
        endpoint: resolved.endpoint,
        model: resolved.model,
    };

    ChatRepl::new(info, interpreter).run().await
}
