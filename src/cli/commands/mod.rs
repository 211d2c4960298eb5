//! Subcommand implementations.

/// Chat mode command handler.
pub mod chat;

/// Persona listing command handler.
pub mod personas;

/// Provider listing command handler.
pub mod providers;

use anyhow::Result;
use std::path::Path;

use crate::config::{ConfigFile, ConfigManager};

/// Loads the config file given on the command line, which must exist, or the
/// one at the default location, which may be absent.
pub fn load_config_file(path: Option<&Path>) -> Result<ConfigFile> {
    match path {
        Some(path) => ConfigManager::with_path(path.to_path_buf()).load(),
        None => ConfigManager::new()?.load_or_default(),
    }
}
