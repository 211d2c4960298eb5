//! Configuration file management and provider settings.

mod manager;

pub use manager::{
    ConfigFile, ConfigManager, CustomPersona, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_PROVIDER,
    DEFAULT_TIMEOUT_SECS, DefaultsConfig, ProviderConfig, ResolveOptions, ResolvedConfig,
    resolve_config,
};
