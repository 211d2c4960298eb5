use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::paths;
use crate::persona::{DEFAULT_PERSONA, PersonaRegistry};
use crate::session::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P, ParameterSet};
use crate::ui::Style;

/// Provider used when neither the CLI nor the config file names one.
pub const DEFAULT_PROVIDER: &str = "ollama";
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3:8b";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default settings in the `[rolechat]` section of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DefaultsConfig {
    /// Default provider name.
    pub provider: Option<String>,
    /// Default model name.
    pub model: Option<String>,
    /// Persona a session starts with.
    pub role: Option<String>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub max_tokens: Option<u32>,
    /// Per-reply timeout in seconds; 0 disables it.
    pub timeout_secs: Option<u64>,
}

/// Configuration for a chat-completion provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    /// The OpenAI-compatible API endpoint URL.
    pub endpoint: String,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// List of available models for this provider.
    #[serde(default)]
    pub models: Vec<String>,
}

impl ProviderConfig {
    /// The provider used when nothing is configured: a local Ollama server.
    pub fn builtin_ollama() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            api_key_env: None,
            models: vec![DEFAULT_MODEL.to_string()],
        }
    }

    /// Gets the API key, preferring environment variable over config file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(env_var) = &self.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone()
    }

    /// Returns `true` if this provider requires an API key.
    pub const fn requires_api_key(&self) -> bool {
        self.api_key.is_some() || self.api_key_env.is_some()
    }
}

/// A user-defined persona from the `[personas.<key>]` tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomPersona {
    /// Short description for listings.
    #[serde(default)]
    pub description: String,
    /// The system prompt.
    pub prompt: String,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/rolechat/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub rolechat: DefaultsConfig,
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Custom personas keyed by persona key.
    #[serde(default)]
    pub personas: HashMap<String, CustomPersona>,
}

/// Everything needed to start a chat session.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub provider_name: String,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub role: String,
    pub params: ParameterSet,
    /// `None` when replies may take as long as they need.
    pub timeout: Option<Duration>,
    pub personas: PersonaRegistry,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub role: Option<String>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// Priority: CLI options, then the config file, then built-in defaults.
///
/// # Errors
///
/// Returns an error if the provider is unknown, an API key is required but
/// missing, a custom persona is invalid, the starting role is unknown, or a
/// parameter is out of range.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    let defaults = &config_file.rolechat;

    let provider_name = options
        .provider
        .as_ref()
        .or(defaults.provider.as_ref())
        .cloned()
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

    let provider_config = match config_file.providers.get(&provider_name) {
        Some(provider) => provider.clone(),
        None if provider_name == DEFAULT_PROVIDER => ProviderConfig::builtin_ollama(),
        None => {
            let mut available: Vec<_> = config_file.providers.keys().map(String::as_str).collect();
            available.sort_unstable();
            if available.is_empty() {
                bail!(
                    "Provider '{provider_name}' not found\n\n\
                     No providers configured. Add providers to ~/.config/rolechat/config.toml"
                );
            }
            bail!(
                "Provider '{provider_name}' not found\n\n\
                 Available providers:\n  \
                 - {}\n\n\
                 Add providers to ~/.config/rolechat/config.toml",
                available.join("\n  - ")
            );
        }
    };

    let model = options
        .model
        .as_ref()
        .or(defaults.model.as_ref())
        .or(provider_config.models.first())
        .cloned()
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    if !provider_config.models.is_empty() && !provider_config.models.contains(&model) {
        tracing::warn!(%model, provider = %provider_name, "model is not in the provider's models list");
        eprintln!(
            "{} Model '{}' is not in the configured models list for '{}'\n\
             Configured models: {}\n\
             Proceeding anyway...\n",
            Style::warning("Warning:"),
            model,
            provider_name,
            provider_config.models.join(", ")
        );
    }

    let api_key = provider_config.get_api_key();

    if provider_config.requires_api_key() && api_key.is_none() {
        let env_var = provider_config.api_key_env.as_deref().unwrap_or("API_KEY");
        bail!(
            "Provider '{provider_name}' requires an API key\n\n\
             Set the {env_var} environment variable:\n  \
             export {env_var}=\"your-api-key\"\n\n\
             Or set api_key in ~/.config/rolechat/config.toml"
        );
    }

    let personas = PersonaRegistry::with_custom(&config_file.personas)
        .context("Invalid persona in config file")?;

    let role = options
        .role
        .as_ref()
        .or(defaults.role.as_ref())
        .map_or_else(|| DEFAULT_PERSONA.to_string(), |r| r.to_ascii_lowercase());

    if !personas.contains(&role) {
        bail!(
            "Unknown role '{role}'\n\nAvailable roles: {}",
            personas.keys().join(", ")
        );
    }

    let params = ParameterSet::from_values(
        options
            .temperature
            .or(defaults.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE),
        options.top_p.or(defaults.top_p).unwrap_or(DEFAULT_TOP_P),
        options
            .max_tokens
            .or(defaults.max_tokens)
            .unwrap_or(DEFAULT_MAX_TOKENS),
    )
    .context("Invalid generation parameter")?;

    let timeout_secs = options
        .timeout_secs
        .or(defaults.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(ResolvedConfig {
        provider_name,
        endpoint: provider_config.endpoint,
        model,
        api_key,
        role,
        params,
        timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        personas,
    })
}

/// Loads the configuration file.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a config manager for the default location.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/rolechat/config.toml`
    /// or `~/.config/rolechat/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    /// Creates a config manager for an explicit file.
    pub const fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile = toml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(config_file)
    }

    /// Loads the config file, or the defaults if there is none.
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
            Ok(ConfigFile::default())
        }
    }
}
