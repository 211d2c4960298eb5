//! Provider listing command handler.

use anyhow::Result;
use std::path::Path;

use super::load_config_file;
use crate::config::{DEFAULT_PROVIDER, ProviderConfig};
use crate::ui::Style;

/// Prints configured providers to stdout.
///
/// If `specific_provider` is provided, shows detailed information for that provider.
/// Without any configured provider, shows the built-in local Ollama provider.
pub fn print_providers(config: Option<&Path>, specific_provider: Option<&str>) -> Result<()> {
    let config = load_config_file(config)?;

    let default_provider = config
        .rolechat
        .provider
        .as_deref()
        .unwrap_or(DEFAULT_PROVIDER);

    let mut providers: Vec<(String, ProviderConfig)> = config.providers.into_iter().collect();
    if !providers.iter().any(|(name, _)| name == DEFAULT_PROVIDER) {
        providers.push((DEFAULT_PROVIDER.to_string(), ProviderConfig::builtin_ollama()));
    }
    providers.sort_by(|a, b| a.0.cmp(&b.0));

    if let Some(provider_name) = specific_provider {
        let Some((name, provider)) = providers.iter().find(|(n, _)| n == provider_name) else {
            anyhow::bail!("Provider '{provider_name}' not found");
        };
        print_details(name, provider, name == default_provider);
    } else {
        println!("{}", Style::header("Providers"));
        for (name, provider) in &providers {
            let marker = if name == default_provider {
                format!(" {}", Style::default_marker())
            } else {
                String::new()
            };
            println!("  {}{marker}", Style::value(name));
            println!("    endpoint: {}", Style::secondary(&provider.endpoint));
            if !provider.models.is_empty() {
                println!("    models: {}", provider.models.join(", "));
            }
        }
    }

    Ok(())
}

fn print_details(name: &str, provider: &ProviderConfig, is_default: bool) {
    println!(
        "Provider: {}{}",
        Style::value(name),
        if is_default { " (default)" } else { "" }
    );
    println!("  endpoint = {}", provider.endpoint);
    if provider.requires_api_key() {
        let has_key = provider.get_api_key().is_some();
        println!(
            "  api_key  = {}",
            if has_key { "(set)" } else { "(not set)" }
        );
    }
    if provider.models.is_empty() {
        println!("  models   = (none configured)");
    } else {
        println!("  models:");
        for model in &provider.models {
            println!("    - {model}");
        }
    }
}
