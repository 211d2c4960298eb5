//! Personas command handler.

use anyhow::{Context, Result};
use std::path::Path;

use super::load_config_file;
use crate::persona::{DEFAULT_PERSONA, PersonaRegistry};
use crate::ui::Style;

fn load_registry(config: Option<&Path>) -> Result<(PersonaRegistry, String)> {
    let config = load_config_file(config)?;
    let registry = PersonaRegistry::with_custom(&config.personas)
        .context("Invalid persona in config file")?;
    let default_role = config
        .rolechat
        .role
        .unwrap_or_else(|| DEFAULT_PERSONA.to_string());
    Ok((registry, default_role))
}

/// Lists all personas (presets and custom).
pub fn list_personas(config: Option<&Path>) -> Result<()> {
    let (registry, default_role) = load_registry(config)?;

    let (presets, custom): (Vec<_>, Vec<_>) = registry.iter().partition(|p| p.preset);

    println!("{}", Style::header("Preset personas"));
    for persona in presets {
        print_row(&persona.key, &persona.description, persona.key == default_role);
    }

    if !custom.is_empty() {
        println!();
        println!("{}", Style::header("Custom personas"));
        for persona in custom {
            print_row(&persona.key, &persona.description, persona.key == default_role);
        }
    }

    Ok(())
}

fn print_row(key: &str, description: &str, is_default: bool) {
    let marker = if is_default {
        format!(" {}", Style::default_marker())
    } else {
        String::new()
    };
    println!(
        "  {}  {}{marker}",
        Style::value(format!("{key:10}")),
        Style::secondary(description)
    );
}

/// Shows details of a persona (description and system prompt).
pub fn show_persona(config: Option<&Path>, name: &str) -> Result<()> {
    let (registry, _) = load_registry(config)?;

    let persona = registry.get(&name.to_ascii_lowercase()).ok_or_else(|| {
        anyhow::anyhow!(
            "Persona '{name}' not found\n\nAvailable personas: {}",
            registry.keys().join(", ")
        )
    })?;

    let kind = if persona.preset {
        "Preset persona"
    } else {
        "Custom persona"
    };
    println!("{}", Style::header(kind));
    println!();
    println!("  {}  {}", Style::label("Name:"), Style::value(&persona.key));
    println!(
        "  {}  {}",
        Style::label("Desc:"),
        Style::secondary(&persona.description)
    );
    println!();
    println!("{}", Style::label("Prompt:"));
    println!("{}", persona.system_prompt);

    Ok(())
}
