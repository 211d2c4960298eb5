//! Persona registry.
//!
//! A persona is a named system prompt that frames the assistant for a whole
//! conversation. The registry is built once at startup from the built-in
//! presets plus any custom personas in the config file, and is never
//! modified afterwards.

use std::collections::HashMap;

use crate::config::CustomPersona;

/// A built-in persona (hardcoded, not modifiable by users).
#[derive(Debug, Clone)]
pub struct PresetPersona {
    /// The persona key (e.g., "tutor", "pirate").
    pub key: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// System prompt that seeds every conversation with this persona.
    pub prompt: &'static str,
}

/// All built-in personas.
pub const PRESETS: &[PresetPersona] = &[
    PresetPersona {
        key: "tutor",
        description: "Lexi, a cheerful study buddy and math tutor",
        prompt: "You are Lexi, a cheerful and supportive AI Study Buddy and math tutor. \
                 You help middle school students understand school subjects like math, science, and history. \
                 Explain step-by-step in simple words with short examples. \
                 Be calm, encouraging, and positive. \
                 End every response with a short follow-up question.",
    },
    PresetPersona {
        key: "pirate",
        description: "Captain Chuckles, a playful pirate comedian",
        prompt: "You are Captain Chuckles, a playful pirate comedian. \
                 Use light pirate slang (like 'Ahoy!', 'Arr!'), be friendly and silly. \
                 Give helpful answers, then end with a tiny pirate-themed joke or pun.",
    },
];

/// Key of the persona a session starts with when nothing else is configured.
pub const DEFAULT_PERSONA: &str = "tutor";

/// A persona as held by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub key: String,
    pub description: String,
    pub system_prompt: String,
    pub preset: bool,
}

impl From<&PresetPersona> for Persona {
    fn from(preset: &PresetPersona) -> Self {
        Self {
            key: preset.key.to_string(),
            description: preset.description.to_string(),
            system_prompt: preset.prompt.to_string(),
            preset: true,
        }
    }
}

/// The closed set of personas available for a run.
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    // Presets first in declaration order, then custom personas sorted by key.
    personas: Vec<Persona>,
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self {
            personas: PRESETS.iter().map(Persona::from).collect(),
        }
    }
}

impl PersonaRegistry {
    /// Builds a registry from the presets plus validated custom personas.
    #[allow(clippy::implicit_hasher)]
    pub fn with_custom(custom: &HashMap<String, CustomPersona>) -> Result<Self, PersonaError> {
        let mut registry = Self::default();

        for key in sorted_custom_keys(custom) {
            validate_custom_key(key)?;
            let persona = &custom[key];
            if persona.prompt.trim().is_empty() {
                return Err(PersonaError::EmptyPrompt(key.clone()));
            }
            registry.personas.push(Persona {
                key: key.clone(),
                description: persona.description.clone(),
                system_prompt: persona.prompt.trim().to_string(),
                preset: false,
            });
        }

        Ok(registry)
    }

    pub fn get(&self, key: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> Vec<String> {
        self.personas.iter().map(|p| p.key.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter()
    }
}

/// Looks up a preset persona by key.
pub fn get_preset(key: &str) -> Option<&'static PresetPersona> {
    PRESETS.iter().find(|p| p.key == key)
}

/// Returns true if the key is a preset persona.
pub fn is_preset(key: &str) -> bool {
    get_preset(key).is_some()
}

/// Returns custom persona keys sorted alphabetically.
#[allow(clippy::implicit_hasher)]
pub fn sorted_custom_keys(personas: &HashMap<String, CustomPersona>) -> Vec<&String> {
    let mut keys: Vec<_> = personas.keys().collect();
    keys.sort();
    keys
}

/// Persona registry errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersonaError {
    /// A custom persona reuses a preset key.
    #[error("Cannot redefine preset persona '{0}'")]
    PresetImmutable(String),
    /// Invalid persona key format.
    #[error(
        "Invalid persona key '{0}': must start with a lowercase letter and contain only lowercase letters, digits and underscores"
    )]
    InvalidKey(String),
    /// A custom persona without a prompt.
    #[error("Persona '{0}' has an empty prompt")]
    EmptyPrompt(String),
}

/// Validates a custom persona key.
///
/// `/role` lowercases its argument before lookup, so keys are lowercase only.
pub fn validate_custom_key(key: &str) -> Result<(), PersonaError> {
    if !key.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
        return Err(PersonaError::InvalidKey(key.to_string()));
    }

    if !key
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(PersonaError::InvalidKey(key.to_string()));
    }

    if is_preset(key) {
        return Err(PersonaError::PresetImmutable(key.to_string()));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn custom(prompt: &str) -> CustomPersona {
        CustomPersona {
            description: "desc".to_string(),
            prompt: prompt.to_string(),
        }
    }

    #[test]
    fn test_preset_keys() {
        let keys: Vec<_> = PRESETS.iter().map(|p| p.key).collect();
        assert_eq!(keys, vec!["tutor", "pirate"]);
    }

    #[test]
    fn test_default_persona_is_a_preset() {
        assert!(is_preset(DEFAULT_PERSONA));
    }

    #[test]
    fn test_default_registry_has_presets_only() {
        let registry = PersonaRegistry::default();
        assert_eq!(registry.keys(), vec!["tutor", "pirate"]);
        assert!(registry.get("tutor").is_some_and(|p| p.preset));
    }

    #[test]
    fn test_with_custom_appends_sorted() {
        let mut personas = HashMap::new();
        personas.insert("zen".to_string(), custom("Be calm."));
        personas.insert("critic".to_string(), custom("  Be terse.  "));

        let registry = PersonaRegistry::with_custom(&personas).unwrap();

        assert_eq!(registry.keys(), vec!["tutor", "pirate", "critic", "zen"]);
        let critic = registry.get("critic");
        assert_eq!(critic.map(|p| p.system_prompt.as_str()), Some("Be terse."));
        assert!(critic.is_some_and(|p| !p.preset));
    }

    #[test]
    fn test_with_custom_rejects_preset_key() {
        let mut personas = HashMap::new();
        personas.insert("pirate".to_string(), custom("Arr."));

        let result = PersonaRegistry::with_custom(&personas);
        assert!(matches!(result, Err(PersonaError::PresetImmutable(_))));
    }

    #[test]
    fn test_with_custom_rejects_empty_prompt() {
        let mut personas = HashMap::new();
        personas.insert("blank".to_string(), custom("   "));

        let result = PersonaRegistry::with_custom(&personas);
        assert_eq!(
            result.err(),
            Some(PersonaError::EmptyPrompt("blank".to_string()))
        );
    }

    #[test]
    fn test_validate_custom_key_valid() {
        assert!(validate_custom_key("critic").is_ok());
        assert!(validate_custom_key("coach2").is_ok());
        assert!(validate_custom_key("code_reviewer").is_ok());
        assert!(validate_custom_key("a").is_ok());
    }

    #[test]
    fn test_validate_custom_key_invalid() {
        assert!(validate_custom_key("").is_err());
        assert!(validate_custom_key("2coach").is_err());
        assert!(validate_custom_key("_hidden").is_err());
        assert!(validate_custom_key("has-dash").is_err());
        assert!(validate_custom_key("Critic").is_err());
    }

    #[test]
    fn test_persona_error_display() {
        let msg = PersonaError::InvalidKey("Bad".to_string()).to_string();
        assert!(msg.contains("Invalid persona key 'Bad'"));

        let msg = PersonaError::PresetImmutable("tutor".to_string()).to_string();
        assert!(msg.contains("Cannot redefine preset persona 'tutor'"));
    }
}
