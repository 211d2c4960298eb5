//! Errors produced while interpreting a line of chat input.
//!
//! Every variant is recoverable: the REPL prints it and waits for the next
//! line. None of them leave the session partially updated, except
//! [`ChatError::Inference`], which keeps the already committed user turn.

use thiserror::Error;

/// A recoverable error from the session core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChatError {
    /// `/role` named a persona that is not in the registry.
    #[error("Unknown role '{key}'. Options: {}", available.join(", "))]
    UnknownRole { key: String, available: Vec<String> },

    /// A parameter value outside its declared bounds.
    #[error("{parameter} must be within {bounds} (got {value})")]
    Range {
        parameter: &'static str,
        value: String,
        bounds: String,
    },

    /// A command argument is missing or not of the expected type. A missing
    /// argument has an empty `argument`.
    #[error("{}\nUsage: {usage}", describe_argument(.command, .argument))]
    MalformedArgument {
        command: &'static str,
        argument: String,
        usage: &'static str,
    },

    /// Blank input never becomes a conversational turn.
    #[error("Input is empty")]
    EmptyInput,

    /// A `/`-prefixed line that matches no known command.
    #[error("Unknown command: /{0}. Type /help for options.")]
    UnknownCommand(String),

    /// The chat engine failed or timed out.
    #[error("Inference failed: {0}")]
    Inference(String),
}

pub type ChatResult<T> = Result<T, ChatError>;

fn describe_argument(command: &str, argument: &str) -> String {
    if argument.is_empty() {
        format!("Missing argument for /{command}")
    } else {
        format!("Invalid argument '{argument}' for /{command}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_lists_options() {
        let err = ChatError::UnknownRole {
            key: "wizard".to_string(),
            available: vec!["pirate".to_string(), "tutor".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown role 'wizard'. Options: pirate, tutor"
        );
    }

    #[test]
    fn test_range_error_names_parameter_and_bounds() {
        let err = ChatError::Range {
            parameter: "temperature",
            value: "5".to_string(),
            bounds: "[0.0, 1.2]".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("temperature"));
        assert!(msg.contains("[0.0, 1.2]"));
        assert!(msg.contains("got 5"));
    }

    #[test]
    fn test_malformed_argument_includes_usage() {
        let err = ChatError::MalformedArgument {
            command: "temp",
            argument: "warm".to_string(),
            usage: "/temp <value e.g., 0.7>",
        };
        let msg = err.to_string();
        assert!(msg.contains("'warm'"));
        assert!(msg.contains("Usage: /temp"));
    }

    #[test]
    fn test_missing_argument_names_command() {
        let err = ChatError::MalformedArgument {
            command: "role",
            argument: String::new(),
            usage: "/role <name>",
        };
        assert_eq!(
            err.to_string(),
            "Missing argument for /role\nUsage: /role <name>"
        );
    }
}
