use inquire::autocompletion::{Autocomplete, Replacement};
use std::str::FromStr;

use crate::error::{ChatError, ChatResult};
use crate::session::max_tokens_range_error;

/// Literal that ends the chat loop. Not part of the `/` grammar.
pub const EXIT_TOKEN: &str = "quit";

/// What a command expects after its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    None,
    RoleKey,
    Float,
    Integer,
}

/// Which handler a command dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Role,
    Temperature,
    TopP,
    MaxTokens,
    Reset,
    Status,
    Help,
}

/// One row of the command grammar.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub kind: CommandKind,
    pub arg: ArgKind,
    pub usage: &'static str,
    pub description: &'static str,
}

/// The command grammar. Parsing, help output and completion all read it.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "role",
        kind: CommandKind::Role,
        arg: ArgKind::RoleKey,
        usage: "/role <name>",
        description: "Switch personality (resets chat)",
    },
    CommandSpec {
        name: "temp",
        kind: CommandKind::Temperature,
        arg: ArgKind::Float,
        usage: "/temp <value e.g., 0.7>",
        description: "Set temperature (0.0-1.2)",
    },
    CommandSpec {
        name: "top_p",
        kind: CommandKind::TopP,
        arg: ArgKind::Float,
        usage: "/top_p <value e.g., 0.9>",
        description: "Set top_p (0.1-1.0)",
    },
    CommandSpec {
        name: "max_tokens",
        kind: CommandKind::MaxTokens,
        arg: ArgKind::Integer,
        usage: "/max_tokens <integer e.g., 160>",
        description: "Set max tokens for each reply",
    },
    CommandSpec {
        name: "reset",
        kind: CommandKind::Reset,
        arg: ArgKind::None,
        usage: "/reset",
        description: "Reset conversation with current role",
    },
    CommandSpec {
        name: "status",
        kind: CommandKind::Status,
        arg: ArgKind::None,
        usage: "/status",
        description: "Show current settings",
    },
    CommandSpec {
        name: "help",
        kind: CommandKind::Help,
        arg: ArgKind::None,
        usage: "/help",
        description: "Show available commands",
    },
];

/// Looks up a command by name, case-insensitively.
pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// A fully validated slash command.
#[derive(Debug, Clone, PartialEq)]
pub enum SlashCommand {
    Role(String),
    Temperature(f64),
    TopP(f64),
    MaxTokens(i64),
    Reset,
    Status,
    Help,
}

/// Input types
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Text(String),
    Command(SlashCommand),
    Empty,
}

/// Returns true if `line` is the exit token.
pub fn is_exit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(EXIT_TOKEN)
}

/// Classifies one line of input.
///
/// Only the argument types are checked here. Range and persona checks are
/// left to the state owners.
pub fn parse_input(input: &str) -> ChatResult<Input> {
    let input = input.trim();

    if input.is_empty() {
        return Ok(Input::Empty);
    }

    input
        .strip_prefix('/')
        .map_or_else(|| Ok(Input::Text(input.to_string())), parse_slash_command)
}

fn parse_slash_command(cmd: &str) -> ChatResult<Input> {
    let mut parts = cmd.split_whitespace();
    let name = parts.next().unwrap_or("");

    let entry = lookup(name).ok_or_else(|| ChatError::UnknownCommand(name.to_string()))?;

    let argument = match entry.arg {
        ArgKind::None => "",
        ArgKind::RoleKey | ArgKind::Float | ArgKind::Integer => {
            parts.next().ok_or_else(|| malformed(entry, ""))?
        }
    };

    let command = match entry.kind {
        CommandKind::Role => SlashCommand::Role(argument.to_ascii_lowercase()),
        CommandKind::Temperature => SlashCommand::Temperature(parse_arg(entry, argument)?),
        CommandKind::TopP => SlashCommand::TopP(parse_arg(entry, argument)?),
        CommandKind::MaxTokens => SlashCommand::MaxTokens(parse_max_tokens(entry, argument)?),
        CommandKind::Reset => SlashCommand::Reset,
        CommandKind::Status => SlashCommand::Status,
        CommandKind::Help => SlashCommand::Help,
    };

    Ok(Input::Command(command))
}

fn malformed(entry: &CommandSpec, raw: &str) -> ChatError {
    ChatError::MalformedArgument {
        command: entry.name,
        argument: raw.to_string(),
        usage: entry.usage,
    }
}

fn parse_arg<T: FromStr>(entry: &CommandSpec, raw: &str) -> ChatResult<T> {
    raw.parse().map_err(|_| malformed(entry, raw))
}

/// An integer too large for `i64` is still an integer, so it is out of range
/// rather than malformed.
fn parse_max_tokens(entry: &CommandSpec, raw: &str) -> ChatResult<i64> {
    parse_arg(entry, raw).map_err(|e| {
        if is_integer_literal(raw) {
            max_tokens_range_error(raw.to_string())
        } else {
            e
        }
    })
}

fn is_integer_literal(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Slash command autocompleter
#[derive(Clone, Default)]
pub struct SlashCommandCompleter;

impl Autocomplete for SlashCommandCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        let Some(prefix) = input.strip_prefix('/') else {
            return Ok(vec![]);
        };

        let suggestions: Vec<String> = COMMANDS
            .iter()
            .filter(|c| c.name.starts_with(&prefix.to_ascii_lowercase()))
            .map(|c| format!("/{}  {}", c.name, c.description))
            .collect();

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement =
            highlighted_suggestion.map(|s| s.split_whitespace().next().unwrap_or("").to_string());
        Ok(replacement)
    }
}
