use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rolechat")]
#[command(about = "Role-switchable chat CLI for OpenAI-compatible endpoints")]
#[command(version)]
pub struct Args {
    /// Persona to start with (e.g., tutor, pirate)
    #[arg(short = 'r', long)]
    pub role: Option<String>,

    /// Provider name (from config file)
    #[arg(short = 'p', long)]
    pub provider: Option<String>,

    /// Model name
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Sampling temperature (0.0-1.2)
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Nucleus sampling threshold (0.1-1.0)
    #[arg(long = "top-p")]
    pub top_p: Option<f64>,

    /// Maximum tokens per reply
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Seconds to wait for a reply (0 waits forever)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Config file to use instead of ~/.config/rolechat/config.toml
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available personas
    Personas {
        #[command(subcommand)]
        command: Option<PersonasCommand>,
    },
    /// List configured providers
    Providers {
        /// Show details for a specific provider
        provider: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum PersonasCommand {
    /// Show a persona's description and system prompt
    Show {
        /// Persona key
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_options() {
        let args = Args::parse_from([
            "rolechat",
            "--role",
            "pirate",
            "--temperature",
            "0.5",
            "--top-p",
            "0.9",
            "--max-tokens",
            "64",
        ]);
        assert_eq!(args.role.as_deref(), Some("pirate"));
        assert_eq!(args.temperature, Some(0.5));
        assert_eq!(args.top_p, Some(0.9));
        assert_eq!(args.max_tokens, Some(64));
        assert!(args.command.is_none());
    }

    #[test]
    fn test_parse_personas_show() {
        let args = Args::parse_from(["rolechat", "personas", "show", "tutor"]);
        assert!(matches!(
            args.command,
            Some(Command::Personas {
                command: Some(PersonasCommand::Show { ref name })
            }) if name == "tutor"
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from(["rolechat", "providers", "--verbose"]);
        assert!(args.verbose);
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
