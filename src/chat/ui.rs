//! Chat mode UI components.

use super::command::{COMMANDS, EXIT_TOKEN};
use super::interpreter::{Outcome, StatusReport};
use super::repl::SessionInfo;
use crate::ui::Style;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header(info: &SessionInfo) {
    println!(
        "{} {} - Multi-role chatbot",
        Style::header("rolechat"),
        Style::version(format!("v{VERSION}"))
    );
    println!(
        "{} {} {}",
        Style::secondary("Using"),
        Style::value(&info.model),
        Style::secondary(format!("via {} ({})", info.provider_name, info.endpoint))
    );
    println!(
        "{}",
        Style::secondary(format!(
            "Type /help for commands, '{EXIT_TOKEN}' to exit."
        ))
    );
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}

pub fn print_status(report: &StatusReport) {
    println!("{}", Style::header("Status"));
    println!("  {}         {}", Style::label("role"), Style::value(&report.role));
    println!(
        "  {}  {}",
        Style::label("temperature"),
        Style::value(format!("{:?}", report.temperature))
    );
    println!(
        "  {}        {}",
        Style::label("top_p"),
        Style::value(format!("{:?}", report.top_p))
    );
    println!(
        "  {}   {}",
        Style::label("max_tokens"),
        Style::value(report.max_tokens)
    );
    println!();
}

pub fn print_help() {
    println!("{}", Style::header("Available commands"));
    for entry in COMMANDS {
        println!(
            "  {}  {}",
            Style::command(format!("{:32}", entry.usage)),
            Style::secondary(entry.description)
        );
    }
    println!(
        "  {}  {}",
        Style::command(format!("{EXIT_TOKEN:32}")),
        Style::secondary("Exit")
    );
    println!();
}

pub fn print_reply(persona: &str, reply: &str) {
    println!("{} {reply}", Style::speaker(format!("{persona}:")));
    println!();
}

/// Prints the confirmation for a handled command.
pub fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Reply(_) | Outcome::Help | Outcome::Status(_) => {}
        Outcome::RoleSwitched(key) => println!(
            "{} Switched role to {} and reset conversation",
            Style::success("✓"),
            Style::value(key)
        ),
        Outcome::TemperatureSet(value) => print_set("temperature", format!("{value:?}")),
        Outcome::TopPSet(value) => print_set("top_p", format!("{value:?}")),
        Outcome::MaxTokensSet(value) => print_set("max_tokens", value),
        Outcome::Reset => println!("{} Conversation reset", Style::success("✓")),
    }
}

fn print_set(name: &str, value: impl std::fmt::Display) {
    println!(
        "{} {name} set to {}",
        Style::success("✓"),
        Style::value(value)
    );
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
    eprintln!();
}
