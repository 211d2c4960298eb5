use anyhow::Result;
use inquire::Text;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use std::io::{self, IsTerminal, StdinLock};

use super::command::{SlashCommandCompleter, is_exit};
use super::interpreter::{CommandInterpreter, Outcome};
use super::ui;
use crate::engine::ChatEngine;
use crate::error::ChatError;
use crate::input::{InputLine, LineReader};
use crate::ui::{Spinner, Style, is_prompt_cancelled};

/// Where the session is connected, for the banner.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub provider_name: String,
    pub endpoint: String,
    pub model: String,
}

enum LineSource {
    Terminal(RenderConfig<'static>),
    Piped(LineReader<StdinLock<'static>>),
}

impl LineSource {
    fn detect() -> Self {
        if io::stdin().is_terminal() {
            Self::Terminal(render_config())
        } else {
            Self::Piped(LineReader::new(io::stdin().lock()))
        }
    }

    /// `None` means the user asked to leave (Ctrl+C, Esc, end of input).
    fn next_line(&mut self) -> Result<Option<InputLine>> {
        match self {
            Self::Terminal(render_config) => {
                let input = Text::new("")
                    .with_render_config(*render_config)
                    .with_autocomplete(SlashCommandCompleter)
                    .with_help_message("Type a message, /help for commands, quit to exit")
                    .prompt();

                match input {
                    Ok(line) => Ok(Some(InputLine::Text(line))),
                    Err(e) if is_prompt_cancelled(&e) => {
                        println!(); // Clear line before goodbye message
                        Ok(None)
                    }
                    Err(e) => Err(e.into()),
                }
            }
            Self::Piped(reader) => reader.next_line(),
        }
    }
}

fn render_config() -> RenderConfig<'static> {
    let prompt_style = Styled::new("❯")
        .with_fg(Color::LightBlue)
        .with_attr(Attributes::BOLD);
    let mut render_config = RenderConfig::default()
        .with_prompt_prefix(prompt_style)
        .with_answered_prompt_prefix(prompt_style);

    // Non-highlighted suggestions: gray
    render_config.option = StyleSheet::new().with_fg(Color::Grey);
    // Highlighted suggestion: purple
    render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));
    render_config
}

/// The interactive chat loop around a [`CommandInterpreter`].
pub struct ChatRepl<E> {
    info: SessionInfo,
    interpreter: CommandInterpreter<E>,
}

impl<E: ChatEngine> ChatRepl<E> {
    pub const fn new(info: SessionInfo, interpreter: CommandInterpreter<E>) -> Self {
        Self { info, interpreter }
    }

    pub async fn run(&mut self) -> Result<()> {
        ui::print_header(&self.info);
        ui::print_status(&self.interpreter.status());

        let mut source = LineSource::detect();

        while let Some(line) = source.next_line()? {
            let line = match line {
                InputLine::Text(line) => line,
                InputLine::Rejected(e) => {
                    ui::print_error(&e.to_string());
                    continue;
                }
            };
            if is_exit(&line) {
                break;
            }
            self.handle_line(&line).await;
        }

        tracing::debug!(
            turns = self.interpreter.store().turn_count(),
            "chat session ended"
        );
        ui::print_goodbye();
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) {
        let result = {
            let _spinner = is_conversation(line)
                .then(|| Spinner::new(format!("{} is thinking...", self.speaker())));
            self.interpreter.handle(line).await
        };

        match result {
            Ok(Outcome::Reply(reply)) => ui::print_reply(&self.speaker(), &reply),
            Ok(Outcome::Status(report)) => ui::print_status(&report),
            Ok(Outcome::Help) => ui::print_help(),
            Ok(outcome) => ui::print_outcome(&outcome),
            Err(ChatError::EmptyInput) => {}
            Err(e @ ChatError::Inference(_)) => {
                ui::print_error(&e.to_string());
                eprintln!(
                    "{}",
                    Style::secondary("Your message was kept; send another message to continue.")
                );
            }
            Err(e) => ui::print_error(&e.to_string()),
        }
    }

    fn speaker(&self) -> String {
        self.interpreter
            .store()
            .persona()
            .map_or_else(|| "Bot".to_string(), |p| p.key.clone())
    }
}

fn is_conversation(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with('/')
}
