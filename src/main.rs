use anyhow::Result;
use clap::Parser;

use rolechat::cli::commands::{chat, personas, providers};
use rolechat::cli::{Args, Command, PersonasCommand};
use rolechat::config::ResolveOptions;
use rolechat::{logging, output};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init(args.verbose);
    output::init(output::OutputConfig::detect());

    let config = args.config.as_deref();

    match args.command {
        Some(Command::Personas { command: None }) => {
            personas::list_personas(config)?;
        }
        Some(Command::Personas {
            command: Some(PersonasCommand::Show { ref name }),
        }) => {
            personas::show_persona(config, name)?;
        }
        Some(Command::Providers { ref provider }) => {
            providers::print_providers(config, provider.as_deref())?;
        }
        None => {
            let options = chat::ChatOptions {
                config: args.config.clone(),
                resolve: ResolveOptions {
                    provider: args.provider,
                    model: args.model,
                    role: args.role,
                    temperature: args.temperature,
                    top_p: args.top_p,
                    max_tokens: args.max_tokens,
                    timeout_secs: args.timeout,
                },
            };
            chat::run_chat(options).await?;
        }
    }

    Ok(())
}
