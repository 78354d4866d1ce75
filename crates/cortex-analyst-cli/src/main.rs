use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod configuration;
mod error;
mod prompt;
mod session;

use configuration::Settings;
use cortex_analyst::backend::snowflake::SnowflakeSql;
use cortex_analyst::orchestrator::Orchestrator;
use cortex_analyst::providers::cortex::CortexAnalyst;
use prompt::rustyline::RustylinePrompt;
use session::Session;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/analyst/config.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive session
    #[command(about = "Start an interactive chat with the analyst")]
    Session {
        /// Semantic model to ask about
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Ask a single question and exit
    #[command(about = "Ask one question and print the answer")]
    Ask {
        /// Semantic model to ask about
        #[arg(short, long)]
        model: Option<String>,

        /// The question
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// List the configured semantic models
    #[command(about = "List the configured semantic models")]
    Models,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    match cli.command {
        Some(Command::Models) => {
            let catalog = settings.catalog.catalog();
            for name in catalog.names() {
                println!(
                    "{} {}",
                    name,
                    style(catalog.resolve(name)?).dim()
                );
            }
        }
        Some(Command::Ask { model, question }) => {
            let mut session = build_session(&settings, model)?;
            session.headless_start(&question.join(" ")).await?;
        }
        Some(Command::Session { model }) => {
            let mut session = build_session(&settings, model)?;
            session.start().await?;
        }
        None => {
            let mut session = build_session(&settings, None)?;
            session.start().await?;
        }
    }
    Ok(())
}

fn build_session(settings: &Settings, model: Option<String>) -> Result<Session<'static>> {
    let catalog = settings.catalog.catalog();
    let model = model.unwrap_or_else(|| settings.catalog.default_model.clone());
    catalog.resolve(&model)?;

    let assistant = CortexAnalyst::new(settings.analyst_config()?)?;
    let backend = SnowflakeSql::new(settings.sql_config()?)?;
    let orchestrator = Orchestrator::new(Box::new(assistant), Box::new(backend));

    Ok(Session::new(
        orchestrator,
        Box::new(RustylinePrompt::new()),
        catalog,
        model,
    ))
}
