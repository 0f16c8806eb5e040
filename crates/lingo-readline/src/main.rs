mod app;
mod command;
mod helper;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use lingo_application::translation::{BackendTranslator, OfflineTranslator, TranslationProvider};
use lingo_core::config::LingoConfig;
use lingo_infrastructure::ConfigStorage;
use lingo_interaction::ApiGateway;

use crate::app::{App, Flow};
use crate::command::{Command, parse};
use crate::helper::CliHelper;

/// Scene-based conversation practice in the terminal.
#[derive(Parser, Debug)]
#[command(name = "lingo", version, about)]
struct Args {
    /// Config file (defaults to ~/.config/lingo/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for replies and scores, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Backend command endpoint.
    #[arg(long)]
    endpoint: Option<String>,

    /// Translate through the backend instead of the offline phrasebook.
    #[arg(long)]
    backend_translate: bool,

    /// Scene to enter on startup.
    #[arg(long)]
    scene: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn load_config(args: &Args) -> Result<LingoConfig> {
    let storage = match &args.config {
        Some(path) => ConfigStorage::new(path.clone()),
        None => ConfigStorage::default_location()?,
    };
    let mut config = storage.load()?;
    tracing::debug!("[Main] Loaded config from {}", storage.path().display());

    if let Some(seed) = args.seed {
        config.reply_seed = Some(seed);
    }
    if let Some(endpoint) = &args.endpoint {
        config.api.endpoint = endpoint.clone();
    }
    Ok(config)
}

fn translator(args: &Args, config: &LingoConfig) -> Arc<dyn TranslationProvider> {
    if args.backend_translate {
        let gateway = ApiGateway::from_config(&config.api);
        tracing::info!("[Main] Translating through {}", gateway.endpoint());
        Arc::new(BackendTranslator::new(Arc::new(gateway)))
    } else {
        Arc::new(OfflineTranslator::new(config.timing.translation_delay()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = load_config(&args)?;
    let translator = translator(&args, &config);
    let mut app = App::new(config, translator);

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper));

    println!("{}", "=== Lingo ===".bright_magenta().bold());
    println!(
        "{}",
        "Type '/scenes' to browse scenes, '/help' for all commands, or 'quit' to exit."
            .bright_black()
    );
    println!();

    if let Some(scene) = &args.scene {
        app.handle(Command::EnterScene(scene.clone())).await;
    }

    loop {
        match rl.readline(&app.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                if let Flow::Quit = app.handle(parse(trimmed)).await {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "Use 'quit' or Ctrl-D to exit.".bright_black());
            }
            Err(ReadlineError::Eof) => {
                app.handle(Command::Quit).await;
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {e:?}").red());
                break;
            }
        }
    }

    Ok(())
}
