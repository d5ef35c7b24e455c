//! Bookweb main entry point

use anyhow::Context;
use bookweb_api::start_server;
use bookweb_config::{Config, ConfigError};
use bookweb_core::{ApiClient, Session};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bookweb")]
#[command(author = "Bookweb Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight HTMX back office for a bookstore REST API", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print a commented default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn init_logging(level: &str) {
    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (config, missing) = match Config::load_async(&args.config).await {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound { .. }) => (Config::default(), true),
        Err(e) => {
            // the logger needs the config, so report straight to stderr
            eprintln!("{}", e.to_details());
            return Err(e).with_context(|| format!("Failed to load {}", args.config.display()));
        }
    };

    init_logging(&config.logging.level);
    if missing {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    } else {
        log::info!("Config loaded from {}", args.config.display());
    }

    let session = Session::from_file(&config.session.token_file);
    if session.is_authenticated() {
        log::info!("Restored session from {}", config.session.token_file.display());
    }

    let client = ApiClient::new(&config.api, session).context("Failed to build API client")?;

    start_server(config, client).await
}
