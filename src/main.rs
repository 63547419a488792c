//! gomarket - marketplace storefront and cart
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use gomarket::audit::AuditLog;
use gomarket::cart::{CartOptions, CartProvider};
use gomarket::cli::{commands, Cli, Commands};
use gomarket::config::{Config, ConfigManager, StatePaths};
use gomarket::error::{MarketError, MarketResult};
use gomarket::store::{FileStore, KeyValueStore};
use gomarket::ui;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> MarketResult<()> {
    let cli = Cli::parse();

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = manager.load().await?;

    init_logging(cli.verbose, &config.general.log_format);
    ui::init_theme();
    debug!("Using config {}", manager.path().display());

    let paths = match cli.state_dir {
        Some(ref root) => StatePaths::new(root.clone(), &config),
        None => StatePaths::from_config(&config),
    };

    match cli.command {
        Commands::Catalog(args) => commands::catalog(args, &config).await,
        Commands::Config(args) => commands::config(args, &config, &manager).await,
        command => with_cart(command, &config, &paths).await,
    }
}

/// Logging: 0 = warn, 1 = info, 2+ = debug; always on stderr
fn init_logging(verbose: u8, log_format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("gomarket=warn"),
        1 => EnvFilter::new("gomarket=info"),
        _ => EnvFilter::new("gomarket=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}

/// Mount the cart for the duration of one command
async fn with_cart(command: Commands, config: &Config, paths: &StatePaths) -> MarketResult<()> {
    paths.ensure().await?;

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(paths.store_dir()).await?);
    let options =
        CartOptions::from_config(config).with_audit(AuditLog::new(config, paths.audit_log()));
    let provider = CartProvider::mount(store, options).await?;
    let cart = provider.handle();

    let result = match command {
        Commands::Add(args) => commands::add(args, config, &cart).await,
        Commands::Increment(args) => commands::increment(args, config, &cart).await,
        Commands::Decrement(args) => commands::decrement(args, config, &cart).await,
        Commands::Cart(args) => commands::cart(args, config, &cart).await,
        Commands::Catalog(_) | Commands::Config(_) => Err(MarketError::Internal(
            "command does not use the cart".to_string(),
        )),
    };

    provider.shutdown().await;
    result
}
