//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// gomarket - marketplace storefront and cart
///
/// Browse the product catalog and manage a shopping cart kept on this
/// device.
#[derive(Parser, Debug)]
#[command(name = "gomarket")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "GOMARKET_CONFIG")]
    pub config: Option<PathBuf>,

    /// State directory holding the cart store and audit log
    #[arg(long, global = true, env = "GOMARKET_STATE_DIR")]
    pub state_dir: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List products from the catalog
    Catalog(CatalogArgs),

    /// Add a catalog product to the cart
    Add(AddArgs),

    /// Increase the quantity of a cart line
    Increment(LineArgs),

    /// Decrease the quantity of a cart line (removes it at zero)
    Decrement(LineArgs),

    /// Show the cart
    Cart(CartArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for the catalog command
#[derive(Parser, Debug)]
pub struct CatalogArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the add command
#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Catalog product ID
    pub product_id: String,
}

/// Arguments for increment/decrement
#[derive(Parser, Debug)]
pub struct LineArgs {
    /// Product ID of the cart line
    pub id: String,
}

/// Arguments for the cart command
#[derive(Parser, Debug)]
pub struct CartArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., catalog.base_url)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for listings
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
