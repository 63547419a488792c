//! Configuration schema for gomarket
//!
//! Configuration is stored at `~/.config/gomarket/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Store key the cart is persisted under
pub const DEFAULT_CART_KEY: &str = "@GoMarketplace:products";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Persistent store settings
    pub store: StoreConfig,

    /// Product catalog settings
    pub catalog: CatalogConfig,

    /// Price display settings
    pub display: DisplayConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,

    /// Enable audit logging
    pub audit_log: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            audit_log: true,
        }
    }
}

/// How cart snapshots reach the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistMode {
    /// Snapshots go through an ordered background writer
    #[default]
    Queued,
    /// Each mutation awaits its own write
    Immediate,
}

impl std::str::FromStr for PersistMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(Self::Queued),
            "immediate" => Ok(Self::Immediate),
            other => Err(format!(
                "Invalid persist mode: {}. Use queued/immediate",
                other
            )),
        }
    }
}

/// Persistent store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key the cart blob is stored under
    pub key: String,

    /// Store directory (defaults to the state directory)
    pub dir: Option<PathBuf>,

    /// Write strategy
    pub persist_mode: PersistMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_CART_KEY.to_string(),
            dir: None,
            persist_mode: PersistMode::Queued,
        }
    }
}

/// Product catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// API base URL; products are fetched from `<base_url>/products`
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3333".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Price display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Currency symbol placed before amounts
    pub currency_symbol: String,

    /// Decimal separator
    pub decimal_separator: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "R$".to_string(),
            decimal_separator: ",".to_string(),
        }
    }
}
