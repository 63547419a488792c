//! Error types for gomarket
//!
//! All modules use `MarketResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gomarket operations
pub type MarketResult<T> = Result<T, MarketError>;

/// All errors that can occur in gomarket
#[derive(Error, Debug)]
pub enum MarketError {
    // Provisioning errors
    #[error("use_cart must be used within a CartProvider")]
    CartNotProvisioned,

    // Cart errors
    #[error("Stored cart at key {key} is corrupt: {source}")]
    CartCorrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    // Store errors
    #[error("Store error: {context}")]
    Store {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    // Catalog errors
    #[error("Catalog request to {url} failed: {reason}")]
    CatalogRequest { url: String, reason: String },

    #[error("Catalog returned HTTP {status} for {url}")]
    CatalogStatus { url: String, status: u16 },

    #[error("Catalog response from {url} is not a product list: {source}")]
    CatalogDecode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Product not found in catalog: {0}")]
    ProductNotFound(String),

    #[error("Product {id} has a negative price: {price}")]
    InvalidPrice { id: String, price: rust_decimal::Decimal },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl MarketError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a store error with context
    pub fn store(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Store {
            context: context.into(),
            source,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CatalogRequest { .. } | Self::StoreUnavailable(_) | Self::Store { .. }
        ) || matches!(self, Self::CatalogStatus { status, .. } if *status >= 500)
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::CartNotProvisioned => {
                Some("Mount a CartProvider at startup and pass its handle to consumers")
            }
            Self::CartCorrupt { .. } => {
                Some("Inspect or remove the stored cart file under the store directory")
            }
            Self::CatalogRequest { .. } => {
                Some("Check catalog.base_url, e.g.: gomarket config set catalog.base_url <url>")
            }
            Self::ProductNotFound(_) => Some("Run: gomarket catalog"),
            Self::ConfigInvalid { .. } => Some("Run: gomarket config init --force"),
            _ => None,
        }
    }
}
