//! Shopping cart state

pub mod item;
pub mod ops;
pub mod persist;
pub mod provider;
pub mod summary;

pub use item::{CartItem, Product};
pub use persist::{CartEvent, PersistCallback, PersistOutcome};
pub use provider::{CartHandle, CartOptions, CartProvider};
pub use summary::{format_value, summarize, CartSummary};
