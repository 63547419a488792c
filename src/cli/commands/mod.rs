//! CLI command implementations

pub mod add;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod line;

pub use add::execute as add;
pub use cart::execute as cart;
pub use catalog::execute as catalog;
pub use config::execute as config;
pub use line::{decrement, increment};
