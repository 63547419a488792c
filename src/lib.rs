//! gomarket - marketplace storefront and shopping cart
//!
//! A product catalog client plus a cart state container that keeps its
//! lines in memory and mirrors every change to device-local storage.

pub mod audit;
pub mod cart;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;
pub mod ui;

pub use cart::{CartHandle, CartItem, CartOptions, CartProvider, Product};
pub use error::{MarketError, MarketResult};
