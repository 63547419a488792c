//! Pure cart transforms and the stored blob format
//!
//! Each operation maps the current line list to a new one and never touches
//! storage; the provider applies the result and persists it.

use crate::cart::item::{CartItem, Product};
use crate::error::{MarketError, MarketResult};

/// Append `product` as a new line with quantity 1.
///
/// Lines with the same ID are not merged: adding a product twice yields two
/// lines.
pub fn add(items: &[CartItem], product: Product) -> Vec<CartItem> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend_from_slice(items);
    next.push(CartItem::from_product(product));
    next
}

/// Bump the quantity of every line matching `id`
pub fn increment(items: &[CartItem], id: &str) -> Vec<CartItem> {
    items
        .iter()
        .map(|item| {
            if item.id == id {
                CartItem {
                    quantity: item.quantity.saturating_add(1),
                    ..item.clone()
                }
            } else {
                item.clone()
            }
        })
        .collect()
}

/// Lower the quantity of every line matching `id`, dropping lines at 1
pub fn decrement(items: &[CartItem], id: &str) -> Vec<CartItem> {
    items
        .iter()
        .filter_map(|item| {
            if item.id != id {
                return Some(item.clone());
            }
            if item.quantity <= 1 {
                return None;
            }
            Some(CartItem {
                quantity: item.quantity - 1,
                ..item.clone()
            })
        })
        .collect()
}

/// Serialize lines into the stored blob (a bare JSON array)
pub fn encode(items: &[CartItem]) -> MarketResult<String> {
    Ok(serde_json::to_string(items)?)
}

/// Rebuild lines from the value stored under `key`.
///
/// A missing or empty value is an empty cart. Anything else must parse as a
/// JSON array of lines; a parse failure is returned as `CartCorrupt`.
pub fn decode(key: &str, stored: Option<&str>) -> MarketResult<Vec<CartItem>> {
    match stored {
        None => Ok(Vec::new()),
        Some(blob) if blob.is_empty() => Ok(Vec::new()),
        Some(blob) => serde_json::from_str(blob).map_err(|source| MarketError::CartCorrupt {
            key: key.to_string(),
            source,
        }),
    }
}
