//! Cart totals and price formatting

use crate::cart::item::CartItem;
use crate::config::schema::DisplayConfig;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Totals shown on the floating cart badge
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CartSummary {
    /// Number of lines
    pub lines: usize,

    /// Sum of quantities
    pub item_count: u64,

    /// Sum of price times quantity
    pub subtotal: Decimal,
}

/// Compute totals for `items`
pub fn summarize(items: &[CartItem]) -> CartSummary {
    CartSummary {
        lines: items.len(),
        item_count: items.iter().map(|item| u64::from(item.quantity)).sum(),
        subtotal: items.iter().map(CartItem::line_total).sum(),
    }
}

/// Format an amount as `<symbol> <units><sep><cents>`, e.g. `R$ 50,00`
pub fn format_value(amount: Decimal, display: &DisplayConfig) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.2}", rounded);
    let localized = match fixed.split_once('.') {
        Some((units, cents)) => format!("{}{}{}", units, display.decimal_separator, cents),
        None => fixed,
    };

    if display.currency_symbol.is_empty() {
        localized
    } else {
        format!("{} {}", display.currency_symbol, localized)
    }
}
