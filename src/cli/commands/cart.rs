//! Cart command - show cart lines and totals

use crate::cart::{format_value, CartHandle, CartItem, CartSummary};
use crate::cli::args::{CartArgs, OutputFormat};
use crate::config::Config;
use crate::error::MarketResult;
use crate::ui::{self, UiContext};
use console::style;

/// Execute the cart command
pub async fn execute(args: CartArgs, config: &Config, cart: &CartHandle) -> MarketResult<()> {
    let items = cart.items()?;
    let summary = cart.summary()?;

    match args.format {
        OutputFormat::Table => print_table(&items, &summary, config),
        OutputFormat::Json => {
            let json = serde_json::json!({ "items": items, "summary": summary });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Plain => {
            for item in &items {
                println!("{}\t{}", item.id, item.quantity);
            }
        }
    }

    Ok(())
}

fn print_table(items: &[CartItem], summary: &CartSummary, config: &Config) {
    let ctx = UiContext::detect();

    if items.is_empty() {
        ui::step_info(&ctx, "Cart is empty");
        ui::remark(&ctx, "Add products with: gomarket add <product-id>");
        return;
    }

    ui::intro(&ctx, "Cart");

    println!(
        "{:<12} {:<32} {:>5} {:>14} {:>14}",
        style("ID").bold(),
        style("TITLE").bold(),
        style("QTY").bold(),
        style("PRICE").bold(),
        style("TOTAL").bold()
    );
    println!("{}", "-".repeat(81));

    for item in items {
        println!(
            "{:<12} {:<32} {:>5} {:>14} {:>14}",
            item.id,
            item.title,
            item.quantity,
            format_value(item.price, &config.display),
            format_value(item.line_total(), &config.display)
        );
    }

    println!();
    ui::key_value(&ctx, "Items", &summary.item_count.to_string());
    ui::key_value(&ctx, "Total", &format_value(summary.subtotal, &config.display));
}
