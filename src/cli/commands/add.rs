//! Add command - put a catalog product in the cart

use crate::cart::{format_value, CartHandle};
use crate::catalog::CatalogClient;
use crate::cli::args::AddArgs;
use crate::config::Config;
use crate::error::MarketResult;
use crate::ui::{self, TaskSpinner, UiContext};

/// Execute the add command
pub async fn execute(args: AddArgs, config: &Config, cart: &CartHandle) -> MarketResult<()> {
    let ctx = UiContext::detect();
    let client = CatalogClient::new(&config.catalog);

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Looking up product...");
    let product = match client.find(&args.product_id).await {
        Ok(product) => {
            spinner.stop(&product.title);
            product
        }
        Err(e) => {
            spinner.stop_error(&format!("Product {} unavailable", args.product_id));
            return Err(e);
        }
    };

    let title = product.title.clone();
    cart.add_to_cart(product).await?;
    cart.flush().await?;

    let summary = cart.summary()?;
    ui::step_ok(&ctx, &format!("Added {} to cart", title));
    ui::key_value(&ctx, "Items", &summary.item_count.to_string());
    ui::key_value(&ctx, "Total", &format_value(summary.subtotal, &config.display));

    Ok(())
}
