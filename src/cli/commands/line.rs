//! Increment/decrement commands - adjust a cart line

use crate::cart::{CartHandle, CartItem};
use crate::cli::args::LineArgs;
use crate::config::Config;
use crate::error::MarketResult;
use crate::ui::{self, UiContext};

/// Execute the increment command
pub async fn increment(args: LineArgs, _config: &Config, cart: &CartHandle) -> MarketResult<()> {
    let ctx = UiContext::detect();
    warn_if_missing(&ctx, &cart.items()?, &args.id);

    cart.increment(&args.id).await?;
    cart.flush().await?;

    report(&ctx, &cart.items()?, &args.id);
    Ok(())
}

/// Execute the decrement command
pub async fn decrement(args: LineArgs, _config: &Config, cart: &CartHandle) -> MarketResult<()> {
    let ctx = UiContext::detect();
    let present = warn_if_missing(&ctx, &cart.items()?, &args.id);

    cart.decrement(&args.id).await?;
    cart.flush().await?;

    let items = cart.items()?;
    if present && !items.iter().any(|item| item.id == args.id) {
        ui::step_ok(&ctx, &format!("Removed {} from cart", args.id));
    } else {
        report(&ctx, &items, &args.id);
    }
    Ok(())
}

/// Returns whether `id` has a line; unknown IDs are a no-op, not an error
fn warn_if_missing(ctx: &UiContext, items: &[CartItem], id: &str) -> bool {
    let present = items.iter().any(|item| item.id == id);
    if !present {
        ui::step_warn_hint(ctx, &format!("No cart line for {}", id), "Run: gomarket cart");
    }
    present
}

fn report(ctx: &UiContext, items: &[CartItem], id: &str) {
    for item in items.iter().filter(|item| item.id == id) {
        ui::step_ok(ctx, &format!("{} x{}", item.title, item.quantity));
    }
}
