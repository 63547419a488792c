//! Catalog command - list products

use crate::cart::{format_value, Product};
use crate::catalog::CatalogClient;
use crate::cli::args::{CatalogArgs, OutputFormat};
use crate::config::Config;
use crate::error::MarketResult;
use crate::ui::{self, TaskSpinner, UiContext};
use console::style;

/// Execute the catalog command
pub async fn execute(args: CatalogArgs, config: &Config) -> MarketResult<()> {
    let client = CatalogClient::new(&config.catalog);

    let products = match args.format {
        OutputFormat::Table => {
            let ctx = UiContext::detect();
            let mut spinner = TaskSpinner::new(&ctx);
            spinner.start("Fetching products...");
            match client.fetch_products().await {
                Ok(products) => {
                    spinner.stop(&format!("{} product(s)", products.len()));
                    products
                }
                Err(e) => {
                    spinner.stop_error("Could not load the catalog");
                    return Err(e);
                }
            }
        }
        OutputFormat::Json | OutputFormat::Plain => client.fetch_products().await?,
    };

    match args.format {
        OutputFormat::Table => print_table(&products, config),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&products)?),
        OutputFormat::Plain => {
            for product in &products {
                println!("{}\t{}", product.id, product.title);
            }
        }
    }

    Ok(())
}

fn print_table(products: &[Product], config: &Config) {
    if products.is_empty() {
        let ctx = UiContext::detect();
        ui::step_info(&ctx, "The catalog is empty");
        return;
    }

    println!(
        "{:<12} {:<40} {:>14}",
        style("ID").bold(),
        style("TITLE").bold(),
        style("PRICE").bold()
    );
    println!("{}", "-".repeat(68));

    for product in products {
        println!(
            "{:<12} {:<40} {:>14}",
            product.id,
            product.title,
            format_value(product.price, &config.display)
        );
    }
}
