//! Product detail command.

use anyhow::{anyhow, Context as _, Result};
use shopfront_commerce::prelude::*;

use super::search::format_price;
use super::ProductArgs;
use crate::context::Context;

/// Run the product command.
pub async fn run(args: ProductArgs, ctx: &Context) -> Result<()> {
    let product = lookup(ctx, &args.id).await?;

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("id", product.id.as_str());
    ctx.output.kv("slug", product.route_key());
    ctx.output.kv("price", &format_price(&product));
    if let Some(category) = &product.category {
        ctx.output.kv("category", category);
    }
    if let Some(manufacturer) = &product.manufacturer {
        ctx.output.kv("manufacturer", manufacturer);
    }
    if let Some(image) = product.image(ctx.asset_base_url()) {
        ctx.output.kv("image", &image);
    }
    if let Some(description) = &product.description {
        ctx.output.info("");
        ctx.output.info(description.trim());
    }

    match &product.specs {
        Some(serde_json::Value::Object(specs)) if !specs.is_empty() => {
            ctx.output.header("Specifications");
            for (key, value) in specs {
                let value = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                ctx.output.kv(key, &value);
            }
        }
        Some(serde_json::Value::String(text)) if !text.trim().is_empty() => {
            ctx.output.header("Specifications");
            for line in text.lines().filter(|l| !l.trim().is_empty()) {
                ctx.output.list_item(line.trim());
            }
        }
        _ => {}
    }

    Ok(())
}

/// Fetch a product by id or slug, failing if it does not exist.
pub async fn lookup(ctx: &Context, id_or_slug: &str) -> Result<Product> {
    let api = ctx.catalog_api();
    let spinner = ctx.output.spinner(&format!("Looking up {}...", id_or_slug));
    let product = api.product(id_or_slug).await;
    spinner.finish_and_clear();

    product
        .with_context(|| format!("Failed to look up product {}", id_or_slug))?
        .ok_or_else(|| anyhow!("Product not found: {}", id_or_slug))
}
