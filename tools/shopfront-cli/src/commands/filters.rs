//! Category filter listing.

use anyhow::{Context as _, Result};
use shopfront_commerce::prelude::*;

use crate::context::Context;

/// Run the filters command.
pub async fn run(ctx: &Context) -> Result<()> {
    let api = ctx.catalog_api();
    let spinner = ctx.output.spinner("Loading categories...");
    let groups = api.filters().await;
    spinner.finish_and_clear();
    let groups = groups.context("Failed to load catalog filters")?;

    if ctx.output.is_json() {
        ctx.output.json(&groups);
        return Ok(());
    }

    if groups.is_empty() {
        ctx.output.info("The catalog has no categories.");
        return Ok(());
    }

    for group in &groups.groups {
        ctx.output.header(&group.group);
        for category in &group.categories {
            ctx.output.list_item(&format!("{}  ({})", category.name, category.slug));
        }
    }
    ctx.output.info("");
    ctx.output
        .info("Filter a search with `shopfront search --category <slug>`.");

    Ok(())
}
