//! Catalog search command.

use anyhow::{bail, Result};
use shopfront_commerce::prelude::*;

use super::SearchArgs;
use crate::context::Context;
use crate::output::Output;

/// Run the search command.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let api = ctx.catalog_api();
    let catalog_config = &ctx.config.catalog;
    let mut catalog = CatalogController::with_defaults(
        args.tab.unwrap_or(catalog_config.default_tab),
        args.limit.unwrap_or(catalog_config.page_size),
    )
    .with_debounce(catalog_config.debounce());

    let mut change = FilterChange::default();
    if let Some(query) = args.query {
        change = change.with_search(query);
    }
    if let Some(category) = args.category {
        change = change.with_category(Some(category));
    }
    let ticket = catalog.set_filter(change);
    if fetch(ctx, &api, &mut catalog, ticket).await == ApplyOutcome::Failed {
        bail!(
            "Search failed: {}",
            catalog.last_error().unwrap_or("unknown error")
        );
    }

    let wanted = if args.all { u32::MAX } else { args.pages.max(1) };
    let mut loaded = 1;
    while loaded < wanted {
        let Some(ticket) = catalog.load_more() else {
            break;
        };
        if fetch(ctx, &api, &mut catalog, ticket).await == ApplyOutcome::Failed {
            ctx.output.warn(&format!(
                "Stopped after {} page(s): {}",
                loaded,
                catalog.last_error().unwrap_or("unknown error")
            ));
            break;
        }
        loaded += 1;
    }

    render_results(&ctx.output, &catalog);
    Ok(())
}

/// Run one ticket behind a spinner.
pub async fn fetch<A: CatalogApi>(
    ctx: &Context,
    api: &A,
    catalog: &mut CatalogController,
    ticket: FetchTicket,
) -> ApplyOutcome {
    let query = ticket.query();
    ctx.output.debug(&format!(
        "GET search tab={} offset={} limit={}",
        query.tab, query.offset, query.limit
    ));
    let message = match ticket.mode() {
        FetchMode::Replace => "Searching catalog...".to_string(),
        FetchMode::Append => format!("Loading more from {}...", query.offset),
    };
    let spinner = ctx.output.spinner(&message);
    let outcome = catalog.execute(api, ticket).await;
    spinner.finish_and_clear();
    outcome
}

/// Print the current result list and pagination summary.
pub fn render_results(output: &Output, catalog: &CatalogController) {
    if output.is_json() {
        output.json(&serde_json::json!({
            "state": catalog.state(),
            "pagination": catalog.pagination(),
            "has_more": catalog.has_more(),
        }));
        return;
    }

    let state = catalog.state();
    let mut title = format!("{} ({})", state.tab.display_name(), state.tab);
    if let Some(term) = &state.search_term {
        title.push_str(&format!(" \"{}\"", term));
    }
    if let Some(category) = &state.category {
        title.push_str(&format!(" in {}", category));
    }
    output.header(&title);

    if catalog.results().is_empty() {
        output.info("No products found.");
        return;
    }

    let name_width = output.term_width().saturating_sub(48).clamp(20, 60);
    let widths = [4, 12, name_width, 18, 16];
    output.table_row(&["#", "ID", "NAME", "PRICE", "CATEGORY"], &widths);
    for (i, product) in catalog.results().iter().enumerate() {
        output.table_row(
            &[
                &(i + 1).to_string(),
                product.id.as_str(),
                &product.name,
                &format_price(product),
                product.category.as_deref().unwrap_or("-"),
            ],
            &widths,
        );
    }

    let pagination = catalog.pagination();
    output.info(&format!(
        "Showing {}-{} of {} (page {} of {})",
        pagination.start_item(),
        pagination.end_item(),
        pagination.total,
        pagination.pages_loaded(),
        pagination.total_pages()
    ));
    if catalog.has_more() {
        output.info("More results available (use --pages or --all).");
    }
}

/// Product price for display; products without a price are quoted on request.
pub fn format_price(product: &Product) -> String {
    match product.price {
        Some(price) => Money::from_decimal(price, Currency::RUB).display(),
        None => "on request".to_string(),
    }
}
