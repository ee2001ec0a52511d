//! Interactive catalog browser.
//!
//! Each entered line is a search; lines starting with `:` are commands.

use std::time::Instant;

use anyhow::{bail, Result};
use dialoguer::Input;
use shopfront_commerce::prelude::*;

use super::search::{fetch, render_results};
use super::BrowseArgs;
use crate::context::Context;

/// One line of browser input.
#[derive(Debug, PartialEq)]
enum Action {
    Search(String),
    More,
    Tab(CatalogTab),
    Category(Option<String>),
    PageSize(PageSize),
    Add(usize),
    Reset,
    Help,
    Quit,
}

fn parse_action(line: &str) -> Result<Action, String> {
    let line = line.trim();
    let Some(command) = line.strip_prefix(':') else {
        return Ok(Action::Search(line.to_string()));
    };
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or("");
    let arg = parts.next();

    match (name, arg) {
        ("more" | "m", None) => Ok(Action::More),
        ("tab", Some(tab)) => tab.parse().map(Action::Tab).map_err(|e: CommerceError| e.to_string()),
        ("cat", Some("-")) | ("cat", None) => Ok(Action::Category(None)),
        ("cat", Some(slug)) => Ok(Action::Category(Some(slug.to_string()))),
        ("size", Some(size)) => size
            .parse::<u32>()
            .map_err(|_| format!("not a number: {}", size))
            .and_then(|n| PageSize::try_from(n).map_err(|e| e.to_string()))
            .map(Action::PageSize),
        ("add", Some(n)) => n
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(Action::Add)
            .ok_or_else(|| format!("not a result number: {}", n)),
        ("reset", None) => Ok(Action::Reset),
        ("help" | "h", None) => Ok(Action::Help),
        ("quit" | "q", None) => Ok(Action::Quit),
        _ => Err(format!("unknown command: {}", line)),
    }
}

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    if !ctx.output.is_interactive() {
        bail!("browse needs an interactive terminal; use `shopfront search` instead");
    }

    let api = ctx.catalog_api();
    let mut cart = ctx.cart()?;
    let mut catalog = ctx.catalog_controller();

    let ticket = match args.tab {
        Some(tab) => catalog.set_filter(FilterChange::tab(tab)),
        None => catalog.reset(),
    };
    fetch(ctx, &api, &mut catalog, ticket).await;
    show(ctx, &catalog);
    print_help(ctx);

    loop {
        let line: String = Input::new()
            .with_prompt(catalog.state().tab.display_name())
            .with_initial_text(catalog.raw_term())
            .allow_empty(true)
            .interact_text()?;

        let action = match parse_action(&line) {
            Ok(action) => action,
            Err(e) => {
                ctx.output.warn(&e);
                continue;
            }
        };

        let ticket = match action {
            Action::Search(term) => {
                catalog.type_search(term, Instant::now());
                Some(catalog.submit_search())
            }
            Action::More => {
                let ticket = catalog.load_more();
                if ticket.is_none() {
                    ctx.output.info("No more results.");
                }
                ticket
            }
            Action::Tab(tab) => Some(catalog.set_filter(FilterChange::tab(tab))),
            Action::Category(slug) => Some(catalog.set_filter(FilterChange::category(slug))),
            Action::PageSize(size) => Some(catalog.set_page_size(size)),
            Action::Reset => Some(catalog.reset()),
            Action::Add(n) => {
                match catalog.results().get(n - 1) {
                    Some(product) => {
                        cart.add_item(CartItemDraft::from_product(
                            product,
                            Currency::RUB,
                            ctx.asset_base_url(),
                        ));
                        ctx.output.success(&format!(
                            "Added {} ({} items, {})",
                            product.name,
                            cart.item_count(),
                            cart.total_amount().display()
                        ));
                    }
                    None => ctx.output.warn(&format!("No result #{}", n)),
                }
                None
            }
            Action::Help => {
                print_help(ctx);
                None
            }
            Action::Quit => return Ok(()),
        };

        if let Some(ticket) = ticket {
            if fetch(ctx, &api, &mut catalog, ticket).await == ApplyOutcome::Failed {
                ctx.output.warn(&format!(
                    "Request failed, showing previous results: {}",
                    catalog.last_error().unwrap_or("unknown error")
                ));
            }
            show(ctx, &catalog);
        }
    }
}

fn show(ctx: &Context, catalog: &CatalogController) {
    render_results(&ctx.output, catalog);
}

fn print_help(ctx: &Context) {
    ctx.output.header("Commands");
    for line in [
        "<text>        search (empty clears the search)",
        ":more         load the next page",
        ":tab <name>   switch to machines or spares",
        ":cat <slug>   filter by category (:cat - clears)",
        ":size <n>     page size 20, 40 or 60",
        ":add <n>      add result #n to the cart",
        ":reset        back to defaults",
        ":quit",
    ] {
        ctx.output.list_item(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_search() {
        assert_eq!(
            parse_action("  токарный "),
            Ok(Action::Search("токарный".to_string()))
        );
        assert_eq!(parse_action(""), Ok(Action::Search(String::new())));
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse_action(":more"), Ok(Action::More));
        assert_eq!(parse_action(":tab spares"), Ok(Action::Tab(CatalogTab::Spares)));
        assert_eq!(
            parse_action(":cat lathes"),
            Ok(Action::Category(Some("lathes".to_string())))
        );
        assert_eq!(parse_action(":cat -"), Ok(Action::Category(None)));
        assert_eq!(parse_action(":size 60"), Ok(Action::PageSize(PageSize::Sixty)));
        assert_eq!(parse_action(":add 3"), Ok(Action::Add(3)));
        assert_eq!(parse_action(":q"), Ok(Action::Quit));
    }

    #[test]
    fn test_bad_commands() {
        assert!(parse_action(":tab tools").is_err());
        assert!(parse_action(":size 25").is_err());
        assert!(parse_action(":add 0").is_err());
        assert!(parse_action(":jump").is_err());
    }
}
