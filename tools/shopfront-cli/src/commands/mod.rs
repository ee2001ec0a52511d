//! CLI command implementations.

pub mod browse;
pub mod cart;
pub mod config;
pub mod filters;
pub mod product;
pub mod search;

use clap::{Args, Subcommand};
use shopfront_commerce::search::{CatalogTab, PageSize};

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Free-text query.
    pub query: Option<String>,

    /// Result set to search (machines or spares).
    #[arg(short, long)]
    pub tab: Option<CatalogTab>,

    /// Category slug to narrow results.
    #[arg(short, long)]
    pub category: Option<String>,

    /// Page size (20, 40 or 60).
    #[arg(short, long, value_parser = parse_page_size)]
    pub limit: Option<PageSize>,

    /// Number of pages to load.
    #[arg(short, long, default_value = "1", conflicts_with = "all")]
    pub pages: u32,

    /// Keep loading until every match is shown.
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    /// Result set to start on.
    #[arg(short, long)]
    pub tab: Option<CatalogTab>,
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product id or slug.
    pub id: String,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart contents.
    Show,
    /// Add a catalog product to the cart.
    Add {
        /// Product id or slug.
        id: String,
        /// Units to add.
        #[arg(short, long, default_value = "1")]
        quantity: i64,
    },
    /// Remove a product from the cart.
    Remove {
        /// Product id.
        id: String,
    },
    /// Set a product's quantity (0 removes it).
    Set {
        /// Product id.
        id: String,
        /// New quantity.
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Print the cart total.
    Total,
    /// Send the cart as an order to the sales team.
    Checkout(CheckoutArgs),
}

/// Contact details for an order; missing required ones are prompted for.
#[derive(Args, Debug, Default)]
pub struct CheckoutArgs {
    /// Contact name.
    #[arg(long)]
    pub name: Option<String>,
    /// Contact phone, at least 10 digits.
    #[arg(long)]
    pub phone: Option<String>,
    /// Contact email.
    #[arg(long)]
    pub email: Option<String>,
    /// Note for the manager.
    #[arg(long)]
    pub comment: Option<String>,
    /// Skip confirmation.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Print the path of the config file in use.
    Path,
}

fn parse_page_size(s: &str) -> Result<PageSize, String> {
    let limit: u32 = s.parse().map_err(|_| format!("not a number: {}", s))?;
    PageSize::try_from(limit).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size("40"), Ok(PageSize::Forty));
        assert!(parse_page_size("30").unwrap_err().contains("20, 40, 60"));
        assert!(parse_page_size("many").is_err());
    }
}
