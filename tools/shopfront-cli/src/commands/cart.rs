//! Cart commands.

use anyhow::{bail, Result};
use chrono::Local;
use dialoguer::{Confirm, Input};
use shopfront_commerce::cart::CacheCartStorage;
use shopfront_commerce::prelude::*;

use super::product::lookup;
use super::{CartArgs, CartCommand, CheckoutArgs};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.cart()?;

    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => show_cart(&cart, ctx),
        CartCommand::Add { id, quantity } => add_item(&mut cart, &id, quantity, ctx).await,
        CartCommand::Remove { id } => {
            let id = ProductId::new(id);
            if cart.get(&id).is_none() {
                ctx.output.warn(&format!("{} is not in the cart", id));
                return Ok(());
            }
            cart.remove_item(&id);
            ctx.output.success(&format!("Removed {}", id));
            print_summary(&cart, ctx);
            Ok(())
        }
        CartCommand::Set { id, quantity } => {
            let id = ProductId::new(id);
            if cart.get(&id).is_none() {
                bail!("{} is not in the cart; add it first", id);
            }
            cart.update_quantity(&id, quantity);
            if quantity <= 0 {
                ctx.output.success(&format!("Removed {}", id));
            } else {
                ctx.output.success(&format!("Set {} to {}", id, quantity));
            }
            print_summary(&cart, ctx);
            Ok(())
        }
        CartCommand::Clear { yes } => clear_cart(&mut cart, yes, ctx),
        CartCommand::Total => {
            print_summary(&cart, ctx);
            Ok(())
        }
        CartCommand::Checkout(args) => checkout(&mut cart, args, ctx).await,
    }
}

async fn add_item(
    cart: &mut CartStore<CacheCartStorage>,
    id_or_slug: &str,
    quantity: i64,
    ctx: &Context,
) -> Result<()> {
    if quantity < 1 {
        bail!("Quantity must be at least 1");
    }
    let product = lookup(ctx, id_or_slug).await?;
    if product.price.is_none() {
        ctx.output
            .warn("This product has no listed price; it counts as zero in the total.");
    }

    cart.add_item(CartItemDraft::from_product(
        &product,
        Currency::RUB,
        ctx.asset_base_url(),
    ));
    if quantity > 1 {
        let current = cart.get(&product.id).map_or(1, |item| item.quantity);
        cart.update_quantity(&product.id, quantity_after_add(current, quantity));
    }

    ctx.output.success(&format!("Added {} x {}", quantity, product.name));
    print_summary(cart, ctx);
    Ok(())
}

/// Quantity of a line that already received one unit of `requested`.
fn quantity_after_add(current: i64, requested: i64) -> i64 {
    current.saturating_add(requested - 1)
}

fn clear_cart(cart: &mut CartStore<CacheCartStorage>, yes: bool, ctx: &Context) -> Result<()> {
    if cart.is_empty() {
        ctx.output.info("The cart is already empty.");
        return Ok(());
    }

    if !yes {
        if !ctx.output.is_interactive() {
            bail!("Refusing to clear the cart without --yes");
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} item(s) from the cart?", cart.item_count()))
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cancelled.");
            return Ok(());
        }
    }

    cart.clear_cart();
    ctx.output.success("Cart cleared");
    Ok(())
}

async fn checkout(
    cart: &mut CartStore<CacheCartStorage>,
    args: CheckoutArgs,
    ctx: &Context,
) -> Result<()> {
    if cart.is_empty() {
        bail!("The cart is empty; add products before checking out");
    }

    let args = complete_contact(args, ctx)?;
    let yes = args.yes;
    let contact = contact_details(args);
    contact.check()?;

    if !yes {
        if !ctx.output.is_interactive() {
            bail!("Refusing to send the order without --yes");
        }
        show_cart(cart, ctx)?;
        let confirmed = Confirm::new()
            .with_prompt(format!("Send the order for {}?", cart.total_amount()))
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cancelled.");
            return Ok(());
        }
    }

    let api = ctx.catalog_api();
    let total = cart.total_amount();
    let spinner = ctx.output.spinner("Sending order...");
    let result = place_order(cart, &api, contact).await;
    spinner.finish_and_clear();

    let receipt = match result {
        Ok(receipt) => receipt,
        Err(e) => bail!("Order was not sent, the cart is unchanged: {}", e),
    };

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "status": receipt.status,
            "lead_id": receipt.lead_id,
            "total": total,
        }));
        return Ok(());
    }
    ctx.output.success(&format!("Order sent for {}", total));
    if let Some(lead_id) = &receipt.lead_id {
        ctx.output.kv("request", lead_id);
    }
    ctx.output.info("A manager will contact you shortly. The cart has been cleared.");
    Ok(())
}

/// Prompt for the required contact fields that were not passed as flags.
fn complete_contact(mut args: CheckoutArgs, ctx: &Context) -> Result<CheckoutArgs> {
    let missing_required = args.name.is_none() || args.phone.is_none();
    if !missing_required {
        return Ok(args);
    }
    if !ctx.output.is_interactive() {
        bail!("--name and --phone are required when not running interactively");
    }

    if args.name.is_none() {
        args.name = Some(Input::<String>::new().with_prompt("Name").interact_text()?);
    }
    if args.phone.is_none() {
        args.phone = Some(Input::<String>::new().with_prompt("Phone").interact_text()?);
    }
    if args.email.is_none() {
        args.email = Some(
            Input::<String>::new()
                .with_prompt("Email (optional)")
                .allow_empty(true)
                .interact_text()?,
        );
    }
    if args.comment.is_none() {
        args.comment = Some(
            Input::<String>::new()
                .with_prompt("Comment (optional)")
                .allow_empty(true)
                .interact_text()?,
        );
    }
    Ok(args)
}

fn contact_details(args: CheckoutArgs) -> ContactDetails {
    let mut contact = ContactDetails::new(
        args.name.unwrap_or_default(),
        args.phone.unwrap_or_default(),
    );
    if let Some(email) = args.email {
        contact = contact.with_email(email);
    }
    if let Some(comment) = args.comment {
        contact = contact.with_comment(comment);
    }
    contact
}

fn show_cart(cart: &CartStore<CacheCartStorage>, ctx: &Context) -> Result<()> {
    let storage = cart.storage();
    let saved_at = match storage.cache().get::<PersistedCart>(storage.key()) {
        Ok(record) => record.map(|r| r.saved_at),
        Err(e) => {
            ctx.output.debug(&format!("could not read cart timestamp: {}", e));
            None
        }
    };

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "items": cart.items(),
            "lines": cart.len(),
            "item_count": cart.item_count(),
            "total": cart.total_amount(),
            "saved_at": saved_at,
        }));
        return Ok(());
    }

    ctx.output.header("Cart");
    if cart.is_empty() {
        ctx.output.info("The cart is empty.");
        return Ok(());
    }

    let widths = [12, 36, 5, 18, 18];
    ctx.output
        .table_row(&["ID", "NAME", "QTY", "PRICE", "LINE TOTAL"], &widths);
    for item in cart.items() {
        ctx.output.table_row(
            &[
                item.id.as_str(),
                &item.name,
                &item.quantity.to_string(),
                &item.price.display(),
                &item.line_total().display(),
            ],
            &widths,
        );
    }

    print_summary(cart, ctx);
    if let Some(saved_at) = saved_at {
        ctx.output.kv(
            "saved",
            &saved_at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        );
    }
    Ok(())
}

fn print_summary(cart: &CartStore<CacheCartStorage>, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "lines": cart.len(),
            "item_count": cart.item_count(),
            "total": cart.total_amount(),
        }));
        return;
    }
    ctx.output.kv("lines", &cart.len().to_string());
    ctx.output.kv("items", &cart.item_count().to_string());
    ctx.output.kv("total", &cart.total_amount().display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_after_add_saturates() {
        assert_eq!(quantity_after_add(1, 3), 3);
        assert_eq!(quantity_after_add(4, 2), 5);
        assert_eq!(quantity_after_add(5, i64::MAX), i64::MAX);
    }

    #[test]
    fn test_contact_details_from_flags() {
        let args = CheckoutArgs {
            name: Some(" Иван ".into()),
            phone: Some("+7 912 345 67 89".into()),
            email: Some("".into()),
            comment: Some("Нужен счёт".into()),
            yes: true,
        };
        let contact = contact_details(args);
        assert_eq!(contact.name, "Иван");
        assert_eq!(contact.email, None);
        assert_eq!(contact.comment.as_deref(), Some("Нужен счёт"));
        assert!(contact.check().is_ok());
    }

    #[test]
    fn test_missing_phone_fails_validation() {
        let args = CheckoutArgs {
            name: Some("Иван".into()),
            ..Default::default()
        };
        assert!(contact_details(args).check().is_err());
    }
}
