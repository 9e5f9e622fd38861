//! Order summaries
//!
//! Tables shown to the customer at checkout. Amounts are rounded here and nowhere else.

use std::io;

use jiff::civil::Date;
use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartOrder,
    pricing::{PricingError, Totals, tax_rate_points, to_money},
    subscriptions::SubscriptionOrder,
};

/// Errors that can occur when writing a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// An amount could not be converted for display.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

const FREE: &str = "Free";

/// Write the checkout summary for a cart order.
///
/// # Errors
///
/// Returns a [`SummaryError`] if an amount cannot be displayed or writing fails.
pub fn write_cart_summary(
    mut out: impl io::Write,
    order: &CartOrder,
    currency: &'static Currency,
) -> Result<(), SummaryError> {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Qty", "Price"]);

    for line in &order.lines {
        builder.push_record([
            line.name().to_string(),
            line.quantity().to_string(),
            to_money(line.line_total()?, currency)?.to_string(),
        ]);
    }

    write_table(&mut out, builder)?;
    write_totals(&mut out, &order.totals, currency, true)
}

/// Write the checkout summary for a subscription.
///
/// # Errors
///
/// Returns a [`SummaryError`] if an amount cannot be displayed or writing fails.
pub fn write_subscription_summary(
    mut out: impl io::Write,
    order: &SubscriptionOrder,
    currency: &'static Currency,
) -> Result<(), SummaryError> {
    let plan = order.plan();
    let window = order.window();

    writeln!(
        out,
        "\n{plan} plan, delivering {} to {}",
        window.start(),
        window.end()
    )
    .map_err(|_err| SummaryError::IO)?;

    let mut builder = Builder::default();

    builder.push_record(["Item", "Price"]);
    builder.push_record([
        format!("{plan} tiffins ({} days)", plan.paid_deliveries()),
        to_money(order.price(), currency)?.to_string(),
    ]);
    builder.push_record([
        format!("Saturday tiffins ({})", plan.bonus_deliveries()),
        FREE.to_string(),
    ]);
    builder.push_record(["Shipping".to_string(), FREE.to_string()]);

    write_table(&mut out, builder)?;
    write_totals(&mut out, &order.totals()?, currency, false)
}

/// Write the driver's delivery list for `date`.
///
/// # Errors
///
/// Returns [`SummaryError::IO`] if writing fails.
pub fn write_delivery_list(
    mut out: impl io::Write,
    date: Date,
    orders: &[&SubscriptionOrder],
) -> Result<(), SummaryError> {
    writeln!(out, "\nDeliveries for {date}: {}", orders.len())
        .map_err(|_err| SummaryError::IO)?;

    if orders.is_empty() {
        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["Quarter", "Name", "Phone", "Address", "Preferences"]);

    for order in orders {
        let address = order.address();

        builder.push_record([
            address.city_quarter.to_string(),
            order.contact().name.clone(),
            order.contact().phone.clone(),
            format!("{}, {} {}", address.line1, address.city, address.zipcode),
            order.meal_preferences().unwrap_or_default().to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);

    writeln!(out, "{table}").map_err(|_err| SummaryError::IO)
}

/// Write a subscriber's own subscriptions, one row per order.
///
/// # Errors
///
/// Returns a [`SummaryError`] if a total cannot be displayed or writing fails.
pub fn write_subscription_list(
    mut out: impl io::Write,
    orders: &[&SubscriptionOrder],
    currency: &'static Currency,
) -> Result<(), SummaryError> {
    writeln!(out, "\nSubscriptions: {}", orders.len()).map_err(|_err| SummaryError::IO)?;

    if orders.is_empty() {
        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["Plan", "Start", "End", "Quarter", "Total"]);

    for order in orders {
        let window = order.window();

        builder.push_record([
            order.plan().to_string(),
            window.start().to_string(),
            window.end().to_string(),
            order.address().city_quarter.to_string(),
            to_money(order.totals()?.total(), currency)?.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(4..), Alignment::right());

    writeln!(out, "{table}").map_err(|_err| SummaryError::IO)
}

/// Writes the item table. Every column after the first holds amounts.
fn write_table(out: &mut impl io::Write, builder: Builder) -> Result<(), SummaryError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(1..), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| SummaryError::IO)
}

/// Writes the totals block, amounts right-aligned under each other and the total in bold.
fn write_totals(
    out: &mut impl io::Write,
    totals: &Totals,
    currency: &'static Currency,
    with_subtotal: bool,
) -> Result<(), SummaryError> {
    let money = totals.to_money(currency)?;
    let mut builder = Builder::default();

    if with_subtotal {
        builder.push_record(["Subtotal:".to_string(), money.subtotal.to_string()]);
    }

    builder.push_record([format!("Tax ({}%):", tax_rate_points()), money.tax.to_string()]);
    builder.push_record(["Total:".to_string(), money.total.to_string()]);

    let mut table = builder.build();

    table.with(Style::blank());
    table.modify(Columns::new(0..), Alignment::right());
    table.modify(Rows::last(), Color::BOLD);

    writeln!(out, "{table}\n").map_err(|_err| SummaryError::IO)
}
