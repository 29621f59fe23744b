//! Pure invoice arithmetic. All money values are `Decimal` rounded to two
//! places, midpoint away from zero.

use crate::models::LineItem;
use rust_decimal::{Decimal, RoundingStrategy};

/// Derived totals for one invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Round to cents and pin the scale to exactly two decimal places, so
/// serialized amounts always read like currency ("100.00", never "100").
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// `quantity * unit_price`, rounded to cents.
pub fn line_item_total(quantity: Decimal, unit_price: Decimal) -> Decimal {
    round_money(quantity * unit_price)
}

/// Build a line item with its derived total. Caller-supplied totals are
/// never trusted.
pub fn build_line_item(description: String, quantity: Decimal, unit_price: Decimal) -> LineItem {
    LineItem {
        description,
        total: line_item_total(quantity, unit_price),
        quantity,
        unit_price,
    }
}

/// Compute subtotal, tax, and total for a set of line items.
/// `tax_rate` is a fraction (0.1 means 10%). An empty item list yields
/// all zeroes.
pub fn invoice_totals(items: &[LineItem], tax_rate: Decimal) -> InvoiceTotals {
    let subtotal = round_money(items.iter().map(|item| item.total).sum());
    let tax = round_money(subtotal * tax_rate);
    let total = subtotal + tax;
    InvoiceTotals {
        subtotal,
        tax,
        total,
    }
}

/// Convert a stored percent (0 to 100) into the fraction applied to
/// invoices.
pub fn tax_rate_from_percent(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}
