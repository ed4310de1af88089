//! Folio prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    discounts::{BulkDiscount, DiscountError, discount_amount, resolve},
    money::round2,
    pricing::{CartTotals, LinePricing, OrderTotals, cart_totals, line_total, order_totals},
};
