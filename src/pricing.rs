//! Line and aggregate pricing

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    discounts::{self, BulkDiscount},
    money::round2,
};

/// The priced form of a single cart or order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePricing {
    /// Unit price snapshot taken when the line was priced.
    pub price: Decimal,

    /// Number of units on the line.
    pub quantity: u32,

    /// Discount applied to the whole line.
    pub discount: Decimal,

    /// `round2(price × quantity) − discount`.
    pub total: Decimal,
}

impl LinePricing {
    /// The pre-discount line amount.
    #[must_use]
    pub fn gross(&self) -> Decimal {
        round2(self.price * Decimal::from(self.quantity))
    }
}

/// Prices a single line.
///
/// The unit price is snapshotted as given; the discount is resolved from the
/// product's candidate discount for this quantity and time and rounded once;
/// the total is `round2(price × quantity) − discount`.
///
/// The total is not clamped at zero: a discount percentage above 100 prices
/// the line negative, and policy on such discounts belongs to the catalog
/// write path, not here.
#[must_use]
pub fn line_total(
    price: Decimal,
    quantity: u32,
    candidate: Option<&BulkDiscount>,
    at: Timestamp,
) -> LinePricing {
    let active = discounts::resolve(candidate, quantity, at);
    let discount = discounts::discount_amount(price, quantity, active);
    let total = round2(price * Decimal::from(quantity)) - discount;

    LinePricing {
        price,
        quantity,
        discount,
        total,
    }
}

/// Cart-level totals.
///
/// `total_price` uses cart semantics: the **pre-discount** sum of
/// `price × quantity` across lines. The discounted figure is derived, not
/// stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Pre-discount sum of all lines.
    pub total_price: Decimal,

    /// Sum of all line discounts.
    pub total_discount: Decimal,
}

impl CartTotals {
    /// The amount actually payable: `total_price − total_discount`.
    #[must_use]
    pub fn total_discounted_price(&self) -> Decimal {
        self.total_price - self.total_discount
    }
}

/// Order-level totals.
///
/// `total_price` uses order semantics: the **post-discount** sum of each
/// item's `total`. This intentionally differs from [`CartTotals`]; both
/// aggregations exist side by side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Post-discount sum of item totals.
    pub total_price: Decimal,

    /// Sum of all item discounts.
    pub total_discount: Decimal,
}

/// Aggregates priced lines with cart semantics.
#[must_use]
pub fn cart_totals<'a, I>(lines: I) -> CartTotals
where
    I: IntoIterator<Item = &'a LinePricing>,
{
    lines
        .into_iter()
        .fold(CartTotals::default(), |acc, line| CartTotals {
            total_price: acc.total_price + line.gross(),
            total_discount: acc.total_discount + line.discount,
        })
}

/// Aggregates priced items with order semantics.
#[must_use]
pub fn order_totals<'a, I>(items: I) -> OrderTotals
where
    I: IntoIterator<Item = &'a LinePricing>,
{
    items
        .into_iter()
        .fold(OrderTotals::default(), |acc, item| OrderTotals {
            total_price: acc.total_price + item.total,
            total_discount: acc.total_discount + item.discount,
        })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::discounts::BulkDiscount;

    fn mid_window() -> TestResult<Timestamp> {
        Ok("2026-01-15T12:00:00Z".parse()?)
    }

    fn ten_percent_off_two() -> TestResult<BulkDiscount> {
        Ok(BulkDiscount::new(
            2,
            "10".parse()?,
            "2026-01-01T00:00:00Z".parse()?,
            "2026-02-01T00:00:00Z".parse()?,
        )?)
    }

    #[test]
    fn line_without_discount() -> TestResult {
        let line = line_total("12.50".parse()?, 2, None, mid_window()?);

        assert_eq!(line.discount, Decimal::ZERO, "no candidate, no discount");
        assert_eq!(line.total, "25.00".parse::<Decimal>()?);
        assert_eq!(line.gross(), "25.00".parse::<Decimal>()?);

        Ok(())
    }

    #[test]
    fn line_with_active_discount() -> TestResult {
        let discount = ten_percent_off_two()?;
        let line = line_total("10.00".parse()?, 2, Some(&discount), mid_window()?);

        assert_eq!(line.discount, "2.00".parse::<Decimal>()?);
        assert_eq!(line.total, "18.00".parse::<Decimal>()?);

        Ok(())
    }

    #[test]
    fn line_below_min_quantity_keeps_full_price() -> TestResult {
        let discount = ten_percent_off_two()?;
        let line = line_total("10.00".parse()?, 1, Some(&discount), mid_window()?);

        assert_eq!(line.discount, Decimal::ZERO, "quantity 1 must not qualify");
        assert_eq!(line.total, "10.00".parse::<Decimal>()?);

        Ok(())
    }

    #[test]
    fn line_total_may_go_negative_above_one_hundred_percent() -> TestResult {
        let discount = BulkDiscount::new(
            1,
            "150".parse()?,
            "2026-01-01T00:00:00Z".parse()?,
            "2026-02-01T00:00:00Z".parse()?,
        )?;

        let line = line_total("10.00".parse()?, 1, Some(&discount), mid_window()?);

        assert_eq!(line.total, "-5.00".parse::<Decimal>()?);

        Ok(())
    }

    #[test]
    fn cart_totals_are_pre_discount() -> TestResult {
        let discount = ten_percent_off_two()?;
        let at = mid_window()?;

        let lines = [
            line_total("10.00".parse()?, 2, Some(&discount), at),
            line_total("5.00".parse()?, 1, None, at),
        ];

        let totals = cart_totals(&lines);

        assert_eq!(totals.total_price, "25.00".parse::<Decimal>()?);
        assert_eq!(totals.total_discount, "2.00".parse::<Decimal>()?);
        assert_eq!(
            totals.total_discounted_price(),
            "23.00".parse::<Decimal>()?
        );

        Ok(())
    }

    #[test]
    fn order_totals_are_post_discount() -> TestResult {
        let discount = ten_percent_off_two()?;
        let at = mid_window()?;

        let items = [
            line_total("10.00".parse()?, 2, Some(&discount), at),
            line_total("5.00".parse()?, 1, None, at),
        ];

        let totals = order_totals(&items);

        assert_eq!(totals.total_price, "23.00".parse::<Decimal>()?);
        assert_eq!(totals.total_discount, "2.00".parse::<Decimal>()?);

        Ok(())
    }

    #[test]
    fn empty_aggregations_are_zero() {
        let lines: [LinePricing; 0] = [];

        assert_eq!(
            cart_totals(&lines),
            CartTotals::default(),
            "empty cart totals should be zero"
        );
        assert_eq!(
            order_totals(&lines),
            OrderTotals::default(),
            "empty order totals should be zero"
        );
    }
}
