//! Bulk discounts

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::{round2, zero};

/// Errors raised when constructing a bulk discount.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// The discount window ends before it starts.
    #[error("discount starts at {starts_at} but ends at {ends_at}")]
    InvalidDateRange {
        /// Start of the rejected window.
        starts_at: Timestamp,
        /// End of the rejected window.
        ends_at: Timestamp,
    },

    /// The discount percentage is negative.
    #[error("discount percentage must not be negative, got {0}")]
    NegativePercentage(Decimal),

    /// The minimum qualifying quantity is zero.
    #[error("minimum quantity must be at least one")]
    ZeroMinQuantity,
}

/// A time-bounded percentage discount that applies once a line reaches a
/// minimum quantity.
///
/// A product holds at most one of these at a time; the owning catalog makes
/// that invariant structural by storing the discount as an optional field on
/// the product itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkDiscount {
    min_quantity: u32,
    percentage: Decimal,
    starts_at: Timestamp,
    ends_at: Timestamp,
}

impl BulkDiscount {
    /// Creates a bulk discount, validating its inputs.
    ///
    /// No upper bound is placed on `percentage`: a value above 100 is
    /// accepted and yields a negative line total downstream.
    ///
    /// # Errors
    ///
    /// - [`DiscountError::InvalidDateRange`]: `starts_at` is after `ends_at`.
    /// - [`DiscountError::NegativePercentage`]: `percentage` is below zero.
    /// - [`DiscountError::ZeroMinQuantity`]: `min_quantity` is zero.
    pub fn new(
        min_quantity: u32,
        percentage: Decimal,
        starts_at: Timestamp,
        ends_at: Timestamp,
    ) -> Result<Self, DiscountError> {
        if starts_at > ends_at {
            return Err(DiscountError::InvalidDateRange { starts_at, ends_at });
        }

        if percentage < Decimal::ZERO {
            return Err(DiscountError::NegativePercentage(percentage));
        }

        if min_quantity == 0 {
            return Err(DiscountError::ZeroMinQuantity);
        }

        Ok(Self {
            min_quantity,
            percentage,
            starts_at,
            ends_at,
        })
    }

    /// The minimum line quantity that qualifies for the discount.
    #[must_use]
    pub fn min_quantity(&self) -> u32 {
        self.min_quantity
    }

    /// The discount percentage.
    #[must_use]
    pub fn percentage(&self) -> Decimal {
        self.percentage
    }

    /// Start of the discount window.
    #[must_use]
    pub fn starts_at(&self) -> Timestamp {
        self.starts_at
    }

    /// End of the discount window.
    #[must_use]
    pub fn ends_at(&self) -> Timestamp {
        self.ends_at
    }

    /// Whether the discount applies to a line of `quantity` units at `at`.
    ///
    /// Both window ends are inclusive.
    #[must_use]
    pub fn is_active(&self, quantity: u32, at: Timestamp) -> bool {
        self.starts_at <= at && at <= self.ends_at && quantity >= self.min_quantity
    }
}

/// Filters a product's candidate discount down to the applicable one.
///
/// Returns the discount iff it is active for the given quantity and time;
/// a product without a discount, or whose discount is out of window or below
/// its minimum quantity, resolves to `None`.
#[must_use]
pub fn resolve(
    candidate: Option<&BulkDiscount>,
    quantity: u32,
    at: Timestamp,
) -> Option<&BulkDiscount> {
    candidate.filter(|discount| discount.is_active(quantity, at))
}

/// The discount amount for a full line, rounded once.
///
/// `round2(percentage / 100 × price × quantity)` when a discount is given,
/// `0.00` otherwise. The percentage is applied to the whole line and rounded
/// exactly once — never per unit and then summed, which would accumulate
/// rounding drift across units.
#[must_use]
pub fn discount_amount(price: Decimal, quantity: u32, discount: Option<&BulkDiscount>) -> Decimal {
    match discount {
        Some(discount) => round2(
            discount.percentage() / Decimal::ONE_HUNDRED * price * Decimal::from(quantity),
        ),
        None => zero(),
    }
}
