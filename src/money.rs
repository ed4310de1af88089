//! Money

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount to two decimal places, half-up.
///
/// All externally observed amounts carry exactly two fraction digits.
/// Intermediate arithmetic keeps the full `Decimal` precision; this is the
/// single rounding step applied to each derived amount.
#[must_use]
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A zero amount at two decimal places.
#[must_use]
pub fn zero() -> Decimal {
    Decimal::new(0, 2)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn rounds_half_up() -> TestResult {
        assert_eq!(round2("0.125".parse()?), "0.13".parse::<Decimal>()?);
        assert_eq!(round2("0.124".parse()?), "0.12".parse::<Decimal>()?);

        Ok(())
    }

    #[test]
    fn midpoint_rounds_away_from_zero() -> TestResult {
        assert_eq!(round2("0.9995".parse()?), "1.00".parse::<Decimal>()?);

        Ok(())
    }

    #[test]
    fn already_rounded_amounts_are_unchanged() -> TestResult {
        assert_eq!(round2("10.00".parse()?), "10.00".parse::<Decimal>()?);

        Ok(())
    }

    #[test]
    fn zero_is_zero() {
        assert_eq!(zero(), Decimal::ZERO, "0.00 should equal zero");
    }
}
