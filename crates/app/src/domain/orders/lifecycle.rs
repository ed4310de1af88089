//! Order status state machine.
//!
//! Status changes are applied to the *persisted* order row fetched inside
//! the same transaction, so the returned [`Transition`] reflects a real
//! change of stored state rather than an in-memory diff. Re-saving the
//! current status is `Unchanged` and must trigger no side effects.

use jiff::Timestamp;
use thiserror::Error;

use super::models::{Order, OrderStatus};

/// Result of applying a status to a persisted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The stored status actually changed.
    Changed {
        /// Status the order held before the update.
        from: OrderStatus,
        /// Status the order holds now.
        to: OrderStatus,
    },

    /// The incoming status matched the stored one.
    Unchanged,
}

/// A payment-gated transition was attempted before payment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("payment must be made before the order can be moved to '{status}'")]
pub struct PaymentRequired {
    /// The refused target status.
    pub status: OrderStatus,
}

impl Order {
    /// Applies `status`, enforcing the payment gate and stamping milestones.
    ///
    /// The gate is a standing invariant, re-checked on every update: moving
    /// into any payment-gated status while `payment_made` is false is
    /// refused and the order is left untouched.
    ///
    /// Milestones fire only on first entry — `packed_date`,
    /// `in_transit_date` and `delivered_date` are written once and never
    /// overwritten by a repeated save of the same status. A missing
    /// `payment_date` is backfilled whenever the order is already paid.
    ///
    /// # Errors
    ///
    /// [`PaymentRequired`] when `status` is payment gated and the order has
    /// not been paid.
    pub fn apply_status(
        &mut self,
        status: OrderStatus,
        now: Timestamp,
    ) -> Result<Transition, PaymentRequired> {
        if status.requires_payment() && !self.payment_made {
            return Err(PaymentRequired { status });
        }

        match status {
            OrderStatus::Packed if !self.packed => {
                self.packed = true;
                self.packed_date = Some(now);
            }
            OrderStatus::InTransit if !self.in_transit => {
                self.in_transit = true;
                self.in_transit_date = Some(now);
            }
            OrderStatus::Delivered if !self.delivered => {
                self.delivered = true;
                self.delivered_date = Some(now);
            }
            _ => {}
        }

        if self.payment_made && self.payment_date.is_none() {
            self.payment_date = Some(now);
        }

        let transition = if self.status == status {
            Transition::Unchanged
        } else {
            Transition::Changed {
                from: self.status,
                to: status,
            }
        };

        self.status = status;
        self.updated_at = now;

        Ok(transition)
    }

    /// Records the externally confirmed payment.
    ///
    /// Idempotent: the first call flips `payment_made` and stamps
    /// `payment_date`; repeats change nothing.
    pub fn record_payment(&mut self, now: Timestamp) {
        if self.payment_made && self.payment_date.is_some() {
            return;
        }

        self.payment_made = true;

        if self.payment_date.is_none() {
            self.payment_date = Some(now);
        }

        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;
    use crate::domain::orders::models::OrderUuid;

    fn pending_order() -> TestResult<Order> {
        Ok(Order::create(
            OrderUuid::new(),
            Uuid::now_v7(),
            "ord_test".to_string(),
            "2026-04-01T08:00:00Z".parse()?,
        ))
    }

    #[test]
    fn unpaid_orders_cannot_advance() -> TestResult {
        let mut order = pending_order()?;

        for status in [
            OrderStatus::OrderPlaced,
            OrderStatus::Packed,
            OrderStatus::InTransit,
            OrderStatus::Delivered,
            OrderStatus::Completed,
        ] {
            let result = order.apply_status(status, "2026-04-01T09:00:00Z".parse()?);

            assert_eq!(result, Err(PaymentRequired { status }));
            assert_eq!(order.status, OrderStatus::Pending, "order must be untouched");
        }

        Ok(())
    }

    #[test]
    fn cancellation_is_not_payment_gated() -> TestResult {
        let mut order = pending_order()?;

        let transition = order.apply_status(OrderStatus::Cancelled, "2026-04-01T09:00:00Z".parse()?)?;

        assert_eq!(
            transition,
            Transition::Changed {
                from: OrderStatus::Pending,
                to: OrderStatus::Cancelled
            }
        );

        Ok(())
    }

    #[test]
    fn packing_stamps_the_milestone_once() -> TestResult {
        let mut order = pending_order()?;
        order.record_payment("2026-04-01T09:00:00Z".parse()?);

        let first: Timestamp = "2026-04-02T10:00:00Z".parse()?;
        let second: Timestamp = "2026-04-03T10:00:00Z".parse()?;

        let transition = order.apply_status(OrderStatus::Packed, first)?;

        assert!(matches!(transition, Transition::Changed { .. }));
        assert!(order.packed);
        assert_eq!(order.packed_date, Some(first));

        let repeat = order.apply_status(OrderStatus::Packed, second)?;

        assert_eq!(repeat, Transition::Unchanged, "same status is no transition");
        assert_eq!(
            order.packed_date,
            Some(first),
            "milestone date must not move on a repeated save"
        );

        Ok(())
    }

    #[test]
    fn each_milestone_is_stamped_on_first_entry() -> TestResult {
        let mut order = pending_order()?;
        order.record_payment("2026-04-01T09:00:00Z".parse()?);

        let packed_at: Timestamp = "2026-04-02T10:00:00Z".parse()?;
        let transit_at: Timestamp = "2026-04-03T10:00:00Z".parse()?;
        let delivered_at: Timestamp = "2026-04-04T10:00:00Z".parse()?;

        order.apply_status(OrderStatus::Packed, packed_at)?;
        order.apply_status(OrderStatus::InTransit, transit_at)?;
        order.apply_status(OrderStatus::Delivered, delivered_at)?;

        assert_eq!(order.packed_date, Some(packed_at));
        assert_eq!(order.in_transit_date, Some(transit_at));
        assert_eq!(order.delivered_date, Some(delivered_at));

        Ok(())
    }

    #[test]
    fn payment_date_is_stamped_once() -> TestResult {
        let mut order = pending_order()?;

        let first: Timestamp = "2026-04-01T09:00:00Z".parse()?;
        let second: Timestamp = "2026-04-05T09:00:00Z".parse()?;

        order.record_payment(first);
        order.record_payment(second);

        assert!(order.payment_made);
        assert_eq!(order.payment_date, Some(first), "repeat payments are no-ops");

        Ok(())
    }

    #[test]
    fn missing_payment_date_is_backfilled_on_update() -> TestResult {
        let mut order = pending_order()?;

        // Payment recorded without a date, as an upstream import might.
        order.payment_made = true;

        let at: Timestamp = "2026-04-02T10:00:00Z".parse()?;

        order.apply_status(OrderStatus::OrderPlaced, at)?;

        assert_eq!(order.payment_date, Some(at));

        Ok(())
    }

    #[test]
    fn resaving_pending_is_unchanged() -> TestResult {
        let mut order = pending_order()?;

        let transition = order.apply_status(OrderStatus::Pending, "2026-04-01T09:00:00Z".parse()?)?;

        assert_eq!(transition, Transition::Unchanged);

        Ok(())
    }
}
