//! Order Models

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{domain::catalog::models::BookUuid, uuids::TypedUuid};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// Order status.
///
/// Every status except `Pending` and `Cancelled` is payment gated: an order
/// cannot move into it until payment has been recorded. `Delivered` and
/// `Completed` are terminal; no transition out of them is modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    OrderPlaced,
    Packed,
    InTransit,
    Delivered,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// The customer-facing name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::OrderPlaced => "Order Placed",
            Self::Packed => "Packed",
            Self::InTransit => "In Transit",
            Self::Delivered => "Delivered",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether entering this status requires payment to have been made.
    #[must_use]
    pub const fn requires_payment(self) -> bool {
        matches!(
            self,
            Self::OrderPlaced | Self::Packed | Self::InTransit | Self::Delivered | Self::Completed
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order Model
///
/// `total_price` and `total_discount` are derived from the order's items and
/// recomputed from the item rows whenever an item is written — never patched
/// incrementally. The milestone flags and dates are owned by the status
/// machine in [`super::lifecycle`].
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: Uuid,
    /// Human-facing tracking code, generated at creation.
    pub reference: String,
    pub status: OrderStatus,
    pub payment_made: bool,
    pub payment_date: Option<Timestamp>,
    pub packed: bool,
    pub packed_date: Option<Timestamp>,
    pub in_transit: bool,
    pub in_transit_date: Option<Timestamp>,
    pub delivered: bool,
    pub delivered_date: Option<Timestamp>,
    /// Post-discount sum of item totals.
    pub total_price: Decimal,
    pub total_discount: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    /// A fresh order in `Pending`, before any items are attached.
    #[must_use]
    pub fn create(uuid: OrderUuid, user_uuid: Uuid, reference: String, now: Timestamp) -> Self {
        Self {
            uuid,
            user_uuid,
            reference,
            status: OrderStatus::Pending,
            payment_made: false,
            payment_date: None,
            packed: false,
            packed_date: None,
            in_transit: false,
            in_transit_date: None,
            delivered: false,
            delivered_date: None,
            total_price: folio::money::zero(),
            total_discount: folio::money::zero(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// OrderItem Model
///
/// `price` is a snapshot of the book's price at save time; `discount` and
/// `total` are computed from the discount active for that quantity and time.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub book_uuid: BookUuid,
    pub quantity: u32,
    pub price: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub created_at: Timestamp,
}

/// ShippingAddress Model, one per order.
#[derive(Debug, Clone)]
pub struct ShippingAddress {
    pub order_uuid: OrderUuid,
    pub address: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
    pub nearest_bus_stop: Option<String>,
}

/// OrderNote Model, at most one per order.
#[derive(Debug, Clone)]
pub struct OrderNote {
    pub order_uuid: OrderUuid,
    pub note: String,
}

/// New Shipping Address Data
#[derive(Debug, Clone)]
pub struct NewShippingAddress {
    pub address: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
    pub nearest_bus_stop: Option<String>,
}

/// New Order Data
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub shipping_address: NewShippingAddress,
    pub note: Option<String>,
}

/// An order with its owned rows, as returned by reads.
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub note: Option<OrderNote>,
}
