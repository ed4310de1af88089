//! Cart Models

use folio::pricing::{CartTotals, LinePricing};
use jiff::Timestamp;
use uuid::Uuid;

use crate::{domain::catalog::models::BookUuid, uuids::TypedUuid};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Line UUID
pub type CartLineUuid = TypedUuid<CartLine>;

/// Cart Model
///
/// One mutable cart per user; lines are cleared when an order is created
/// from it.
#[derive(Debug, Clone)]
pub struct Cart {
    pub uuid: CartUuid,
    pub user_uuid: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// CartLine Model
#[derive(Debug, Clone)]
pub struct CartLine {
    pub uuid: CartLineUuid,
    pub cart_uuid: CartUuid,
    pub book_uuid: BookUuid,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A line carried over from a guest/session cart.
#[derive(Debug, Clone)]
pub struct SyncLine {
    pub book_uuid: BookUuid,
    pub quantity: u32,
}

/// Outcome of merging a session cart into a user cart.
///
/// Lines whose book no longer exists (or is unpublished) are skipped rather
/// than aborting the merge; the caller decides what to tell the user and is
/// responsible for clearing the session copy afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncOutcome {
    pub merged: usize,
    pub skipped: Vec<BookUuid>,
}

/// A single priced line of a cart view.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub book_uuid: BookUuid,
    pub title: String,
    pub pricing: LinePricing,
}

/// A cart priced at a point in time.
#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub totals: CartTotals,
}
