//! Carts Repository

use jiff::Timestamp;
use uuid::Uuid;

use crate::{
    domain::{
        carts::models::{Cart, CartLine, CartLineUuid, CartUuid},
        catalog::models::BookUuid,
    },
    store::{StoreError, Transaction},
};

#[derive(Debug, Clone, Default)]
pub(crate) struct CartsRepository;

impl CartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Returns the user's cart, creating an empty one when absent.
    pub(crate) fn get_or_create(
        &self,
        tx: &mut Transaction,
        user_uuid: Uuid,
        now: Timestamp,
    ) -> Cart {
        if let Some(cart) = self.find_for_user(tx, user_uuid) {
            return cart;
        }

        let cart = Cart {
            uuid: CartUuid::new(),
            user_uuid,
            created_at: now,
            updated_at: now,
        };

        tx.rows_mut().carts.insert(cart.uuid, cart.clone());

        cart
    }

    pub(crate) fn find_for_user(&self, tx: &Transaction, user_uuid: Uuid) -> Option<Cart> {
        tx.rows()
            .carts
            .values()
            .find(|cart| cart.user_uuid == user_uuid)
            .cloned()
    }

    /// Adds `quantity` to the `(cart, book)` line, creating it when absent.
    ///
    /// The read-modify-write runs inside the caller's transaction, so two
    /// racing adds serialise instead of losing an update.
    pub(crate) fn upsert_line(
        &self,
        tx: &mut Transaction,
        cart: CartUuid,
        book: BookUuid,
        quantity: u32,
        now: Timestamp,
    ) -> Result<CartLine, StoreError> {
        if !tx.rows().carts.contains_key(&cart) {
            return Err(StoreError::ForeignKeyViolation);
        }

        let existing = tx
            .rows()
            .cart_lines
            .values()
            .find(|line| line.cart_uuid == cart && line.book_uuid == book)
            .map(|line| line.uuid);

        let line = match existing {
            Some(uuid) => {
                let rows = tx.rows_mut();
                let line = rows
                    .cart_lines
                    .get_mut(&uuid)
                    .ok_or(StoreError::RowNotFound)?;

                line.quantity += quantity;
                line.updated_at = now;
                line.clone()
            }
            None => {
                let line = CartLine {
                    uuid: CartLineUuid::new(),
                    cart_uuid: cart,
                    book_uuid: book,
                    quantity,
                    created_at: now,
                    updated_at: now,
                };

                tx.rows_mut().cart_lines.insert(line.uuid, line.clone());

                line
            }
        };

        self.touch_cart(tx, cart, now);

        Ok(line)
    }

    pub(crate) fn remove_line(
        &self,
        tx: &mut Transaction,
        cart: CartUuid,
        book: BookUuid,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        let uuid = tx
            .rows()
            .cart_lines
            .values()
            .find(|line| line.cart_uuid == cart && line.book_uuid == book)
            .map(|line| line.uuid)
            .ok_or(StoreError::RowNotFound)?;

        tx.rows_mut().cart_lines.remove(&uuid);
        self.touch_cart(tx, cart, now);

        Ok(())
    }

    /// The cart's lines, oldest first.
    pub(crate) fn lines(&self, tx: &Transaction, cart: CartUuid) -> Vec<CartLine> {
        let mut lines: Vec<CartLine> = tx
            .rows()
            .cart_lines
            .values()
            .filter(|line| line.cart_uuid == cart)
            .cloned()
            .collect();

        lines.sort_by_key(|line| (line.created_at, line.uuid.into_uuid()));

        lines
    }

    pub(crate) fn clear(&self, tx: &mut Transaction, cart: CartUuid, now: Timestamp) -> u64 {
        let removed: Vec<CartLineUuid> = tx
            .rows()
            .cart_lines
            .values()
            .filter(|line| line.cart_uuid == cart)
            .map(|line| line.uuid)
            .collect();

        for uuid in &removed {
            tx.rows_mut().cart_lines.remove(uuid);
        }

        self.touch_cart(tx, cart, now);

        removed.len() as u64
    }

    fn touch_cart(&self, tx: &mut Transaction, cart: CartUuid, now: Timestamp) {
        if let Some(row) = tx.rows_mut().carts.get_mut(&cart) {
            row.updated_at = now;
        }
    }
}
