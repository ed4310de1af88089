//! Transactional row store
//!
//! The relational engine is an external collaborator, so the application
//! talks to a transactional row store through repository-style operations.
//! This module provides that store: snapshot transactions over in-memory
//! rows. A transaction holds the store's lock until committed or dropped;
//! dropping without committing rolls every write back, so a hard error
//! anywhere in an operation leaves prior persisted state untouched.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{
    carts::models::{Cart, CartLine, CartLineUuid, CartUuid},
    catalog::models::{Author, AuthorUuid, Book, BookUuid, Category, CategoryUuid},
    orders::models::{Order, OrderItem, OrderItemUuid, OrderNote, OrderUuid, ShippingAddress},
};

/// Row-level failures surfaced by repositories.
///
/// These mirror the constraint violations a relational backend reports;
/// each domain error type maps them onto its own variants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No row matched.
    #[error("row not found")]
    RowNotFound,

    /// A uniqueness constraint was violated.
    #[error("unique constraint violated")]
    UniqueViolation,

    /// A referenced row does not exist.
    #[error("referenced row not found")]
    ForeignKeyViolation,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Rows {
    pub(crate) books: HashMap<BookUuid, Book>,
    pub(crate) categories: HashMap<CategoryUuid, Category>,
    pub(crate) authors: HashMap<AuthorUuid, Author>,
    pub(crate) carts: HashMap<CartUuid, Cart>,
    pub(crate) cart_lines: HashMap<CartLineUuid, CartLine>,
    pub(crate) orders: HashMap<OrderUuid, Order>,
    pub(crate) order_items: HashMap<OrderItemUuid, OrderItem>,
    pub(crate) shipping_addresses: HashMap<OrderUuid, ShippingAddress>,
    pub(crate) order_notes: HashMap<OrderUuid, OrderNote>,
}

/// Handle to the row store.
#[derive(Debug, Clone, Default)]
pub struct Db {
    rows: Arc<Mutex<Rows>>,
}

impl Db {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a transaction.
    ///
    /// The transaction owns the store's lock until it is committed or
    /// dropped, so concurrent logical operations serialise rather than
    /// interleave their reads and writes.
    pub async fn begin(&self) -> Transaction {
        let guard = Arc::clone(&self.rows).lock_owned().await;
        let snapshot = guard.clone();

        Transaction {
            guard,
            snapshot: Some(snapshot),
        }
    }
}

/// A snapshot transaction over the row store.
#[derive(Debug)]
pub struct Transaction {
    guard: OwnedMutexGuard<Rows>,
    snapshot: Option<Rows>,
}

impl Transaction {
    /// Publishes every write made through this transaction.
    pub fn commit(mut self) {
        self.snapshot = None;
    }

    pub(crate) fn rows(&self) -> &Rows {
        &self.guard
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Rows {
        &mut self.guard
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        // An uncommitted transaction restores the state captured at begin.
        if let Some(snapshot) = self.snapshot.take() {
            *self.guard = snapshot;
        }
    }
}
