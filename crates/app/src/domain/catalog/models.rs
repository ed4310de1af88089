//! Catalog Models

use folio::discounts::BulkDiscount;
use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::uuids::TypedUuid;

/// Book UUID
pub type BookUuid = TypedUuid<Book>;

/// Category UUID
pub type CategoryUuid = TypedUuid<Category>;

/// Author UUID
pub type AuthorUuid = TypedUuid<Author>;

/// Publication status; only published books are sellable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookStatus {
    /// Visible and sellable.
    Published,
    /// Hidden from carts and orders.
    Draft,
}

/// Book Model
#[derive(Debug, Clone)]
pub struct Book {
    pub uuid: BookUuid,
    pub title: String,
    pub slug: String,
    pub isbn: String,
    pub price: Decimal,
    pub stock_quantity: u32,
    pub status: BookStatus,
    pub category: Option<CategoryUuid>,
    pub authors: Vec<AuthorUuid>,
    /// The single active bulk discount, when one exists. Holding the
    /// discount on the book row makes "at most one per product" structural
    /// rather than a write-time scan.
    pub active_discount: Option<BulkDiscount>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Book {
    /// Whether the book can be added to carts and orders.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == BookStatus::Published
    }
}

/// New Book Model
#[derive(Debug, Clone)]
pub struct NewBook {
    pub uuid: BookUuid,
    pub title: String,
    /// Generated from the title when absent.
    pub slug: Option<String>,
    pub isbn: String,
    pub price: Decimal,
    pub stock_quantity: u32,
    pub status: BookStatus,
    pub category: Option<CategoryUuid>,
    pub authors: Vec<AuthorUuid>,
}

/// Category Model
#[derive(Debug, Clone)]
pub struct Category {
    pub uuid: CategoryUuid,
    pub name: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Category Model
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub uuid: CategoryUuid,
    pub name: String,
    /// Generated from the name when absent.
    pub slug: Option<String>,
}

/// Author Model
#[derive(Debug, Clone)]
pub struct Author {
    pub uuid: AuthorUuid,
    pub name: String,
    pub biography: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Author Model
#[derive(Debug, Clone)]
pub struct NewAuthor {
    pub uuid: AuthorUuid,
    pub name: String,
    pub biography: Option<String>,
}

/// New Discount Data
///
/// Validated into a [`BulkDiscount`] when attached to a book.
#[derive(Debug, Clone)]
pub struct NewDiscount {
    pub min_quantity: u32,
    pub percentage: Decimal,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}
