//! Catalog service.

use async_trait::async_trait;
use folio::discounts::BulkDiscount;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    domain::catalog::{
        errors::CatalogServiceError,
        models::{
            Author, Book, BookUuid, Category, NewAuthor, NewBook, NewCategory, NewDiscount,
        },
        repository::BooksRepository,
    },
    store::Db,
};

#[derive(Debug, Clone)]
pub struct MemCatalogService {
    db: Db,
    books: BooksRepository,
}

impl MemCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            books: BooksRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for MemCatalogService {
    #[tracing::instrument(name = "catalog.service.create_book", skip(self, book), err)]
    async fn create_book(
        &self,
        book: NewBook,
        now: Timestamp,
    ) -> Result<Book, CatalogServiceError> {
        if book.price < Decimal::ZERO {
            return Err(CatalogServiceError::NegativePrice);
        }

        let slug = book
            .slug
            .clone()
            .unwrap_or_else(|| slugify(&book.title));

        let mut tx = self.db.begin().await;

        let created = self.books.insert_book(
            &mut tx,
            Book {
                uuid: book.uuid,
                title: book.title,
                slug,
                isbn: book.isbn,
                price: book.price,
                stock_quantity: book.stock_quantity,
                status: book.status,
                category: book.category,
                authors: book.authors,
                active_discount: None,
                created_at: now,
                updated_at: now,
            },
        )?;

        tx.commit();

        info!(book_uuid = %created.uuid, "created book");

        Ok(created)
    }

    async fn get_book(&self, book: BookUuid) -> Result<Book, CatalogServiceError> {
        let tx = self.db.begin().await;

        Ok(self.books.get_book(&tx, book)?)
    }

    #[tracing::instrument(name = "catalog.service.delete_book", skip(self), err)]
    async fn delete_book(&self, book: BookUuid) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin().await;

        let rows_affected = self.books.delete_book(&mut tx, book)?;

        if rows_affected == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        tx.commit();

        Ok(())
    }

    async fn create_category(
        &self,
        category: NewCategory,
        now: Timestamp,
    ) -> Result<Category, CatalogServiceError> {
        let slug = category
            .slug
            .clone()
            .unwrap_or_else(|| slugify(&category.name));

        let mut tx = self.db.begin().await;

        let created = self.books.insert_category(
            &mut tx,
            Category {
                uuid: category.uuid,
                name: category.name,
                slug,
                created_at: now,
                updated_at: now,
            },
        )?;

        tx.commit();

        Ok(created)
    }

    async fn create_author(
        &self,
        author: NewAuthor,
        now: Timestamp,
    ) -> Result<Author, CatalogServiceError> {
        let mut tx = self.db.begin().await;

        let created = self.books.insert_author(
            &mut tx,
            Author {
                uuid: author.uuid,
                name: author.name,
                biography: author.biography,
                created_at: now,
                updated_at: now,
            },
        )?;

        tx.commit();

        Ok(created)
    }

    #[tracing::instrument(name = "catalog.service.attach_discount", skip(self, discount), err)]
    async fn attach_discount(
        &self,
        book: BookUuid,
        discount: NewDiscount,
        now: Timestamp,
    ) -> Result<Book, CatalogServiceError> {
        let discount = BulkDiscount::new(
            discount.min_quantity,
            discount.percentage,
            discount.starts_at,
            discount.ends_at,
        )?;

        let mut tx = self.db.begin().await;

        let mut row = self.books.get_book(&tx, book)?;

        if row.active_discount.is_some() {
            return Err(CatalogServiceError::DuplicateDiscount);
        }

        row.active_discount = Some(discount);
        row.updated_at = now;

        let updated = self.books.update_book(&mut tx, row)?;

        tx.commit();

        info!(book_uuid = %updated.uuid, "attached bulk discount");

        Ok(updated)
    }

    async fn remove_discount(
        &self,
        book: BookUuid,
        now: Timestamp,
    ) -> Result<Book, CatalogServiceError> {
        let mut tx = self.db.begin().await;

        let mut row = self.books.get_book(&tx, book)?;

        row.active_discount = None;
        row.updated_at = now;

        let updated = self.books.update_book(&mut tx, row)?;

        tx.commit();

        Ok(updated)
    }

    async fn discount_for_book(
        &self,
        book: BookUuid,
    ) -> Result<Option<BulkDiscount>, CatalogServiceError> {
        let tx = self.db.begin().await;

        Ok(self.books.get_book(&tx, book)?.active_discount)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Creates a book; the slug is generated from the title when absent.
    async fn create_book(
        &self,
        book: NewBook,
        now: Timestamp,
    ) -> Result<Book, CatalogServiceError>;

    /// Retrieves a single book.
    async fn get_book(&self, book: BookUuid) -> Result<Book, CatalogServiceError>;

    /// Removes a book from the catalog.
    async fn delete_book(&self, book: BookUuid) -> Result<(), CatalogServiceError>;

    /// Creates a category.
    async fn create_category(
        &self,
        category: NewCategory,
        now: Timestamp,
    ) -> Result<Category, CatalogServiceError>;

    /// Creates an author.
    async fn create_author(
        &self,
        author: NewAuthor,
        now: Timestamp,
    ) -> Result<Author, CatalogServiceError>;

    /// Attaches the book's single bulk discount.
    ///
    /// A book already holding a discount rejects a second one; replace by
    /// removing the current discount first.
    async fn attach_discount(
        &self,
        book: BookUuid,
        discount: NewDiscount,
        now: Timestamp,
    ) -> Result<Book, CatalogServiceError>;

    /// Detaches the book's active discount, if any.
    async fn remove_discount(
        &self,
        book: BookUuid,
        now: Timestamp,
    ) -> Result<Book, CatalogServiceError>;

    /// The book's current candidate discount, active or not.
    async fn discount_for_book(
        &self,
        book: BookUuid,
    ) -> Result<Option<BulkDiscount>, CatalogServiceError>;
}

/// Lowercases and hyphenates a title into a URL slug.
fn slugify(value: &str) -> String {
    value
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
