//! Catalog Repository

use crate::{
    domain::catalog::models::{Author, Book, BookUuid, Category},
    store::{StoreError, Transaction},
};

#[derive(Debug, Clone, Default)]
pub(crate) struct BooksRepository;

impl BooksRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn insert_book(
        &self,
        tx: &mut Transaction,
        book: Book,
    ) -> Result<Book, StoreError> {
        let rows = tx.rows();

        if rows.books.contains_key(&book.uuid) {
            return Err(StoreError::UniqueViolation);
        }

        if rows
            .books
            .values()
            .any(|existing| existing.slug == book.slug || existing.isbn == book.isbn)
        {
            return Err(StoreError::UniqueViolation);
        }

        if let Some(category) = book.category
            && !rows.categories.contains_key(&category)
        {
            return Err(StoreError::ForeignKeyViolation);
        }

        if book
            .authors
            .iter()
            .any(|author| !rows.authors.contains_key(author))
        {
            return Err(StoreError::ForeignKeyViolation);
        }

        tx.rows_mut().books.insert(book.uuid, book.clone());

        Ok(book)
    }

    pub(crate) fn get_book(
        &self,
        tx: &Transaction,
        book: BookUuid,
    ) -> Result<Book, StoreError> {
        tx.rows()
            .books
            .get(&book)
            .cloned()
            .ok_or(StoreError::RowNotFound)
    }

    pub(crate) fn update_book(
        &self,
        tx: &mut Transaction,
        book: Book,
    ) -> Result<Book, StoreError> {
        if !tx.rows().books.contains_key(&book.uuid) {
            return Err(StoreError::RowNotFound);
        }

        tx.rows_mut().books.insert(book.uuid, book.clone());

        Ok(book)
    }

    pub(crate) fn delete_book(
        &self,
        tx: &mut Transaction,
        book: BookUuid,
    ) -> Result<u64, StoreError> {
        Ok(u64::from(tx.rows_mut().books.remove(&book).is_some()))
    }

    pub(crate) fn insert_category(
        &self,
        tx: &mut Transaction,
        category: Category,
    ) -> Result<Category, StoreError> {
        let rows = tx.rows();

        if rows.categories.contains_key(&category.uuid)
            || rows
                .categories
                .values()
                .any(|existing| existing.name == category.name || existing.slug == category.slug)
        {
            return Err(StoreError::UniqueViolation);
        }

        tx.rows_mut()
            .categories
            .insert(category.uuid, category.clone());

        Ok(category)
    }

    pub(crate) fn insert_author(
        &self,
        tx: &mut Transaction,
        author: Author,
    ) -> Result<Author, StoreError> {
        if tx.rows().authors.contains_key(&author.uuid) {
            return Err(StoreError::UniqueViolation);
        }

        tx.rows_mut().authors.insert(author.uuid, author.clone());

        Ok(author)
    }

}
