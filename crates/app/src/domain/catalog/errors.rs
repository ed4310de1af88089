//! Catalog service errors.

use folio::discounts::DiscountError;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CatalogServiceError {
    #[error("catalog entry already exists")]
    AlreadyExists,

    #[error("book not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("book already has an active bulk discount")]
    DuplicateDiscount,

    #[error("price must not be negative")]
    NegativePrice,

    #[error(transparent)]
    InvalidDiscount(#[from] DiscountError),
}

impl From<StoreError> for CatalogServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::RowNotFound => Self::NotFound,
            StoreError::UniqueViolation => Self::AlreadyExists,
            StoreError::ForeignKeyViolation => Self::InvalidReference,
        }
    }
}
