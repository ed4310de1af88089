//! Carts service errors.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("product not found")]
    ProductNotFound,

    #[error("cart item not found")]
    NotFound,

    #[error("cart entry already exists")]
    AlreadyExists,

    #[error("quantity must be at least one")]
    InvalidQuantity,
}

impl From<StoreError> for CartsServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::RowNotFound => Self::NotFound,
            StoreError::UniqueViolation => Self::AlreadyExists,
            StoreError::ForeignKeyViolation => Self::ProductNotFound,
        }
    }
}
