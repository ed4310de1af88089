//! Orders service errors.

use thiserror::Error;

use crate::store::StoreError;

use super::lifecycle::PaymentRequired;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("order already exists")]
    AlreadyExists,

    #[error("product not found")]
    ProductNotFound,

    #[error("cannot create an order from an empty cart")]
    EmptyCart,

    #[error(transparent)]
    PaymentRequired(#[from] PaymentRequired),
}

impl From<StoreError> for OrdersServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::RowNotFound => Self::NotFound,
            StoreError::UniqueViolation => Self::AlreadyExists,
            StoreError::ForeignKeyViolation => Self::ProductNotFound,
        }
    }
}
