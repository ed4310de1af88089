//! Orders

pub mod errors;
pub mod lifecycle;
pub mod models;
mod repository;
pub mod service;

pub use errors::OrdersServiceError;
pub use lifecycle::{PaymentRequired, Transition};
pub use service::*;
