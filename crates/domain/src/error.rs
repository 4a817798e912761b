//! Domain error types.

use common::{OrderId, ProductId};
use thiserror::Error;

/// Errors that can occur during catalog, ledger and checkout operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The request is missing required data.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// No product has the given id.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    /// The product does not have enough stock for the request.
    #[error(
        "Insufficient stock for product {product_name}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        product_name: String,
        requested: u32,
        available: u32,
    },

    /// No order has the given id.
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),

    /// The ledger has handed out the largest representable order id.
    #[error("No order ids left")]
    OrderIdsExhausted,
}

/// Missing or malformed order data, detected before the catalog is consulted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Customer name is required")]
    CustomerNameRequired,

    #[error("Email is required")]
    EmailRequired,

    #[error("Order has no items")]
    NoItems,

    /// Invalid quantity.
    #[error("Invalid quantity for product {product_id}: must be greater than 0")]
    InvalidQuantity { product_id: ProductId },
}

/// Convenience type alias for domain results.
pub type Result<T> = std::result::Result<T, DomainError>;
