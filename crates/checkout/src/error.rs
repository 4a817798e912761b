//! Checkout error types.

use domain::DomainError;
use storage::StorageError;
use thiserror::Error;

/// Errors that can occur while placing an order or restoring shop state.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The order was rejected by validation or the catalog.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The order was applied in memory but could not be flushed to storage.
    /// The in-memory changes have been rolled back.
    #[error("Failed to persist order after {attempts} attempt(s): {source}")]
    PersistenceFailure {
        attempts: u32,
        #[source]
        source: StorageError,
    },

    /// Storage error outside of a checkout, e.g. while restoring state.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CheckoutError {
    /// Returns true if the request itself was at fault.
    pub fn is_rejection(&self) -> bool {
        matches!(self, CheckoutError::Domain(e) if *e != DomainError::OrderIdsExhausted)
    }

    /// Returns a short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            CheckoutError::Domain(DomainError::Validation(_)) => "validation",
            CheckoutError::Domain(DomainError::ProductNotFound(_)) => "product_not_found",
            CheckoutError::Domain(DomainError::InsufficientStock { .. }) => "insufficient_stock",
            CheckoutError::Domain(DomainError::OrderNotFound(_)) => "order_not_found",
            CheckoutError::Domain(DomainError::OrderIdsExhausted) => "order_ids_exhausted",
            CheckoutError::PersistenceFailure { .. } => "persistence_failure",
            CheckoutError::Storage(_) => "storage",
        }
    }
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
