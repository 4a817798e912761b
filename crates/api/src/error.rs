//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::CheckoutError;
use domain::DomainError;

/// API-level error type that maps to HTTP responses.
///
/// Every variant renders as `{"success": false, "message": ...}`.
#[derive(Debug)]
pub enum ApiError {
    /// Resource or route not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Domain rule violation.
    Domain(DomainError),
    /// Checkout failure.
    Checkout(CheckoutError),
}

impl ApiError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Checkout(err) => checkout_error_to_response(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(error = %message, "internal server error");
        }

        let body = serde_json::json!({ "success": false, "message": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    let status = match &err {
        DomainError::Validation(_) | DomainError::InsufficientStock { .. } => {
            StatusCode::BAD_REQUEST
        }
        DomainError::ProductNotFound(_) | DomainError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        DomainError::OrderIdsExhausted => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, String) {
    match err {
        CheckoutError::Domain(err) => domain_error_to_response(err),
        CheckoutError::PersistenceFailure { .. } | CheckoutError::Storage(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use common::ProductId;
    use domain::ValidationError;
    use storage::StorageError;

    use super::*;

    #[test]
    fn test_validation_and_stock_errors_are_bad_requests() {
        let (status, _) = ApiError::from(DomainError::from(ValidationError::NoItems))
            .status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, message) = ApiError::from(DomainError::InsufficientStock {
            product_id: ProductId::new(1),
            product_name: "Bananas".to_string(),
            requested: 5,
            available: 1,
        })
        .status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("Bananas"));
    }

    #[test]
    fn test_unknown_product_is_not_found() {
        let err = CheckoutError::Domain(DomainError::ProductNotFound(ProductId::new(999)));
        let (status, message) = ApiError::from(err).status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(message.contains("999"));
    }

    #[test]
    fn test_persistence_failure_is_internal() {
        let err = CheckoutError::PersistenceFailure {
            attempts: 3,
            source: StorageError::Unavailable("disk full".to_string()),
        };
        let (status, message) = ApiError::from(err).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(message.contains("3 attempt"));
    }

    #[test]
    fn test_server_side_failures_map_to_internal() {
        let storage = CheckoutError::Storage(StorageError::Unavailable("offline".to_string()));
        let (status, _) = ApiError::from(storage).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = ApiError::from(DomainError::OrderIdsExhausted).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
