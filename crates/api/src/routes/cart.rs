//! Advisory cart endpoints, used by the storefront before checkout.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use common::ProductId;
use domain::{CartItem, Product};
use serde::{Deserialize, Serialize};
use storage::KeyValueStore;

use super::AppState;
use crate::error::ApiError;

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct ValidateCartRequest {
    #[serde(default)]
    pub items: Vec<CartItem>,
}

#[derive(Serialize)]
pub struct AddToCartResponse {
    pub success: bool,
    pub message: &'static str,
    pub product: Product,
    pub quantity: u32,
}

#[derive(Serialize)]
pub struct CartValidationResponse {
    pub success: bool,
    pub valid: bool,
    pub errors: Vec<String>,
}

/// POST /api/cart/add: check that a product can go into the cart.
///
/// Nothing is reserved; the cart lives on the client.
#[tracing::instrument(skip(state, payload))]
pub async fn add<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<AddToCartRequest>, JsonRejection>,
) -> Result<Json<AddToCartResponse>, ApiError> {
    let Json(req) = payload?;
    let product = state
        .shop()
        .check_cart_item(req.product_id, req.quantity)
        .await?;

    Ok(Json(AddToCartResponse {
        success: true,
        message: "Product added to cart",
        product,
        quantity: req.quantity,
    }))
}

/// POST /api/cart/validate: report every problem with a cart.
#[tracing::instrument(skip(state, payload))]
pub async fn validate<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<ValidateCartRequest>, JsonRejection>,
) -> Result<Json<CartValidationResponse>, ApiError> {
    let Json(req) = payload?;
    let errors = state.shop().validate_cart(&req.items).await;

    Ok(Json(CartValidationResponse {
        success: true,
        valid: errors.is_empty(),
        errors,
    }))
}
