//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::ProductId;
use domain::Product;
use serde::Serialize;
use storage::KeyValueStore;

use super::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub products: Vec<Product>,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

/// GET /api/products: list the catalog with live stock levels.
#[tracing::instrument(skip(state))]
pub async fn list<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<ProductListResponse> {
    Json(ProductListResponse {
        success: true,
        products: state.shop().list_products().await,
    })
}

/// GET /api/products/{id}: load a single product.
#[tracing::instrument(skip(state))]
pub async fn get<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product_id: ProductId = id
        .parse()
        .map_err(|_| ApiError::NotFound(format!("Product {id} not found")))?;
    let product = state.shop().get_product(product_id).await?;

    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}
