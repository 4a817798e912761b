//! Order placement and lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use checkout::PlaceOrder;
use common::{OrderId, ProductId};
use domain::{CartItem, Money, Order};
use serde::{Deserialize, Serialize};
use storage::KeyValueStore;

use super::AppState;
use crate::error::ApiError;

// -- Request types --

/// Body of `POST /api/orders`.
///
/// Missing customer fields and items are accepted here and rejected by
/// checkout validation, so the client gets a domain message rather than a
/// parse error.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub customer_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub items: Vec<OrderItemRequest>,
    pub total_price: Option<Money>,
}

/// One requested line. Any name, price or unit the client sends is ignored;
/// line items are always filled from the catalog.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl From<PlaceOrderRequest> for PlaceOrder {
    fn from(req: PlaceOrderRequest) -> Self {
        let items = req
            .items
            .into_iter()
            .map(|item| CartItem {
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .collect();

        PlaceOrder {
            customer_name: req.customer_name,
            email: req.email,
            phone: req.phone,
            items,
            total_price: req.total_price,
        }
    }
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderPlacedResponse {
    pub success: bool,
    pub message: &'static str,
    pub order: Order,
}

#[derive(Serialize)]
pub struct OrderListResponse {
    pub success: bool,
    pub orders: Vec<Order>,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub success: bool,
    pub order: Order,
}

// -- Handlers --

/// POST /api/orders: place an order.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderPlacedResponse>), ApiError> {
    let Json(req) = payload?;
    let order = state.coordinator.place_order(req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderPlacedResponse {
            success: true,
            message: "Order placed successfully",
            order,
        }),
    ))
}

/// GET /api/orders: list every placed order.
#[tracing::instrument(skip(state))]
pub async fn list<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<OrderListResponse> {
    Json(OrderListResponse {
        success: true,
        orders: state.shop().list_orders().await,
    })
}

/// GET /api/orders/{id}: load a single order.
#[tracing::instrument(skip(state))]
pub async fn get<S: KeyValueStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id: OrderId = id
        .parse()
        .map_err(|_| ApiError::NotFound(format!("Order {id} not found")))?;
    let order = state.shop().get_order(order_id).await?;

    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}
