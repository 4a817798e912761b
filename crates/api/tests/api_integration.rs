//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use checkout::FlushPolicy;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use storage::{InMemoryStore, JsonFileStore, KeyValueStore};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

async fn setup_with_store<S: KeyValueStore + 'static>(
    store: S,
) -> (axum::Router, Arc<api::routes::AppState<S>>) {
    let state = api::create_state(store, FlushPolicy::no_retry())
        .await
        .unwrap();
    let app = api::create_app(state.clone(), get_metrics_handle());
    (app, state)
}

async fn setup() -> axum::Router {
    setup_with_store(InMemoryStore::new()).await.0
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn order_body(product_id: u64, quantity: u32) -> Value {
    json!({
        "customerName": "Amina Njoroge",
        "email": "amina@example.com",
        "phone": "+254700000000",
        "items": [{ "productId": product_id, "quantity": quantity }]
    })
}

async fn stock_of(app: &axum::Router, product_id: u64) -> u64 {
    let (_, json) = send(app, get(&format!("/api/products/{product_id}"))).await;
    json["product"]["stock"].as_u64().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup().await;

    let (status, json) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OK");
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn test_list_products_returns_seed_catalog() {
    let app = setup().await;

    let (status, json) = send(&app, get("/api/products")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let products = json["products"].as_array().unwrap();
    assert_eq!(products.len(), 8);
    assert_eq!(products[0]["id"], 1);
    assert_eq!(products[0]["name"], "Bananas");
    assert_eq!(products[0]["price"], 5.99);
    assert_eq!(products[0]["stock"], 100);
}

#[tokio::test]
async fn test_get_product() {
    let app = setup().await;

    let (status, json) = send(&app, get("/api/products/3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["product"]["name"], "Mango");
    assert_eq!(json["product"]["unit"], "kg");
}

#[tokio::test]
async fn test_get_unknown_product() {
    let app = setup().await;

    let (status, json) = send(&app, get("/api/products/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert!(json["message"].as_str().unwrap().contains("999"));

    let (status, json) = send(&app, get("/api/products/not-a-number")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_create_order() {
    let app = setup().await;

    let (status, json) = send(&app, post_json("/api/orders", &order_body(1, 30))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Order placed successfully");

    let order = &json["order"];
    assert_eq!(order["id"], 1);
    assert_eq!(order["customerName"], "Amina Njoroge");
    assert_eq!(order["status"], "pending");
    assert_eq!(order["totalPrice"], 179.7);
    assert_eq!(order["items"][0]["name"], "Bananas");
    assert_eq!(order["items"][0]["price"], 5.99);
    assert!(order["createdAt"].is_string());

    assert_eq!(stock_of(&app, 1).await, 70);
}

#[tokio::test]
async fn test_create_and_get_order() {
    let app = setup().await;

    send(&app, post_json("/api/orders", &order_body(2, 1))).await;
    send(&app, post_json("/api/orders", &order_body(3, 2))).await;

    let (status, json) = send(&app, get("/api/orders/2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["order"]["id"], 2);
    assert_eq!(json["order"]["items"][0]["productId"], 3);

    let (status, json) = send(&app, get("/api/orders")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<u64> = json["orders"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_get_nonexistent_order() {
    let app = setup().await;

    let (status, json) = send(&app, get("/api/orders/42")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);

    let (status, _) = send(&app, get("/api/orders/abc")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_exceeding_stock_is_rejected() {
    let app = setup().await;

    let (status, _) = send(&app, post_json("/api/orders", &order_body(1, 30))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = send(&app, post_json("/api/orders", &order_body(1, 80))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["message"].as_str().unwrap().contains("Bananas"));

    assert_eq!(stock_of(&app, 1).await, 70);
    let (_, json) = send(&app, get("/api/orders")).await;
    assert_eq!(json["orders"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_order_with_unknown_product() {
    let app = setup().await;

    let (status, json) = send(&app, post_json("/api/orders", &order_body(999, 1))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["message"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn test_order_missing_customer_fields() {
    let app = setup().await;

    let body = json!({
        "customerName": "",
        "email": "amina@example.com",
        "items": [{ "productId": 999, "quantity": 1 }]
    });
    let (status, json) = send(&app, post_json("/api/orders", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Customer name is required");

    let (status, json) = send(&app, post_json("/api/orders", &json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_order_second_item_unavailable_changes_nothing() {
    let app = setup().await;

    let body = json!({
        "customerName": "Kofi",
        "email": "kofi@example.com",
        "items": [
            { "productId": 1, "quantity": 10 },
            { "productId": 7, "quantity": 41 }
        ]
    });
    let (status, _) = send(&app, post_json("/api/orders", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(stock_of(&app, 1).await, 100);
    assert_eq!(stock_of(&app, 7).await, 40);
}

#[tokio::test]
async fn test_client_prices_are_ignored() {
    let app = setup().await;

    let body = json!({
        "customerName": "Kofi",
        "email": "kofi@example.com",
        "items": [{ "productId": 3, "quantity": 2, "name": "Free mango", "price": 0.01 }],
        "totalPrice": 0.02
    });
    let (status, json) = send(&app, post_json("/api/orders", &body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["order"]["items"][0]["name"], "Mango");
    assert_eq!(json["order"]["totalPrice"], 25.98);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = setup().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/orders")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["message"].is_string());
}

#[tokio::test]
async fn test_persistence_failure_returns_500_and_rolls_back() {
    let store = InMemoryStore::new();
    let (app, _) = setup_with_store(store.clone()).await;

    store.set_fail_on_save(true).await;
    let (status, json) = send(&app, post_json("/api/orders", &order_body(1, 5))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);

    store.clear_failures().await;
    assert_eq!(stock_of(&app, 1).await, 100);
    let (_, json) = send(&app, get("/api/orders")).await;
    assert!(json["orders"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cart_add() {
    let app = setup().await;

    let (status, json) = send(
        &app,
        post_json("/api/cart/add", &json!({ "productId": 2, "quantity": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["product"]["name"], "Coconuts");
    assert_eq!(json["quantity"], 3);

    // nothing is reserved
    assert_eq!(stock_of(&app, 2).await, 50);
}

#[tokio::test]
async fn test_cart_add_defaults_quantity_to_one() {
    let app = setup().await;

    let (status, json) = send(&app, post_json("/api/cart/add", &json!({ "productId": 5 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["quantity"], 1);
}

#[tokio::test]
async fn test_cart_add_failures() {
    let app = setup().await;

    let (status, _) = send(
        &app,
        post_json("/api/cart/add", &json!({ "productId": 999, "quantity": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = send(
        &app,
        post_json("/api/cart/add", &json!({ "productId": 7, "quantity": 41 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("Passion fruit"));
}

#[tokio::test]
async fn test_cart_validate() {
    let app = setup().await;

    let body = json!({ "items": [{ "productId": 1, "quantity": 2 }] });
    let (status, json) = send(&app, post_json("/api/cart/validate", &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["valid"], true);
    assert!(json["errors"].as_array().unwrap().is_empty());

    let body = json!({
        "items": [
            { "productId": 999, "quantity": 1 },
            { "productId": 7, "quantity": 41 }
        ]
    });
    let (status, json) = send(&app, post_json("/api/cart/validate", &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["valid"], false);
    assert_eq!(json["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = setup().await;

    let (status, json) = send(&app, get("/api/bananas")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Endpoint not found");

    let (status, _) = send(&app, get("/nowhere")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup().await;

    send(&app, post_json("/api/orders", &order_body(4, 1))).await;

    let response = app.clone().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("checkout_attempts_total"));
}

#[tokio::test]
async fn test_orders_survive_restart_on_file_store() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = JsonFileStore::open(dir.path()).await.unwrap();
        let (app, _) = setup_with_store(store).await;
        let (status, _) = send(&app, post_json("/api/orders", &order_body(8, 10))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let store = JsonFileStore::open(dir.path()).await.unwrap();
    let (app, _) = setup_with_store(store).await;

    assert_eq!(stock_of(&app, 8).await, 80);
    let (status, json) = send(&app, post_json("/api/orders", &order_body(8, 1))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["order"]["id"], 2);
}
