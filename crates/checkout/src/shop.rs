//! Shared handle to the catalog and order ledger.

use std::sync::Arc;

use common::{OrderId, ProductId};
use domain::{CartItem, Catalog, DomainError, Order, OrderLedger, Product};
use tokio::sync::{Mutex, MutexGuard};

/// The mutable state of the shop.
#[derive(Debug, Clone, Default)]
pub struct ShopState {
    pub catalog: Catalog,
    pub ledger: OrderLedger,
}

impl ShopState {
    /// Creates a state from a catalog and a ledger.
    pub fn new(catalog: Catalog, ledger: OrderLedger) -> Self {
        Self { catalog, ledger }
    }
}

/// Cloneable handle to the shop state.
///
/// Every access goes through one mutex. Checkout holds it from validation
/// until the flush has finished, which makes checkout the single writer;
/// read operations take it briefly and return owned copies.
#[derive(Debug, Clone, Default)]
pub struct Shop {
    state: Arc<Mutex<ShopState>>,
}

impl Shop {
    /// Wraps the given state.
    pub fn new(state: ShopState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Acquires exclusive access to the state.
    pub async fn lock(&self) -> MutexGuard<'_, ShopState> {
        self.state.lock().await
    }

    /// Returns all products in catalog order.
    pub async fn list_products(&self) -> Vec<Product> {
        self.lock().await.catalog.list_products().to_vec()
    }

    /// Looks up a product by id.
    pub async fn get_product(&self, id: ProductId) -> Result<Product, DomainError> {
        self.lock().await.catalog.get_product(id).cloned()
    }

    /// Returns all orders in placement order.
    pub async fn list_orders(&self) -> Vec<Order> {
        self.lock().await.ledger.list_orders().to_vec()
    }

    /// Looks up an order by id.
    pub async fn get_order(&self, id: OrderId) -> Result<Order, DomainError> {
        self.lock().await.ledger.get_order(id).cloned()
    }

    /// Returns one message per problem with the cart; empty if it can be ordered.
    pub async fn validate_cart(&self, items: &[CartItem]) -> Vec<String> {
        domain::validate_cart(&self.lock().await.catalog, items)
    }

    /// Checks that `quantity` units of a product can be put in a cart.
    pub async fn check_cart_item(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Product, DomainError> {
        let state = self.lock().await;
        domain::check_cart_item(&state.catalog, product_id, quantity).cloned()
    }
}
