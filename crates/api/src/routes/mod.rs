//! HTTP route handlers.

pub mod cart;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;

use checkout::CheckoutCoordinator;
use storage::KeyValueStore;

/// Shared application state accessible from all handlers.
pub struct AppState<S: KeyValueStore> {
    pub coordinator: CheckoutCoordinator<S>,
}

impl<S: KeyValueStore> AppState<S> {
    /// Returns the shop handle used by the read endpoints.
    pub fn shop(&self) -> &checkout::Shop {
        self.coordinator.shop()
    }
}
