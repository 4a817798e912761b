//! Mapping between the shop state and the key-value store.

use std::time::Duration;

use domain::{Catalog, Order, OrderLedger, Product};
use storage::{KeyValueStore, KeyValueStoreExt, StorageError};

use crate::error::{CheckoutError, Result};
use crate::shop::ShopState;

/// Key holding the product list.
pub const PRODUCTS_KEY: &str = "products";

/// Key holding the order list.
pub const ORDERS_KEY: &str = "orders";

/// How hard a flush is retried before the checkout gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushPolicy {
    /// Total number of attempts, at least 1.
    pub attempts: u32,
    /// Pause between attempts.
    pub backoff: Duration,
}

impl FlushPolicy {
    /// Creates a policy; `attempts` is clamped to at least 1.
    pub fn new(attempts: u32, backoff: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            backoff,
        }
    }

    /// A single attempt with no retries.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for FlushPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(50))
    }
}

/// Saves and restores the catalog and the ledger.
#[derive(Debug, Clone)]
pub struct ShopPersistence<S> {
    store: S,
    policy: FlushPolicy,
}

impl<S: KeyValueStore> ShopPersistence<S> {
    /// Creates a persistence adapter over `store`.
    pub fn new(store: S, policy: FlushPolicy) -> Self {
        Self { store, policy }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the flush policy.
    pub fn policy(&self) -> FlushPolicy {
        self.policy
    }

    /// Loads the shop state.
    ///
    /// A missing key is seeded with its default (the seed catalog, or no
    /// orders) and saved right away so the next start finds it.
    #[tracing::instrument(skip(self))]
    pub async fn restore(&self) -> Result<ShopState> {
        let products: Option<Vec<Product>> = self.store.load_as(PRODUCTS_KEY).await?;
        let catalog = match products {
            Some(products) => Catalog::from_products(products),
            None => {
                let catalog = Catalog::seeded();
                self.store
                    .save_as(PRODUCTS_KEY, catalog.list_products())
                    .await?;
                tracing::info!(products = catalog.len(), "seeded default catalog");
                catalog
            }
        };

        let orders: Option<Vec<Order>> = self.store.load_as(ORDERS_KEY).await?;
        let ledger = match orders {
            Some(orders) => OrderLedger::from_orders(orders),
            None => {
                let ledger = OrderLedger::new();
                self.store.save_as(ORDERS_KEY, ledger.list_orders()).await?;
                tracing::info!("initialized empty order ledger");
                ledger
            }
        };

        tracing::info!(
            products = catalog.len(),
            orders = ledger.len(),
            next_order_id = ?ledger.peek_next_id(),
            "shop state restored"
        );
        Ok(ShopState::new(catalog, ledger))
    }

    /// Saves the catalog, then the ledger.
    pub async fn flush(
        &self,
        catalog: &Catalog,
        ledger: &OrderLedger,
    ) -> std::result::Result<(), StorageError> {
        self.store
            .save_as(PRODUCTS_KEY, catalog.list_products())
            .await?;
        self.store.save_as(ORDERS_KEY, ledger.list_orders()).await?;
        Ok(())
    }

    /// Flushes with the configured number of attempts.
    ///
    /// Returns `PersistenceFailure` carrying the last error once every
    /// attempt has failed.
    #[tracing::instrument(skip(self, catalog, ledger))]
    pub async fn flush_with_retry(&self, catalog: &Catalog, ledger: &OrderLedger) -> Result<()> {
        let mut attempt = 1;
        loop {
            match self.flush(catalog, ledger).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    metrics::counter!("persistence_flush_failures_total").increment(1);
                    if attempt >= self.policy.attempts {
                        tracing::error!(attempt, error = %e, "flush failed, giving up");
                        return Err(CheckoutError::PersistenceFailure {
                            attempts: attempt,
                            source: e,
                        });
                    }
                    tracing::warn!(attempt, error = %e, "flush failed, retrying");
                    tokio::time::sleep(self.policy.backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}
