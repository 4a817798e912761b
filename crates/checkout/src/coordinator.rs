//! Checkout coordinator: the one operation that mutates the shop.

use std::time::Instant;

use domain::{DomainError, Order, OrderLineItem};
use storage::KeyValueStore;

use crate::command::PlaceOrder;
use crate::error::{CheckoutError, Result};
use crate::persistence::{FlushPolicy, ShopPersistence};
use crate::shop::{Shop, ShopState};
use crate::state::{CheckoutAttempt, CheckoutState};

/// Places orders against the shop state.
///
/// A checkout runs in three phases while holding the shop lock:
/// 1. Validate customer fields and every item against current stock
/// 2. Apply: decrement stock for every line and append the order
/// 3. Persist: flush catalog and ledger, retrying per the flush policy
///
/// A failure in phase 1 changes nothing. A failure in phase 3 rolls the
/// phase 2 changes back in reverse order before the error is returned.
pub struct CheckoutCoordinator<S: KeyValueStore> {
    shop: Shop,
    persistence: ShopPersistence<S>,
}

impl<S: KeyValueStore> CheckoutCoordinator<S> {
    /// Creates a coordinator over existing shop state.
    pub fn new(shop: Shop, store: S, policy: FlushPolicy) -> Self {
        Self {
            shop,
            persistence: ShopPersistence::new(store, policy),
        }
    }

    /// Restores shop state from `store` and creates a coordinator over it.
    pub async fn open(store: S, policy: FlushPolicy) -> Result<Self> {
        let persistence = ShopPersistence::new(store, policy);
        let state = persistence.restore().await?;
        Ok(Self {
            shop: Shop::new(state),
            persistence,
        })
    }

    /// Returns the shop handle for read access.
    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    /// Returns the persistence adapter.
    pub fn persistence(&self) -> &ShopPersistence<S> {
        &self.persistence
    }

    /// Validates, applies and persists an order.
    ///
    /// Returns the stored order once both catalog and ledger are durable.
    #[tracing::instrument(skip(self, cmd), fields(items = cmd.items.len()))]
    pub async fn place_order(&self, cmd: PlaceOrder) -> Result<Order> {
        metrics::counter!("checkout_attempts_total").increment(1);
        let started = Instant::now();
        let mut attempt = CheckoutAttempt::new();

        let result = self.run(&mut attempt, cmd).await;

        metrics::histogram!("checkout_duration_seconds").record(started.elapsed().as_secs_f64());
        match &result {
            Ok(order) => {
                metrics::counter!("orders_placed_total").increment(1);
                tracing::info!(
                    order_id = %order.id,
                    total = %order.total_price,
                    state = %attempt.state(),
                    "order placed"
                );
            }
            Err(e) => {
                metrics::counter!("checkout_rejected_total", "reason" => e.reason())
                    .increment(1);
                if e.is_rejection() {
                    tracing::info!(error = %e, state = %attempt.state(), "order rejected");
                } else {
                    tracing::error!(error = %e, state = %attempt.state(), "order not persisted");
                }
            }
        }
        result
    }

    async fn run(&self, attempt: &mut CheckoutAttempt, cmd: PlaceOrder) -> Result<Order> {
        // 1. Validate
        attempt.advance(CheckoutState::Validating);
        if let Err(e) = cmd.validate() {
            attempt.advance(CheckoutState::Rejected);
            return Err(DomainError::from(e).into());
        }

        let mut shop = self.shop.lock().await;
        let lines = match shop.catalog.check_availability(&cmd.items) {
            Ok(lines) => lines,
            Err(e) => {
                attempt.advance(CheckoutState::Rejected);
                return Err(e.into());
            }
        };

        // 2. Apply
        attempt.advance(CheckoutState::Applying);
        let order = match build_order(&mut shop, &cmd, lines) {
            Ok(order) => order,
            Err(e) => {
                attempt.advance(CheckoutState::Rejected);
                return Err(e);
            }
        };
        if let Err(e) = apply_stock(&mut shop, &order.items) {
            attempt.advance(CheckoutState::Rejected);
            return Err(e);
        }
        shop.ledger.append(order.clone());

        // 3. Persist
        match self
            .persistence
            .flush_with_retry(&shop.catalog, &shop.ledger)
            .await
        {
            Ok(()) => {
                attempt.advance(CheckoutState::Persisted);
                attempt.advance(CheckoutState::Accepted);
                Ok(order)
            }
            Err(e) => {
                attempt.advance(CheckoutState::PersistFailed);
                self.roll_back(&mut shop, &order).await;
                Err(e)
            }
        }
    }

    /// Undoes an applied order in reverse order of application.
    #[tracing::instrument(skip(self, shop, order), fields(order_id = %order.id))]
    async fn roll_back(&self, shop: &mut ShopState, order: &Order) {
        if shop.ledger.remove(order.id).is_none() {
            tracing::warn!("rolled back order missing from ledger");
        }
        for line in order.items.iter().rev() {
            if let Err(e) = shop.catalog.restock(line.product_id, line.quantity) {
                tracing::error!(product_id = %line.product_id, error = %e, "restock failed");
            }
        }

        // Disk may hold the products document from the failed flush.
        if let Err(e) = self.persistence.flush(&shop.catalog, &shop.ledger).await {
            tracing::warn!(error = %e, "could not re-flush rolled back state");
        }
        tracing::warn!("order rolled back");
    }
}

fn build_order(shop: &mut ShopState, cmd: &PlaceOrder, lines: Vec<OrderLineItem>) -> Result<Order> {
    let id = shop.ledger.next_id()?;
    let order = Order::pending(
        id,
        cmd.customer_name.trim(),
        cmd.email.trim(),
        cmd.phone.clone().unwrap_or_default(),
        lines,
    );

    if let Some(declared) = cmd.total_price
        && declared.abs_diff(order.total_price).cents() > 1
    {
        tracing::warn!(
            order_id = %id,
            declared = %declared,
            computed = %order.total_price,
            "client total differs from catalog prices, using computed total"
        );
    }
    Ok(order)
}

/// Decrements stock for every line. If a line fails, the lines already
/// applied are restocked before the error is returned.
///
/// Lines come from `check_availability` under the same lock, so a failure
/// here means the catalog changed underneath the checkout.
fn apply_stock(shop: &mut ShopState, lines: &[OrderLineItem]) -> Result<()> {
    for (applied, line) in lines.iter().enumerate() {
        if let Err(e) = shop.catalog.decrement_stock(line.product_id, line.quantity) {
            tracing::error!(product_id = %line.product_id, error = %e, "stock changed after validation");
            for done in lines[..applied].iter().rev() {
                if let Err(e) = shop.catalog.restock(done.product_id, done.quantity) {
                    tracing::error!(product_id = %done.product_id, error = %e, "restock failed");
                }
            }
            return Err(CheckoutError::from(e));
        }
    }
    Ok(())
}
