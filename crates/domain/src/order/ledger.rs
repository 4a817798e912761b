use common::OrderId;

use super::Order;
use crate::error::{DomainError, Result};

/// Append-only record of placed orders.
///
/// Hands out strictly increasing order ids. An id is never handed out twice
/// during the ledger's lifetime, even if the order it was meant for is later
/// removed by a rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLedger {
    orders: Vec<Order>,
    // None once `u64::MAX` has been used.
    next_id: Option<OrderId>,
}

impl OrderLedger {
    /// Creates an empty ledger whose first id is 1.
    pub fn new() -> Self {
        Self {
            orders: Vec::new(),
            next_id: Some(OrderId::FIRST),
        }
    }

    /// Restores a ledger from previously persisted orders.
    ///
    /// The id counter resumes at the highest existing id plus one.
    pub fn from_orders(orders: Vec<Order>) -> Self {
        let next_id = orders
            .iter()
            .map(|o| o.id)
            .max()
            .map_or(Some(OrderId::FIRST), |id| id.next());
        Self { orders, next_id }
    }

    /// Returns a fresh id and advances the counter.
    pub fn next_id(&mut self) -> Result<OrderId> {
        let id = self.next_id.ok_or(DomainError::OrderIdsExhausted)?;
        self.next_id = id.next();
        Ok(id)
    }

    /// Returns the id the next call to [`next_id`](Self::next_id) will hand out.
    pub fn peek_next_id(&self) -> Option<OrderId> {
        self.next_id
    }

    /// Appends an order. No validation or deduplication is performed.
    pub fn append(&mut self, order: Order) {
        if self.next_id.is_some_and(|next| order.id >= next) {
            self.next_id = order.id.next();
        }
        self.orders.push(order);
    }

    /// Removes an order, returning it if it was present.
    pub fn remove(&mut self, id: OrderId) -> Option<Order> {
        let index = self.orders.iter().rposition(|o| o.id == id)?;
        Some(self.orders.remove(index))
    }

    /// Returns all orders in insertion order.
    pub fn list_orders(&self) -> &[Order] {
        &self.orders
    }

    /// Looks up an order by id.
    pub fn get_order(&self, id: OrderId) -> Result<&Order> {
        self.orders
            .iter()
            .find(|o| o.id == id)
            .ok_or(DomainError::OrderNotFound(id))
    }

    /// Returns the number of orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Returns true if no order has been placed.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Default for OrderLedger {
    fn default() -> Self {
        Self::new()
    }
}
