use chrono::{DateTime, Utc};
use common::{OrderId, ProductId};
use serde::{Deserialize, Serialize};

use super::OrderStatus;
use crate::{Money, Product};

/// One line of an order.
///
/// Name, price and unit are copied from the product when the order is
/// placed, so later catalog changes never alter historical orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: Money,
    pub unit: String,
}

impl OrderLineItem {
    /// Creates a line item from the product's current fields.
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            quantity,
            price: product.price,
            unit: product.unit.clone(),
        }
    }

    /// Returns the total price for this line (quantity * price).
    pub fn total_price(&self) -> Money {
        self.price.multiply(self.quantity)
    }
}

/// A placed order. Immutable once appended to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub items: Vec<OrderLineItem>,
    pub total_price: Money,
    #[serde(default)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a pending order stamped with the current time.
    ///
    /// The total is computed from the line items.
    pub fn pending(
        id: OrderId,
        customer_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        items: Vec<OrderLineItem>,
    ) -> Self {
        let total_price = Self::compute_total(&items);
        Self {
            id,
            customer_name: customer_name.into(),
            email: email.into(),
            phone: phone.into(),
            items,
            total_price,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Sums the line totals.
    pub fn compute_total(items: &[OrderLineItem]) -> Money {
        items.iter().map(OrderLineItem::total_price).sum()
    }

    /// Returns the number of units across all lines.
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}
