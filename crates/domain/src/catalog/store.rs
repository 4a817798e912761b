use std::collections::HashMap;

use common::ProductId;
use serde::{Deserialize, Serialize};

use super::product::{Product, seed_products};
use crate::cart::CartItem;
use crate::error::{DomainError, Result, ValidationError};
use crate::order::OrderLineItem;

/// The set of purchasable products and their live stock counts.
///
/// Products keep their insertion order. Lookups are linear scans; a catalog
/// holds a few dozen products at most.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Creates a catalog holding the default seed products.
    pub fn seeded() -> Self {
        Self {
            products: seed_products(),
        }
    }

    /// Restores a catalog from previously persisted products.
    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Returns all products in insertion order.
    pub fn list_products(&self) -> &[Product] {
        &self.products
    }

    /// Returns the number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Looks up a product by id.
    pub fn get_product(&self, id: ProductId) -> Result<&Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or(DomainError::ProductNotFound(id))
    }

    fn get_product_mut(&mut self, id: ProductId) -> Result<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DomainError::ProductNotFound(id))
    }

    /// Takes `quantity` units out of a product's stock.
    ///
    /// Fails without touching the product if it has fewer than `quantity`
    /// units. `quantity` is not checked for zero; callers validate it.
    pub fn decrement_stock(&mut self, id: ProductId, quantity: u32) -> Result<()> {
        let product = self.get_product_mut(id)?;
        if !product.has_stock_for(quantity) {
            return Err(DomainError::InsufficientStock {
                product_id: id,
                product_name: product.name.clone(),
                requested: quantity,
                available: product.stock,
            });
        }

        product.stock -= quantity;
        tracing::debug!(product_id = %id, quantity, remaining = product.stock, "stock decremented");
        Ok(())
    }

    /// Puts `quantity` units back into a product's stock.
    pub fn restock(&mut self, id: ProductId, quantity: u32) -> Result<()> {
        let product = self.get_product_mut(id)?;
        product.stock = product.stock.saturating_add(quantity);
        tracing::debug!(product_id = %id, quantity, stock = product.stock, "stock restored");
        Ok(())
    }

    /// Checks that every item can be served from current stock.
    ///
    /// Items are checked in the given order and the first failure is
    /// returned. A zero quantity is invalid. Quantities for the same product on several lines are
    /// summed before comparing against stock. On success, returns one line
    /// item per input item carrying a snapshot of the product's name, price
    /// and unit. Never mutates the catalog.
    pub fn check_availability(&self, items: &[CartItem]) -> Result<Vec<OrderLineItem>> {
        let mut requested: HashMap<ProductId, u32> = HashMap::new();
        let mut lines = Vec::with_capacity(items.len());

        for item in items {
            if item.quantity == 0 {
                return Err(ValidationError::InvalidQuantity {
                    product_id: item.product_id,
                }
                .into());
            }
            let product = self.get_product(item.product_id)?;
            let total = requested.entry(item.product_id).or_insert(0);
            *total = total.saturating_add(item.quantity);

            if !product.has_stock_for(*total) {
                return Err(DomainError::InsufficientStock {
                    product_id: product.id,
                    product_name: product.name.clone(),
                    requested: *total,
                    available: product.stock,
                });
            }

            lines.push(OrderLineItem::snapshot(product, item.quantity));
        }

        Ok(lines)
    }
}
