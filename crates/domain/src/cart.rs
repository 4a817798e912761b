//! Cart items and the advisory checks run before checkout.

use std::collections::HashMap;

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};
use crate::error::{DomainError, Result, ValidationError};

/// A product and the quantity a customer wants of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CartItem {
    /// Creates a new cart item.
    pub fn new(product_id: u64, quantity: u32) -> Self {
        Self {
            product_id: ProductId::new(product_id),
            quantity,
        }
    }
}

/// Checks a whole cart against the catalog without changing it.
///
/// Applies the same availability rule as checkout but keeps going after a
/// failure, returning one message per problem. An empty result means the
/// cart can be ordered as-is.
pub fn validate_cart(catalog: &Catalog, items: &[CartItem]) -> Vec<String> {
    let mut requested: HashMap<ProductId, u32> = HashMap::new();
    let mut errors = Vec::new();

    for item in items {
        if item.quantity == 0 {
            errors.push(
                DomainError::from(ValidationError::InvalidQuantity {
                    product_id: item.product_id,
                })
                .to_string(),
            );
            continue;
        }

        let product = match catalog.get_product(item.product_id) {
            Ok(product) => product,
            Err(e) => {
                errors.push(e.to_string());
                continue;
            }
        };

        let total = requested.entry(item.product_id).or_insert(0);
        *total = total.saturating_add(item.quantity);
        if !product.has_stock_for(*total) {
            errors.push(
                DomainError::InsufficientStock {
                    product_id: product.id,
                    product_name: product.name.clone(),
                    requested: *total,
                    available: product.stock,
                }
                .to_string(),
            );
        }
    }

    errors
}

/// Checks that a single product can be added to a cart.
pub fn check_cart_item(catalog: &Catalog, product_id: ProductId, quantity: u32) -> Result<&Product> {
    if quantity == 0 {
        return Err(ValidationError::InvalidQuantity { product_id }.into());
    }

    let product = catalog.get_product(product_id)?;
    if !product.has_stock_for(quantity) {
        return Err(DomainError::InsufficientStock {
            product_id,
            product_name: product.name.clone(),
            requested: quantity,
            available: product.stock,
        });
    }

    Ok(product)
}
