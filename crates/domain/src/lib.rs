//! Domain layer for the storefront backend.
//!
//! This crate provides the in-memory state the checkout workflow operates on:
//! - Catalog store of products and their live stock levels
//! - Order ledger with monotonically assigned order ids
//! - Cart validation shared by checkout and the advisory cart endpoints
//! - Money amounts kept in integer cents

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod order;

pub use cart::{CartItem, check_cart_item, validate_cart};
pub use catalog::{Catalog, Product};
pub use common::{OrderId, ProductId};
pub use error::{DomainError, Result, ValidationError};
pub use money::Money;
pub use order::{Order, OrderLedger, OrderLineItem, OrderStatus};
