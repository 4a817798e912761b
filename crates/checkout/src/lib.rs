//! Order placement for the storefront backend.
//!
//! This crate owns the one workflow that has to be all-or-nothing across the
//! catalog and the order ledger:
//! 1. Validate the customer fields and every item against live stock
//! 2. Decrement stock and append the order
//! 3. Flush both to storage before reporting success
//!
//! If the flush fails, the in-memory changes are rolled back in reverse order.

pub mod command;
pub mod coordinator;
pub mod error;
pub mod persistence;
pub mod shop;
pub mod state;

pub use command::PlaceOrder;
pub use coordinator::CheckoutCoordinator;
pub use error::CheckoutError;
pub use persistence::{FlushPolicy, ORDERS_KEY, PRODUCTS_KEY, ShopPersistence};
pub use shop::{Shop, ShopState};
pub use state::CheckoutState;
