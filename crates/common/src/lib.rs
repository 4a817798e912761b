//! Identifier types shared by every crate of the storefront backend.

mod types;

pub use types::{OrderId, ProductId};
