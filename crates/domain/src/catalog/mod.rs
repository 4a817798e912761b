//! Catalog store and product records.

mod product;
mod store;

pub use product::Product;
pub use store::Catalog;
