//! Orders and the ledger that records them.

mod ledger;
mod model;
mod state;

pub use ledger::OrderLedger;
pub use model::{Order, OrderLineItem};
pub use state::OrderStatus;
