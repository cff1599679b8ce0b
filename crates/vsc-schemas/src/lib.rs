//! vsc-schemas
//!
//! Record types shared by every voice-shop crate: catalog items, cart lines,
//! persisted orders and fraud cases.
//!
//! Records are validated at the load boundary. Raw JSON is deserialized into
//! a permissive shape and converted with `TryFrom`, so a missing required
//! field is an explicit [`RecordError`] instead of a silent default.

mod cart;
mod error;
mod fraud;
mod item;
mod order;

pub use cart::{checked_cart_total, CartLine};
pub use error::{ErrorKind, RecordError};
pub use fraud::{CaseStatus, FraudCase};
pub use item::Item;
pub use order::{new_order_id, Order, OrderLine};

/// Attribute key used for the chosen size of a cart or order line.
pub const ATTR_SIZE: &str = "size";
