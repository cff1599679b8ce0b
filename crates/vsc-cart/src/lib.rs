//! vsc-cart
//!
//! Per-session cart over a shared [`CatalogIndex`](vsc_catalog::CatalogIndex).
//!
//! - Lines are keyed by item id: adding an item already in the cart merges
//!   into the existing line (quantities add).
//! - A stored line always has quantity > 0. Non-positive quantities are
//!   coerced: clamped to 1 on add, treated as delete on update.
//! - Name, unit price and currency are captured when a line is first added;
//!   [`CartStore::list`] totals from those captured values.
//! - A cart holds one currency. The first line fixes it.
//! - Line totals and the cart total always fit in an `i64`; a mutation that
//!   would overflow either is refused.
//!
//! Every failure leaves the cart untouched.

mod cart;
mod error;

pub use cart::{CartStore, CartUpdate};
pub use error::CartError;
