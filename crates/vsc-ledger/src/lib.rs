//! vsc-ledger
//!
//! Append-only order history.
//!
//! [`OrderLedger::finalize`] turns a cart snapshot into an immutable
//! [`Order`](vsc_schemas::Order) priced from the current catalog and appends
//! it to the order store in one read-modify-write. Either every line prices
//! and the order is persisted, or nothing is written.
//!
//! The caller clears its cart only after `finalize` returns `Ok`.

mod error;
mod ledger;

pub use error::LedgerError;
pub use ledger::OrderLedger;
