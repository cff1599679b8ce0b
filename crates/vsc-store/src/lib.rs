//! vsc-store
//!
//! Flat-collection persistence behind one seam.
//!
//! Every store holds an ordered `Vec<T>` and is rewritten in full on each
//! write. [`Repository::update`] is the only write path used by the ledger
//! and the fraud workflow; implementations decide how read-modify-write is
//! serialized:
//!
//! - [`JsonFileStore`] holds an exclusive advisory lock on `<file>.lock`
//!   for the whole read-modify-write and replaces the file atomically
//!   (temp file + fsync + rename). Concurrent sessions, including separate
//!   processes, no longer overwrite each other's last write.
//! - [`InMemoryStore`] serializes through a mutex. Used by tests.

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::InMemoryStore;

use tracing::warn;

/// Load/save access to one ordered collection of records.
///
/// Object safe, so callers can hold an `Arc<dyn Repository<T>>`.
pub trait Repository<T>: Send + Sync {
    /// All records in stored order. A missing store is an empty collection.
    fn load(&self) -> Result<Vec<T>, StoreError>;

    /// Replace the whole collection.
    fn save(&self, records: &[T]) -> Result<(), StoreError>;

    /// Read-modify-write. `apply` returns `true` when it changed the records
    /// and they must be written back; `false` leaves the store untouched.
    ///
    /// Returns whether a write happened.
    fn update(&self, apply: &mut dyn FnMut(&mut Vec<T>) -> bool) -> Result<bool, StoreError>;

    /// Human-readable location for log lines.
    fn describe(&self) -> String;

    /// [`Repository::load`], degrading any failure to an empty collection
    /// with a logged warning.
    fn load_or_empty(&self) -> Vec<T> {
        match self.load() {
            Ok(records) => records,
            Err(e) => {
                warn!(store = %self.describe(), error = %e, "store unavailable; treating as empty");
                Vec::new()
            }
        }
    }
}
