use thiserror::Error;
use vsc_schemas::ErrorKind;
use vsc_store::StoreError;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("cannot finalize an empty cart")]
    EmptyCart,

    /// A line references an item id the catalog does not contain.
    #[error("cart line references unknown item `{item_id}`")]
    UnknownItem { item_id: String },

    #[error("order mixes currencies {first} and {other}")]
    MixedCurrency { first: String, other: String },

    /// A line total or the order total does not fit in an `i64`.
    #[error("order total overflows at item `{item_id}`")]
    TotalOverflow { item_id: String },

    #[error("order could not be persisted: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::EmptyCart => ErrorKind::InvalidInput,
            LedgerError::UnknownItem { .. }
            | LedgerError::MixedCurrency { .. }
            | LedgerError::TotalOverflow { .. } => ErrorKind::IntegrityViolation,
            LedgerError::Store(e) => e.kind(),
        }
    }
}
