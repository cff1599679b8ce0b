use thiserror::Error;
use vsc_schemas::ErrorKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The spoken reference did not resolve to a catalog item.
    #[error("no catalog item matches `{reference}`")]
    UnresolvedReference { reference: String },

    /// No cart line matches the reference given to remove/update.
    #[error("no cart line matches `{reference}`")]
    LineNotFound { reference: String },

    #[error("no recipe named `{dish}`")]
    UnknownDish { dish: String },

    /// The dish exists but none of its ingredients scored against the catalog.
    #[error("no ingredient of `{dish}` matches a catalog item")]
    NoIngredientsResolved { dish: String },

    #[error("item {item_id} is priced in {item_currency} but the cart holds {cart_currency}")]
    CurrencyMismatch {
        item_id: String,
        item_currency: String,
        cart_currency: String,
    },

    #[error("adding `{reference}` would push the cart total past what can be represented")]
    TotalOverflow { reference: String },
}

impl CartError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CartError::UnresolvedReference { .. }
            | CartError::LineNotFound { .. }
            | CartError::UnknownDish { .. }
            | CartError::NoIngredientsResolved { .. } => ErrorKind::NotFound,
            CartError::CurrencyMismatch { .. } | CartError::TotalOverflow { .. } => {
                ErrorKind::InvalidInput
            }
        }
    }
}
