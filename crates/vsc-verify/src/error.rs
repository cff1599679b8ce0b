use thiserror::Error;
use vsc_schemas::ErrorKind;
use vsc_store::StoreError;

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("no fraud case for user `{user_name}`")]
    CaseNotFound { user_name: String },

    #[error("fraud case store failed: {0}")]
    Store(#[from] StoreError),
}

impl VerifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VerifyError::CaseNotFound { .. } => ErrorKind::NotFound,
            VerifyError::Store(e) => e.kind(),
        }
    }
}
