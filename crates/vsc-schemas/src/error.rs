use thiserror::Error;

/// Failure taxonomy shared by every operation that can be relayed to a caller.
///
/// | kind                 | handling                                          |
/// |----------------------|---------------------------------------------------|
/// | `NotFound`           | recoverable; caller asks the user to clarify      |
/// | `InvalidInput`       | coerced where possible, otherwise reported        |
/// | `StoreUnavailable`   | degrade to empty collection, log a warning        |
/// | `IntegrityViolation` | fatal to the one operation, session continues     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    StoreUnavailable,
    IntegrityViolation,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::StoreUnavailable => "STORE_UNAVAILABLE",
            ErrorKind::IntegrityViolation => "INTEGRITY_VIOLATION",
        }
    }
}

/// A record rejected at the load boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("{record} record is missing required field `{field}`")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },
    #[error("{record} record has invalid `{field}`: {reason}")]
    InvalidField {
        record: &'static str,
        field: &'static str,
        reason: String,
    },
}

impl RecordError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

/// Blank strings count as missing.
pub(crate) fn required(
    value: Option<String>,
    record: &'static str,
    field: &'static str,
) -> Result<String, RecordError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(RecordError::MissingField { record, field }),
    }
}
