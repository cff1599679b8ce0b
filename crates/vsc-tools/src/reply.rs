use serde::{Deserialize, Serialize};
use vsc_schemas::ErrorKind;

/// One tool response. `total` is present for cart reads; `error` carries
/// the failure kind (`NOT_FOUND`, `INVALID_INPUT`, ...) when the call did
/// not do what was asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolReply {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            total: None,
            error: None,
        }
    }

    pub fn with_total(mut self, total: i64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn failure(kind: ErrorKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            total: None,
            error: Some(kind.as_str().to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
