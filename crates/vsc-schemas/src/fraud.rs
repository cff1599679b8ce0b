use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{required, RecordError};

const RECORD: &str = "fraud_case";

// ---------------------------------------------------------------------------
// Case status
// ---------------------------------------------------------------------------

/// Review status of a fraud case.
///
/// Stored as a plain string. Unknown strings round-trip through
/// [`CaseStatus::Other`]; enforcing the enumerated set is a caller concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CaseStatus {
    PendingReview,
    /// Terminal. The caller could not prove identity.
    VerificationFailed,
    /// Terminal. The customer recognised the transaction.
    ConfirmedSafe,
    /// Terminal. The customer denied the transaction.
    ConfirmedFraud,
    Other(String),
}

impl CaseStatus {
    pub fn as_str(&self) -> &str {
        match self {
            CaseStatus::PendingReview => "pending_review",
            CaseStatus::VerificationFailed => "verification_failed",
            CaseStatus::ConfirmedSafe => "confirmed_safe",
            CaseStatus::ConfirmedFraud => "confirmed_fraud",
            CaseStatus::Other(s) => s,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CaseStatus::VerificationFailed | CaseStatus::ConfirmedSafe | CaseStatus::ConfirmedFraud
        )
    }
}

impl From<String> for CaseStatus {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pending_review" => CaseStatus::PendingReview,
            "verification_failed" => CaseStatus::VerificationFailed,
            "confirmed_safe" => CaseStatus::ConfirmedSafe,
            "confirmed_fraud" => CaseStatus::ConfirmedFraud,
            _ => CaseStatus::Other(s),
        }
    }
}

impl From<&str> for CaseStatus {
    fn from(s: &str) -> Self {
        CaseStatus::from(s.to_string())
    }
}

impl From<CaseStatus> for String {
    fn from(s: CaseStatus) -> Self {
        s.as_str().to_string()
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Fraud case
// ---------------------------------------------------------------------------

/// A suspicious-transaction record keyed by `user_name` (case-insensitive).
///
/// Mutated in place by status updates; never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFraudCase")]
pub struct FraudCase {
    pub user_name: String,
    /// Last digits of the card only. Never a full PAN.
    pub card_ending: String,
    pub amount: f64,
    pub merchant: String,
    pub time: String,
    pub location: String,
    pub category: String,
    pub security_question: String,
    /// Empty means the case cannot be verified.
    pub security_answer: String,
    pub status: CaseStatus,
    pub outcome_note: String,
    pub last_updated: Option<DateTime<Utc>>,
}

impl FraudCase {
    /// `user_name` comparison used for every lookup.
    pub fn matches_user(&self, user_name: &str) -> bool {
        self.user_name.to_lowercase() == user_name.trim().to_lowercase()
    }

    /// Card ending reduced to its last four characters, prefixed by a mask.
    pub fn masked_card(&self) -> String {
        let digits: Vec<char> = self.card_ending.trim().chars().collect();
        let start = digits.len().saturating_sub(4);
        let tail: String = digits[start..].iter().collect();
        format!("**** {tail}")
    }
}

/// Accepts both snake_case and the camelCase keys used by hand-edited case
/// files.
#[derive(Debug, Default, Deserialize)]
struct RawFraudCase {
    #[serde(alias = "userName")]
    user_name: Option<String>,
    #[serde(alias = "cardEnding")]
    card_ending: Option<String>,
    #[serde(default, alias = "transactionAmount")]
    amount: Option<f64>,
    #[serde(default, alias = "transactionName", alias = "transactionMerchant")]
    merchant: Option<String>,
    #[serde(default, alias = "transactionTime")]
    time: Option<String>,
    #[serde(default, alias = "transactionLocation")]
    location: Option<String>,
    #[serde(default, alias = "transactionCategory")]
    category: Option<String>,
    #[serde(alias = "securityQuestion")]
    security_question: Option<String>,
    #[serde(default, alias = "securityAnswer")]
    security_answer: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, alias = "outcomeNote", alias = "outcome")]
    outcome_note: Option<String>,
    #[serde(default, alias = "lastUpdated")]
    last_updated: Option<DateTime<Utc>>,
}

impl TryFrom<RawFraudCase> for FraudCase {
    type Error = RecordError;

    fn try_from(raw: RawFraudCase) -> Result<Self, Self::Error> {
        let user_name = required(raw.user_name, RECORD, "user_name")?;
        let card_ending = required(raw.card_ending, RECORD, "card_ending")?;
        let security_question = required(raw.security_question, RECORD, "security_question")?;
        let amount = raw.amount.unwrap_or(0.0);
        if !amount.is_finite() {
            return Err(RecordError::InvalidField {
                record: RECORD,
                field: "amount",
                reason: "must be a finite number".to_string(),
            });
        }

        Ok(FraudCase {
            user_name,
            card_ending,
            amount,
            merchant: raw.merchant.unwrap_or_default(),
            time: raw.time.unwrap_or_default(),
            location: raw.location.unwrap_or_default(),
            category: raw.category.unwrap_or_default(),
            security_question,
            security_answer: raw.security_answer.unwrap_or_default(),
            status: raw
                .status
                .map(CaseStatus::from)
                .unwrap_or(CaseStatus::PendingReview),
            outcome_note: raw.outcome_note.unwrap_or_default(),
            last_updated: raw.last_updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case_json(extra: &str) -> String {
        format!(
            r#"{{"userName":"John","cardEnding":"4242","securityQuestion":"Pet name?"{extra}}}"#
        )
    }

    #[test]
    fn defaults_apply_to_optional_fields() {
        let case: FraudCase = serde_json::from_str(&case_json("")).unwrap();
        assert_eq!(case.status, CaseStatus::PendingReview);
        assert_eq!(case.security_answer, "");
        assert!(case.last_updated.is_none());
    }

    #[test]
    fn missing_question_is_rejected() {
        let err = serde_json::from_str::<FraudCase>(r#"{"userName":"John","cardEnding":"4242"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("security_question"), "got: {err}");
    }

    #[test]
    fn unknown_status_round_trips() {
        let case: FraudCase =
            serde_json::from_str(&case_json(r#","status":"escalated""#)).unwrap();
        assert_eq!(case.status, CaseStatus::Other("escalated".into()));
        let back = serde_json::to_value(&case).unwrap();
        assert_eq!(back["status"], "escalated");
    }

    #[test]
    fn masked_card_keeps_last_four() {
        let mut case: FraudCase = serde_json::from_str(&case_json("")).unwrap();
        case.card_ending = "4111111111114242".into();
        assert_eq!(case.masked_card(), "**** 4242");
        case.card_ending = "42".into();
        assert_eq!(case.masked_card(), "**** 42");
    }

    #[test]
    fn terminal_statuses() {
        assert!(CaseStatus::ConfirmedSafe.is_terminal());
        assert!(CaseStatus::ConfirmedFraud.is_terminal());
        assert!(CaseStatus::VerificationFailed.is_terminal());
        assert!(!CaseStatus::PendingReview.is_terminal());
        assert!(!CaseStatus::from("escalated").is_terminal());
    }
}
