use serde::Serialize;
use vsc_schemas::{CaseStatus, FraudCase};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationState {
    /// No case loaded yet, or the last lookup missed.
    New,
    CaseLoaded,
    Verified,
    Rejected,
    /// A terminal status was recorded. **Terminal.**
    Resolved(CaseStatus),
}

impl VerificationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, VerificationState::Resolved(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationState::New => "NEW",
            VerificationState::CaseLoaded => "CASE_LOADED",
            VerificationState::Verified => "VERIFIED",
            VerificationState::Rejected => "REJECTED",
            VerificationState::Resolved(_) => "RESOLVED",
        }
    }
}

/// Result of one answer check. There is no third outcome: a missing case or
/// an empty stored answer is `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationOutcome {
    Verified,
    Rejected,
}

impl VerificationOutcome {
    pub fn passed(self) -> bool {
        self == VerificationOutcome::Verified
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// What may be read back to the caller once a case is loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseSummary {
    pub user_name: String,
    /// `**** 4242`
    pub masked_card: String,
    pub amount: f64,
    pub merchant: String,
    pub time: String,
    pub location: String,
    pub category: String,
    pub security_question: String,
    pub status: CaseStatus,
}

impl From<&FraudCase> for CaseSummary {
    fn from(case: &FraudCase) -> Self {
        Self {
            user_name: case.user_name.clone(),
            masked_card: case.masked_card(),
            amount: case.amount,
            merchant: case.merchant.clone(),
            time: case.time.clone(),
            location: case.location.clone(),
            category: case.category.clone(),
            security_question: case.security_question.clone(),
            status: case.status.clone(),
        }
    }
}
