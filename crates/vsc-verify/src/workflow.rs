use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;
use vsc_schemas::{CaseStatus, FraudCase};
use vsc_store::Repository;

use crate::{CaseSummary, VerificationOutcome, VerificationState, VerifyError};

/// One call's verification flow over a shared fraud-case repository.
pub struct VerificationWorkflow {
    cases: Arc<dyn Repository<FraudCase>>,
    state: VerificationState,
}

impl VerificationWorkflow {
    pub fn new(cases: Arc<dyn Repository<FraudCase>>) -> Self {
        Self {
            cases,
            state: VerificationState::New,
        }
    }

    pub fn state(&self) -> &VerificationState {
        &self.state
    }

    /// Case-insensitive lookup by user name.
    ///
    /// | outcome | state after                   |
    /// |---------|-------------------------------|
    /// | hit     | `CASE_LOADED`                 |
    /// | miss    | unchanged (`NEW` on a fresh workflow) |
    pub fn load_case(&mut self, user_name: &str) -> Result<CaseSummary, VerifyError> {
        let case = self
            .find(user_name)
            .ok_or_else(|| VerifyError::CaseNotFound {
                user_name: user_name.trim().to_string(),
            })?;
        self.transition(VerificationState::CaseLoaded);
        info!(user = %case.user_name, status = %case.status, "fraud case loaded");
        Ok(CaseSummary::from(&case))
    }

    /// Compare `provided_answer` with the stored answer, both trimmed and
    /// case-folded. Unknown user, unreadable store and empty stored answer
    /// all reject.
    pub fn verify(&mut self, user_name: &str, provided_answer: &str) -> VerificationOutcome {
        let outcome = match self.find(user_name) {
            Some(case) if answers_match(&case.security_answer, provided_answer) => {
                VerificationOutcome::Verified
            }
            _ => VerificationOutcome::Rejected,
        };
        self.transition(match outcome {
            VerificationOutcome::Verified => VerificationState::Verified,
            VerificationOutcome::Rejected => VerificationState::Rejected,
        });
        info!(user = %user_name.trim(), passed = outcome.passed(), "security answer checked");
        outcome
    }

    /// Record `status` and `outcome_note` on the user's case and persist
    /// the whole collection. Any status string is accepted; terminal ones
    /// move the workflow to `RESOLVED`.
    pub fn update_status(
        &mut self,
        user_name: &str,
        status: impl Into<CaseStatus>,
        outcome_note: &str,
    ) -> Result<FraudCase, VerifyError> {
        self.update_status_at(user_name, status, outcome_note, Utc::now())
    }

    pub fn update_status_at(
        &mut self,
        user_name: &str,
        status: impl Into<CaseStatus>,
        outcome_note: &str,
        now: DateTime<Utc>,
    ) -> Result<FraudCase, VerifyError> {
        let status = status.into();
        let mut updated: Option<FraudCase> = None;

        self.cases.update(&mut |cases| {
            match cases.iter_mut().find(|c| c.matches_user(user_name)) {
                Some(case) => {
                    case.status = status.clone();
                    case.outcome_note = outcome_note.to_string();
                    case.last_updated = Some(now);
                    updated = Some(case.clone());
                    true
                }
                None => false,
            }
        })?;

        let case = updated.ok_or_else(|| VerifyError::CaseNotFound {
            user_name: user_name.trim().to_string(),
        })?;

        if status.is_terminal() {
            self.transition(VerificationState::Resolved(status));
        }
        info!(
            user = %case.user_name,
            status = %case.status,
            store = %self.cases.describe(),
            "fraud case status updated"
        );
        Ok(case)
    }

    fn find(&self, user_name: &str) -> Option<FraudCase> {
        self.cases
            .load_or_empty()
            .into_iter()
            .find(|c| c.matches_user(user_name))
    }

    /// `RESOLVED` is sticky.
    fn transition(&mut self, next: VerificationState) {
        if !self.state.is_terminal() {
            self.state = next;
        }
    }
}

fn answers_match(stored: &str, provided: &str) -> bool {
    let stored = stored.trim();
    !stored.is_empty() && stored.to_lowercase() == provided.trim().to_lowercase()
}
