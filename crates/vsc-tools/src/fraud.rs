use std::sync::Arc;

use tracing::{debug, warn};
use vsc_schemas::{CaseStatus, ErrorKind, FraudCase};
use vsc_store::Repository;
use vsc_verify::{VerificationOutcome, VerificationState, VerificationWorkflow, VerifyError};

use crate::{render, ToolCall, ToolReply};

const NOTE_SAFE: &str = "Customer confirmed the transaction as legitimate.";
const NOTE_FRAUD: &str = "Customer denied the transaction; card flagged for blocking and dispute.";
const NOTE_UNVERIFIED: &str = "Customer could not be verified.";

/// One fraud-alert call.
pub struct FraudSession {
    workflow: VerificationWorkflow,
}

impl FraudSession {
    pub fn new(cases: Arc<dyn Repository<FraudCase>>) -> Self {
        Self {
            workflow: VerificationWorkflow::new(cases),
        }
    }

    pub fn state(&self) -> &VerificationState {
        self.workflow.state()
    }

    pub fn handle_line(&mut self, raw: &str) -> ToolReply {
        match ToolCall::parse(raw) {
            Ok(call) => self.dispatch(call),
            Err(e) => {
                warn!(error = %e, "tool call rejected");
                ToolReply::failure(
                    ErrorKind::InvalidInput,
                    format!("I couldn't understand that request ({e})."),
                )
            }
        }
    }

    pub fn dispatch(&mut self, call: ToolCall) -> ToolReply {
        debug!(tool = call.name(), state = self.state().as_str(), "tool call");
        match call {
            ToolCall::LoadFraudCase { user_name } => self.load_fraud_case(&user_name),
            ToolCall::VerifySecurityAnswer { user_name, answer } => {
                self.verify_security_answer(&user_name, &answer)
            }
            ToolCall::UpdateFraudStatus {
                user_name,
                status,
                note,
            } => self.update_fraud_status(&user_name, CaseStatus::from(status), &note),
            ToolCall::ResolveTransaction {
                user_name,
                legitimate,
            } => {
                let (status, note) = if legitimate {
                    (CaseStatus::ConfirmedSafe, NOTE_SAFE)
                } else {
                    (CaseStatus::ConfirmedFraud, NOTE_FRAUD)
                };
                self.update_fraud_status(&user_name, status, note)
            }
            ToolCall::FailVerification { user_name } => {
                self.update_fraud_status(&user_name, CaseStatus::VerificationFailed, NOTE_UNVERIFIED)
            }
            other => ToolReply::failure(
                ErrorKind::InvalidInput,
                format!("`{}` is not available on a fraud-alert call.", other.name()),
            ),
        }
    }

    pub fn load_fraud_case(&mut self, user_name: &str) -> ToolReply {
        match self.workflow.load_case(user_name) {
            Ok(summary) => ToolReply::text(render::case_summary(&summary)),
            Err(e) => ToolReply::failure(
                e.kind(),
                format!(
                    "I couldn't find a fraud alert for {}. I can't continue this call without a \
                     matching case.",
                    user_name.trim()
                ),
            ),
        }
    }

    pub fn verify_security_answer(&mut self, user_name: &str, answer: &str) -> ToolReply {
        match self.workflow.verify(user_name, answer) {
            VerificationOutcome::Verified => {
                ToolReply::text("PASSED: thank you, your identity is verified.")
            }
            VerificationOutcome::Rejected => ToolReply::text(
                "FAILED: that answer doesn't match our records, so I can't discuss this \
                 transaction further.",
            ),
        }
    }

    pub fn update_fraud_status(
        &mut self,
        user_name: &str,
        status: CaseStatus,
        note: &str,
    ) -> ToolReply {
        match self.workflow.update_status(user_name, status, note) {
            Ok(case) => ToolReply::text(format!(
                "The case for {} is now marked {}.",
                case.user_name, case.status
            )),
            Err(e @ VerifyError::CaseNotFound { .. }) => ToolReply::failure(
                e.kind(),
                format!("I couldn't find a case for {}.", user_name.trim()),
            ),
            Err(e) => ToolReply::failure(
                e.kind(),
                format!("I couldn't save the outcome right now ({e})."),
            ),
        }
    }
}
