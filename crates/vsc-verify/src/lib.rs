//! vsc-verify
//!
//! Identity verification for fraud-alert calls.
//!
//! ```text
//!   NEW ──load_case──► CASE_LOADED ──verify──► VERIFIED | REJECTED
//!    │                                              │
//!    └──────────────── update_status(terminal) ─────┴──► RESOLVED(status)
//! ```
//!
//! - The security answer never leaves this crate: [`CaseSummary`] carries
//!   the question only, and logs record pass/fail, never the answer.
//! - No case is held between calls. Every operation re-reads the case
//!   repository, so a second `verify` simply re-evaluates.
//! - `RESOLVED` is terminal for the in-memory state. Repository writes
//!   requested afterwards still happen.

mod error;
mod state;
mod workflow;

pub use error::VerifyError;
pub use state::{CaseSummary, VerificationOutcome, VerificationState};
pub use workflow::VerificationWorkflow;
