//! Scenario: a fraud-alert call against the on-disk case file.
//!
//! # Invariants under test
//!
//! 1. Loading a case never exposes the stored security answer.
//! 2. A correct answer (trimmed, case-insensitive) verifies; the outcome is
//!    persisted with a note and a timestamp.
//! 3. Other cases in the file are left exactly as they were.
//! 4. A fresh workflow over the same file sees the recorded status.
//!
//! GREEN when: John's case reads `confirmed_fraud` on disk and Priya's is
//! still `pending_review`.

use vsc_schemas::CaseStatus;
use vsc_store::Repository;
use vsc_testkit::TempWorkspace;
use vsc_verify::{VerificationState, VerificationWorkflow};

#[test]
fn denied_transaction_is_recorded_as_fraud() -> anyhow::Result<()> {
    let ws = TempWorkspace::new()?;
    let mut call = ws.fraud_session()?;

    // GIVEN: the case is loaded.
    let loaded = call.handle_line(r#"{"tool":"load_fraud_case","args":{"user_name":"john"}}"#);
    assert!(loaded.is_ok(), "{loaded:?}");
    assert!(loaded.text.contains("**** 4242"));
    assert!(loaded.text.contains("ABC Industry"));
    assert!(!loaded.text.contains("Bruno"));
    assert_eq!(call.state(), &VerificationState::CaseLoaded);

    // WHEN: the caller verifies and denies the transaction.
    let verified = call.handle_line(
        r#"{"tool":"verify_security_answer","args":{"user_name":"John","answer":"  bruno "}}"#,
    );
    assert!(verified.text.starts_with("PASSED"));
    assert_eq!(call.state(), &VerificationState::Verified);

    let resolved = call.handle_line(
        r#"{"tool":"resolve_transaction","args":{"user_name":"John","legitimate":false}}"#,
    );
    assert!(resolved.is_ok(), "{resolved:?}");
    assert_eq!(
        call.state(),
        &VerificationState::Resolved(CaseStatus::ConfirmedFraud)
    );

    // THEN: only John's record changed.
    let cases = ws.fraud_store()?.load()?;
    assert_eq!(cases.len(), 3);
    let john = cases.iter().find(|c| c.user_name == "John").expect("john");
    assert_eq!(john.status, CaseStatus::ConfirmedFraud);
    assert!(!john.outcome_note.is_empty());
    assert!(john.last_updated.is_some());
    let priya = cases.iter().find(|c| c.user_name == "Priya").expect("priya");
    assert_eq!(priya.status, CaseStatus::PendingReview);
    assert!(priya.last_updated.is_none());

    // A later call sees the recorded outcome.
    let mut again = VerificationWorkflow::new(ws.fraud_store()?);
    let summary = again.load_case("JOHN")?;
    assert_eq!(summary.status, CaseStatus::ConfirmedFraud);
    Ok(())
}

#[test]
fn wrong_answer_then_failed_verification() -> anyhow::Result<()> {
    let ws = TempWorkspace::new()?;
    let mut call = ws.fraud_session()?;

    call.handle_line(r#"{"tool":"load_fraud_case","args":{"user_name":"Arjun"}}"#);
    let rejected = call.handle_line(
        r#"{"tool":"verify_security_answer","args":{"user_name":"Arjun","answer":"Don Bosco"}}"#,
    );
    assert!(rejected.text.starts_with("FAILED"));
    assert_eq!(call.state(), &VerificationState::Rejected);

    let failed =
        call.handle_line(r#"{"tool":"fail_verification","args":{"user_name":"Arjun"}}"#);
    assert!(failed.is_ok(), "{failed:?}");
    assert_eq!(
        call.state(),
        &VerificationState::Resolved(CaseStatus::VerificationFailed)
    );

    let arjun = ws
        .fraud_store()?
        .load()?
        .into_iter()
        .find(|c| c.user_name == "Arjun")
        .expect("arjun");
    assert_eq!(arjun.status, CaseStatus::VerificationFailed);
    Ok(())
}

#[test]
fn shop_tools_are_refused_on_a_fraud_call() -> anyhow::Result<()> {
    let ws = TempWorkspace::new()?;
    let mut call = ws.fraud_session()?;

    let reply = call.handle_line(r#"{"tool":"list_cart"}"#);
    assert_eq!(reply.error.as_deref(), Some("INVALID_INPUT"));
    assert_eq!(call.state(), &VerificationState::New);
    Ok(())
}
