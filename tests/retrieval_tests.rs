mod common;

use common::{harness, valid_form};
use numera::application::CheckoutSession;
use numera::application::orchestrator::CheckoutOutcome;
use numera::application::retrieval::{ReportRetrieval, RetrievalOutcome};
use numera::domain::coupon::CouponState;
use numera::error::CheckoutError;
use numera::infrastructure::in_memory::{GatewayScript, InMemoryReportService};

#[tokio::test]
async fn test_resolved_locator_needs_no_network_call() {
    let h = harness(GatewayScript::Complete);
    let mut session = CheckoutSession::new();
    h.orchestrator
        .run(&mut session, &valid_form(), &CouponState::new())
        .await
        .unwrap();

    let view = ReportRetrieval::new(Box::new(h.reports.clone()));
    let outcome = view.resolve(&session).await.unwrap();

    match outcome {
        RetrievalOutcome::Ready(report) => {
            assert_eq!(report.owner, "Amit Sharma");
            assert!(report.locator.0.starts_with("https://backend.test/"));
        }
        RetrievalOutcome::RedirectToForm => panic!("expected a ready report"),
    }
    assert_eq!(h.reports.generate_calls(), 0);
}

#[tokio::test]
async fn test_reload_re_derives_from_last_known_form() {
    // A reload lost the transaction but the form survived.
    let reports = InMemoryReportService::new(common::BASE_URL, common::COUPON);
    let mut session = CheckoutSession::new();
    session.record_form(valid_form());

    let view = ReportRetrieval::new(Box::new(reports.clone()));
    let outcome = view.resolve(&session).await.unwrap();

    assert!(matches!(outcome, RetrievalOutcome::Ready(_)));
    // A repeat of the authorized generation, not a new purchase; counted so
    // the idempotency obligation stays visible.
    assert_eq!(reports.generate_calls(), 1);
}

#[tokio::test]
async fn test_no_form_data_redirects_to_entry_point() {
    let reports = InMemoryReportService::new(common::BASE_URL, common::COUPON);
    let view = ReportRetrieval::new(Box::new(reports.clone()));

    let outcome = view.resolve(&CheckoutSession::new()).await.unwrap();

    assert!(matches!(outcome, RetrievalOutcome::RedirectToForm));
    assert_eq!(reports.generate_calls(), 0);
}

#[tokio::test]
async fn test_re_derivation_failure_is_surfaced_not_silent() {
    let reports = InMemoryReportService::new(common::BASE_URL, common::COUPON);
    reports.fail_next_generations(1);
    let mut session = CheckoutSession::new();
    session.record_form(valid_form());

    let view = ReportRetrieval::new(Box::new(reports));
    let err = view.resolve(&session).await.unwrap_err();

    assert!(matches!(err, CheckoutError::ReportGeneration(_)));
}

#[tokio::test]
async fn test_session_reset_discards_everything() {
    let h = harness(GatewayScript::Complete);
    let mut session = CheckoutSession::new();
    let outcome = h
        .orchestrator
        .run(&mut session, &valid_form(), &CouponState::new())
        .await
        .unwrap();
    assert!(matches!(outcome, CheckoutOutcome::Delivered(_)));

    session.reset();
    let view = ReportRetrieval::new(Box::new(h.reports.clone()));
    let outcome = view.resolve(&session).await.unwrap();
    assert!(matches!(outcome, RetrievalOutcome::RedirectToForm));
}
