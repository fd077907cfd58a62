#![allow(dead_code)]

use numera::application::orchestrator::CheckoutOrchestrator;
use numera::config::Config;
use numera::domain::checkout::Pricing;
use numera::domain::coupon::{CouponGate, CouponState};
use numera::domain::form::{Gender, Language, SubmissionForm};
use numera::infrastructure::in_memory::{
    GatewayScript, InMemoryPaymentGateway, InMemoryReportService, RecordingAnalytics,
};
use std::fs::File;
use std::io::{Error, Write};
use std::path::Path;

pub const BASE_URL: &str = "http://backend.test";
pub const COUPON: &str = "vijay";

pub fn valid_form() -> SubmissionForm {
    SubmissionForm {
        name: "Amit Sharma".to_string(),
        dob: "29/11/1990".to_string(),
        mobile: "9876543210".to_string(),
        email: "amit@example.com".to_string(),
        gender: Some(Gender::Male),
        language: Language::English,
    }
}

pub fn applied_coupon(code: &str) -> CouponState {
    let gate = CouponGate::new(code);
    let mut state = CouponState::new();
    state.set_code(code);
    state.apply(&gate);
    assert!(state.applied());
    state
}

/// All collaborator doubles plus the orchestrator wired over them. The
/// doubles are cloned handles, so call counters stay observable after boxing.
pub struct Harness {
    pub gateway: InMemoryPaymentGateway,
    pub reports: InMemoryReportService,
    pub analytics: RecordingAnalytics,
    pub orchestrator: CheckoutOrchestrator,
}

pub fn harness(script: GatewayScript) -> Harness {
    harness_with_analytics(script, RecordingAnalytics::new())
}

pub fn harness_with_analytics(script: GatewayScript, analytics: RecordingAnalytics) -> Harness {
    let gateway = InMemoryPaymentGateway::new(script);
    let reports = InMemoryReportService::new(BASE_URL, COUPON);
    let orchestrator = CheckoutOrchestrator::new(
        Box::new(gateway.clone()),
        Box::new(reports.clone()),
        Box::new(analytics.clone()),
        Pricing::from_config(&Config::default()),
    );
    Harness {
        gateway,
        reports,
        analytics,
        orchestrator,
    }
}

pub fn generate_submissions_csv(path: &Path, rows: &[&str]) -> Result<(), Error> {
    let mut file = File::create(path)?;
    writeln!(file, "name, dob, mobile, email, gender, language, coupon")?;
    for row in rows {
        writeln!(file, "{row}")?;
    }
    Ok(())
}
