pub mod orchestrator;
pub mod retrieval;

use crate::domain::checkout::{CheckoutTransaction, ReportLocator};
use crate::domain::form::SubmissionForm;

/// Explicit per-session context, replacing ambient mutable state.
///
/// The orchestrator is the only writer (via `CheckoutOrchestrator::run`); the
/// retrieval view reads it. Dropped on navigation away or a new submission.
#[derive(Debug, Default)]
pub struct CheckoutSession {
    form: Option<SubmissionForm>,
    transaction: Option<CheckoutTransaction>,
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> Option<&SubmissionForm> {
        self.form.as_ref()
    }

    pub fn transaction(&self) -> Option<&CheckoutTransaction> {
        self.transaction.as_ref()
    }

    pub fn report_locator(&self) -> Option<&ReportLocator> {
        self.transaction.as_ref().and_then(|tx| tx.report())
    }

    /// Captures the submitted form. Survives a reload in real deployments,
    /// which is why the retrieval view can re-derive a report from it.
    pub fn record_form(&mut self, form: SubmissionForm) {
        self.form = Some(form);
    }

    pub(crate) fn record_transaction(&mut self, tx: CheckoutTransaction) {
        self.transaction = Some(tx);
    }

    /// Starts over: discards the form and any completed transaction.
    pub fn reset(&mut self) {
        self.form = None;
        self.transaction = None;
    }
}
