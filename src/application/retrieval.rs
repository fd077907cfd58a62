use jiff::Timestamp;
use tracing::info;

use super::CheckoutSession;
use crate::domain::checkout::{Report, ReportLocator};
use crate::domain::ports::{GenerateRequest, ReportServiceBox};
use crate::error::{CheckoutError, ClientError, Result};

/// How the report view should proceed.
#[derive(Debug)]
pub enum RetrievalOutcome {
    Ready(Report),
    /// No form data is available at all; send the user back to the entry
    /// point.
    RedirectToForm,
}

/// Presents the terminal report.
///
/// With a locator already in the session no network call is made. After a
/// reload that lost the transaction, the same report is re-derived through a
/// repeat `generate` call; the service's idempotency guarantees this is not
/// an additional purchase. Failures carry a retry-or-go-back advice, never a
/// silent blank state.
pub struct ReportRetrieval {
    reports: ReportServiceBox,
}

impl ReportRetrieval {
    pub fn new(reports: ReportServiceBox) -> Self {
        Self { reports }
    }

    pub async fn resolve(&self, session: &CheckoutSession) -> Result<RetrievalOutcome> {
        let Some(form) = session.form() else {
            return Ok(RetrievalOutcome::RedirectToForm);
        };
        let owner = form.name.trim().to_string();

        if let Some(locator) = session.report_locator() {
            return Ok(RetrievalOutcome::Ready(Report {
                owner,
                locator: ReportLocator(locator.secure()),
                retrieved_at: Timestamp::now(),
            }));
        }

        info!(name = %owner, "re-deriving report after lost navigation state");
        let locator = match self.reports.generate(GenerateRequest::from_form(form)).await {
            Ok(locator) => locator,
            Err(ClientError::Network(message)) => return Err(CheckoutError::Network(message)),
            Err(error) => return Err(CheckoutError::ReportGeneration(error.to_string())),
        };

        Ok(RetrievalOutcome::Ready(Report {
            owner,
            locator: ReportLocator(locator.secure()),
            retrieved_at: Timestamp::now(),
        }))
    }
}
