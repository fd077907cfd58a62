use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::checkout::{MerchantInfo, PaymentCapture, ReportLocator};
use super::form::{Gender, Language, SubmissionForm};
use crate::error::ClientError;

pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type ReportServiceBox = Box<dyn ReportService>;
pub type AnalyticsSinkBox = Box<dyn AnalyticsSink>;

/// Wire shape of a report generation request. Field names and the
/// `DD-MM-YYYY` date format follow the report service's contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub name: String,
    pub gender: Gender,
    pub dob: String,
    pub email: String,
    pub mobile: String,
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

impl GenerateRequest {
    /// Builds the wire request from a validated form. The caller must have
    /// run the validator; a missing gender here is a programming error, so
    /// it degrades to `Other` rather than panicking.
    pub fn from_form(form: &SubmissionForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
            gender: form.gender.unwrap_or(Gender::Other),
            dob: form.dob_wire(),
            email: form.email.clone(),
            mobile: form.mobile_digits(),
            language: form.language,
            coupon_code: None,
        }
    }

    pub fn with_coupon(mut self, code: impl Into<String>) -> Self {
        self.coupon_code = Some(code.into());
        self
    }
}

/// Verification request: the gateway callback payload plus the original form
/// so the service can generate immediately after a successful check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub payment_ref: String,
    pub order_ref: String,
    pub signature: String,
    pub form_data: GenerateRequest,
}

/// Order-creation request. The audit payload is an opaque copy of the form
/// for server-side bookkeeping only; amount and currency are fixed
/// server-side and intentionally absent here.
#[derive(Debug, Clone, Serialize)]
pub struct OrderRequest {
    pub currency: String,
    pub audit_payload: Option<serde_json::Value>,
}

/// A created-but-unpaid gateway order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedOrder {
    pub key_id: String,
    pub amount_paise: u64,
    pub currency: String,
    pub order_ref: String,
}

/// Everything the gateway's interactive checkout is opened with. Amount,
/// currency and merchant metadata come from the created order and fixed
/// config; only the contact prefill derives from the form.
#[derive(Debug, Clone)]
pub struct CheckoutPrompt {
    pub key_id: String,
    pub amount_paise: u64,
    pub currency: String,
    pub order_ref: String,
    pub merchant: MerchantInfo,
    pub prefill_name: String,
    pub prefill_email: String,
    pub prefill_contact: String,
}

/// Result of the gateway's user-paced modal: a tagged outcome instead of a
/// bare callback, so the transition table stays total and testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    Completed(PaymentCapture),
    Dismissed,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: OrderRequest) -> Result<CreatedOrder, ClientError>;

    /// Opens the interactive checkout and waits for the user. Unbounded,
    /// cancellable only by the user's dismiss.
    async fn open_checkout(&self, prompt: CheckoutPrompt) -> Result<GatewayOutcome, ClientError>;
}

#[async_trait]
pub trait ReportService: Send + Sync {
    /// Plain generation: a repeat of an already-authorized request (e.g. a
    /// reload that lost the in-memory locator). The service is responsible
    /// for idempotency; this is never an additional purchase.
    async fn generate(&self, request: GenerateRequest) -> Result<ReportLocator, ClientError>;

    /// Coupon-gated generation. The service is authoritative on coupon
    /// validity and rejects with a distinguishable error when invalid.
    async fn generate_with_coupon(
        &self,
        request: GenerateRequest,
    ) -> Result<ReportLocator, ClientError>;

    /// Verifies a claimed payment by signature and generates on success.
    async fn verify_and_generate(&self, request: VerifyRequest)
    -> Result<ReportLocator, ClientError>;
}

/// A fire-and-forget purchase event. Failures never affect checkout state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseEvent {
    pub transaction_id: String,
    pub value: Decimal,
    pub currency: String,
    pub coupon: Option<String>,
    pub item_name: String,
}

#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn record_purchase(&self, event: PurchaseEvent) -> Result<(), ClientError>;
}
