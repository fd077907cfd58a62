use std::sync::atomic::{AtomicBool, Ordering};

use jiff::Timestamp;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::checkout::{
    CheckoutState, CheckoutTransaction, MerchantInfo, PaymentPath, Pricing,
};
use crate::domain::coupon::CouponState;
use crate::domain::form::SubmissionForm;
use crate::domain::ports::{
    AnalyticsSinkBox, CheckoutPrompt, GatewayOutcome, GenerateRequest, OrderRequest,
    PaymentGatewayBox, PurchaseEvent, ReportServiceBox, VerifyRequest,
};
use crate::domain::validation::{self, Field, FieldError};
use crate::error::{CheckoutError, ClientError, Result};

/// How one submission ended. `Cancelled` is a user decision, not an error;
/// failures come back as `CheckoutError`.
#[derive(Debug)]
pub enum CheckoutOutcome {
    Delivered(CheckoutTransaction),
    Cancelled,
}

/// Drives a single submission through to a report locator or a terminal
/// failure.
///
/// The orchestrator owns the collaborator ports and the one piece of shared
/// mutable state in the whole flow: the in-flight flag that rejects a second
/// submit while any step of the current one is awaited. Step N+1 is never
/// entered before step N's result is known, and nothing is retried
/// automatically.
pub struct CheckoutOrchestrator {
    gateway: PaymentGatewayBox,
    reports: ReportServiceBox,
    analytics: AnalyticsSinkBox,
    pricing: Pricing,
    merchant: MerchantInfo,
    in_flight: AtomicBool,
}

impl CheckoutOrchestrator {
    pub fn new(
        gateway: PaymentGatewayBox,
        reports: ReportServiceBox,
        analytics: AnalyticsSinkBox,
        pricing: Pricing,
    ) -> Self {
        Self {
            gateway,
            reports,
            analytics,
            pricing,
            merchant: MerchantInfo::default(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Submits the session's form and records the finished transaction back
    /// into the session on delivery.
    pub async fn run(
        &self,
        session: &mut super::CheckoutSession,
        form: &SubmissionForm,
        coupon: &CouponState,
    ) -> Result<CheckoutOutcome> {
        let outcome = self.submit(form, coupon).await?;
        if let CheckoutOutcome::Delivered(ref tx) = outcome {
            session.record_form(form.clone());
            session.record_transaction(tx.clone());
        }
        Ok(outcome)
    }

    /// One full checkout attempt. Exactly one may be in flight at a time; a
    /// concurrent submit fails fast with `AlreadyInFlight` before any
    /// collaborator is contacted.
    pub async fn submit(
        &self,
        form: &SubmissionForm,
        coupon: &CouponState,
    ) -> Result<CheckoutOutcome> {
        let _guard = self.acquire_in_flight()?;

        let errors = validation::validate_form(form);
        if !errors.is_empty() {
            // Stays in Idle; every outstanding error surfaces at once.
            return Err(CheckoutError::Validation(errors));
        }

        if coupon.applied() {
            self.coupon_branch(form, coupon).await
        } else {
            self.paid_branch(form).await
        }
    }

    async fn coupon_branch(
        &self,
        form: &SubmissionForm,
        coupon: &CouponState,
    ) -> Result<CheckoutOutcome> {
        let mut tx = CheckoutTransaction::new(PaymentPath::Coupon);
        tx.advance(CheckoutState::Validating)?;
        tx.advance(CheckoutState::CouponIssuing)?;

        let code = coupon.code().trim().to_string();
        tx.id = Some(format!(
            "COUPON_{}_{}",
            code,
            Timestamp::now().as_millisecond()
        ));
        info!(coupon = %code, name = %form.name.trim(), "coupon used");

        let request = GenerateRequest::from_form(form).with_coupon(&code);
        let locator = match self.reports.generate_with_coupon(request).await {
            Ok(locator) => locator,
            // The server is authoritative on coupon validity; its rejection
            // is a validation failure, not a payment failure.
            Err(ClientError::Rejected { status, detail }) if (400..500).contains(&status) => {
                fail(&mut tx);
                return Err(CheckoutError::Validation(vec![FieldError::new(
                    Field::Coupon,
                    detail,
                )]));
            }
            Err(ClientError::Network(message)) => {
                fail(&mut tx);
                return Err(CheckoutError::Network(message));
            }
            Err(error) => {
                fail(&mut tx);
                return Err(CheckoutError::ReportGeneration(error.to_string()));
            }
        };

        tx.advance(CheckoutState::ReportGenerating)?;
        tx.deliver(locator)?;

        let event = PurchaseEvent {
            transaction_id: tx.id.clone().unwrap_or_default(),
            value: Decimal::ZERO,
            currency: self.pricing.currency.clone(),
            coupon: Some(code),
            item_name: "Numerology Report".to_string(),
        };
        self.fire_analytics(event).await;

        info!(state = %tx.state(), "coupon checkout delivered");
        Ok(CheckoutOutcome::Delivered(tx))
    }

    async fn paid_branch(&self, form: &SubmissionForm) -> Result<CheckoutOutcome> {
        let mut tx = CheckoutTransaction::new(PaymentPath::Gateway);
        tx.advance(CheckoutState::Validating)?;
        tx.advance(CheckoutState::OrderCreating)?;
        info!(name = %form.name.trim(), "payment initiated");

        // The form rides along only as an opaque audit payload; amount and
        // currency are fixed server-side.
        let order_request = OrderRequest {
            currency: self.pricing.currency.clone(),
            audit_payload: serde_json::to_value(GenerateRequest::from_form(form)).ok(),
        };
        let order = match self.gateway.create_order(order_request).await {
            Ok(order) => order,
            Err(ClientError::Network(message)) => {
                fail(&mut tx);
                return Err(CheckoutError::Network(message));
            }
            Err(error) => {
                fail(&mut tx);
                return Err(CheckoutError::GatewayOrder(error.to_string()));
            }
        };

        tx.order_ref = Some(order.order_ref.clone());
        tx.id = Some(order.order_ref.clone());
        tx.advance(CheckoutState::GatewayAwaiting)?;
        info!(order_ref = %order.order_ref, "awaiting gateway checkout");

        let prompt = CheckoutPrompt {
            key_id: order.key_id,
            amount_paise: order.amount_paise,
            currency: order.currency,
            order_ref: order.order_ref.clone(),
            merchant: self.merchant.clone(),
            prefill_name: form.name.trim().to_string(),
            prefill_email: form.email.clone(),
            prefill_contact: form.mobile_digits(),
        };
        let capture = match self.gateway.open_checkout(prompt).await {
            Ok(GatewayOutcome::Completed(capture)) => capture,
            Ok(GatewayOutcome::Dismissed) => {
                // User-initiated, not an error. The server-side order stays
                // created-but-unpaid for the backend to garbage-collect.
                tx.advance(CheckoutState::Cancelled)?;
                info!(order_ref = %order.order_ref, "gateway checkout dismissed");
                return Ok(CheckoutOutcome::Cancelled);
            }
            Err(ClientError::Network(message)) => {
                fail(&mut tx);
                return Err(CheckoutError::Network(message));
            }
            Err(error) => {
                fail(&mut tx);
                return Err(CheckoutError::GatewayOrder(error.to_string()));
            }
        };

        tx.advance(CheckoutState::Verifying)?;
        tx.payment = Some(capture.clone());
        info!(order_ref = %capture.order_ref, payment_ref = %capture.payment_ref, "verifying payment");

        // The gateway callback is not trusted on its face: the service
        // re-checks the signature before generating. Any failure past this
        // point may mean money moved without a report, so everything maps to
        // a contact-support case.
        let verify = VerifyRequest {
            payment_ref: capture.payment_ref.clone(),
            order_ref: capture.order_ref.clone(),
            signature: capture.signature.clone(),
            form_data: GenerateRequest::from_form(form),
        };
        let locator = match self.reports.verify_and_generate(verify).await {
            Ok(locator) => locator,
            Err(ClientError::Rejected { status, detail }) if (500..600).contains(&status) => {
                fail(&mut tx);
                return Err(CheckoutError::ReportGeneration(detail));
            }
            Err(error) => {
                fail(&mut tx);
                return Err(CheckoutError::Verification(error.to_string()));
            }
        };

        tx.advance(CheckoutState::ReportGenerating)?;
        tx.deliver(locator)?;

        let event = PurchaseEvent {
            transaction_id: capture.payment_ref,
            value: self.pricing.display_amount,
            currency: self.pricing.currency.clone(),
            coupon: None,
            item_name: "Numerology Report".to_string(),
        };
        self.fire_analytics(event).await;

        info!(state = %tx.state(), "paid checkout delivered");
        Ok(CheckoutOutcome::Delivered(tx))
    }

    async fn fire_analytics(&self, event: PurchaseEvent) {
        if let Err(error) = self.analytics.record_purchase(event).await {
            warn!(%error, "purchase analytics dropped");
        }
    }

    fn acquire_in_flight(&self) -> Result<InFlightGuard<'_>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CheckoutError::AlreadyInFlight);
        }
        Ok(InFlightGuard(&self.in_flight))
    }
}

/// Transition into the recoverable-error state; control returns to `Idle`
/// through a fresh transaction on the next submit.
fn fail(tx: &mut CheckoutTransaction) {
    if tx.advance(CheckoutState::ErrorRecoverable).is_ok() {
        warn!(path = ?tx.path, "checkout abandoned in recoverable error state");
    }
}

/// Clears the in-flight flag on every exit path, terminal or error.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
