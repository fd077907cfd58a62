//! In-memory collaborators implementing the gateway and report-service
//! contracts end to end, including the signature handshake. They back the
//! offline CLI mode and the test suite; no live gateway is ever needed to
//! exercise every transition of the state machine.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::checkout::{PaymentCapture, ReportLocator};
use crate::domain::ports::{
    AnalyticsSink, CheckoutPrompt, CreatedOrder, GatewayOutcome, GenerateRequest, OrderRequest,
    PaymentGateway, PurchaseEvent, ReportService, VerifyRequest,
};
use crate::error::ClientError;

/// Deterministic stand-in for the gateway's cryptographic signature. The
/// in-memory report service recomputes it to model server-side verification.
pub fn sign(order_ref: &str, payment_ref: &str) -> String {
    format!("sig:{order_ref}:{payment_ref}")
}

/// Scripted user behavior at the interactive checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayScript {
    /// The user pays; the gateway calls back with a signed capture.
    Complete,
    /// The user closes the modal.
    Dismiss,
    /// Order creation itself fails.
    RejectOrder,
    /// The user pays but the callback carries a forged signature.
    CompleteWithBadSignature,
}

/// A scriptable in-memory payment gateway.
#[derive(Clone)]
pub struct InMemoryPaymentGateway {
    script: GatewayScript,
    /// Simulated user think-time at the modal, to widen the in-flight window
    /// in concurrency tests.
    modal_delay: Duration,
    orders_created: Arc<AtomicUsize>,
}

impl InMemoryPaymentGateway {
    pub fn new(script: GatewayScript) -> Self {
        Self {
            script,
            modal_delay: Duration::ZERO,
            orders_created: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_modal_delay(mut self, delay: Duration) -> Self {
        self.modal_delay = delay;
        self
    }

    pub fn orders_created(&self) -> usize {
        self.orders_created.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn create_order(&self, request: OrderRequest) -> Result<CreatedOrder, ClientError> {
        if self.script == GatewayScript::RejectOrder {
            return Err(ClientError::Rejected {
                status: 502,
                detail: "order creation refused".to_string(),
            });
        }
        let seq = self.orders_created.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(CreatedOrder {
            key_id: "key_test".to_string(),
            amount_paise: 69_900,
            currency: request.currency,
            order_ref: format!("order_{seq:06}"),
        })
    }

    async fn open_checkout(&self, prompt: CheckoutPrompt) -> Result<GatewayOutcome, ClientError> {
        if !self.modal_delay.is_zero() {
            tokio::time::sleep(self.modal_delay).await;
        }
        match self.script {
            GatewayScript::Dismiss => Ok(GatewayOutcome::Dismissed),
            GatewayScript::Complete => {
                let payment_ref = format!("pay_{}", prompt.order_ref);
                let signature = sign(&prompt.order_ref, &payment_ref);
                Ok(GatewayOutcome::Completed(PaymentCapture {
                    payment_ref,
                    order_ref: prompt.order_ref,
                    signature,
                }))
            }
            GatewayScript::CompleteWithBadSignature => {
                let payment_ref = format!("pay_{}", prompt.order_ref);
                Ok(GatewayOutcome::Completed(PaymentCapture {
                    payment_ref,
                    order_ref: prompt.order_ref,
                    signature: "sig:forged".to_string(),
                }))
            }
            GatewayScript::RejectOrder => Err(ClientError::Network(
                "checkout opened without an order".to_string(),
            )),
        }
    }
}

/// In-memory report service: authoritative coupon check, signature
/// verification by recomputation, and locator minting under a base URL.
#[derive(Clone)]
pub struct InMemoryReportService {
    base_url: String,
    coupon_code: String,
    generated: Arc<AtomicUsize>,
    generate_calls: Arc<AtomicUsize>,
    coupon_calls: Arc<AtomicUsize>,
    verify_calls: Arc<AtomicUsize>,
    fail_generation: Arc<AtomicUsize>,
}

impl InMemoryReportService {
    pub fn new(base_url: impl Into<String>, coupon_code: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            coupon_code: coupon_code.into(),
            generated: Arc::new(AtomicUsize::new(0)),
            generate_calls: Arc::new(AtomicUsize::new(0)),
            coupon_calls: Arc::new(AtomicUsize::new(0)),
            verify_calls: Arc::new(AtomicUsize::new(0)),
            fail_generation: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Makes the next `n` generation attempts fail with a server error.
    pub fn fail_next_generations(&self, n: usize) {
        self.fail_generation.store(n, Ordering::SeqCst);
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn coupon_calls(&self) -> usize {
        self.coupon_calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    fn mint(&self, request: &GenerateRequest) -> Result<ReportLocator, ClientError> {
        if self.fail_generation.load(Ordering::SeqCst) > 0 {
            self.fail_generation.fetch_sub(1, Ordering::SeqCst);
            return Err(ClientError::Rejected {
                status: 500,
                detail: "report renderer unavailable".to_string(),
            });
        }
        let slug: String = request
            .name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        let seq = self.generated.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ReportLocator(format!(
            "{}/static/reports/{slug}-{seq}.pdf",
            self.base_url
        )))
    }
}

#[async_trait]
impl ReportService for InMemoryReportService {
    async fn generate(&self, request: GenerateRequest) -> Result<ReportLocator, ClientError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.mint(&request)
    }

    async fn generate_with_coupon(
        &self,
        request: GenerateRequest,
    ) -> Result<ReportLocator, ClientError> {
        self.coupon_calls.fetch_add(1, Ordering::SeqCst);
        let valid = request
            .coupon_code
            .as_deref()
            .is_some_and(|code| code.trim().eq_ignore_ascii_case(&self.coupon_code));
        if !valid {
            return Err(ClientError::Rejected {
                status: 400,
                detail: "Invalid Coupon Code".to_string(),
            });
        }
        self.mint(&request)
    }

    async fn verify_and_generate(
        &self,
        request: VerifyRequest,
    ) -> Result<ReportLocator, ClientError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if request.signature != sign(&request.order_ref, &request.payment_ref) {
            return Err(ClientError::Rejected {
                status: 400,
                detail: "Payment Signature Verification Failed".to_string(),
            });
        }
        self.mint(&request.form_data)
    }
}

/// Records purchase events; optionally fails to prove analytics failures
/// never affect checkout state.
#[derive(Clone, Default)]
pub struct RecordingAnalytics {
    events: Arc<RwLock<Vec<PurchaseEvent>>>,
    failing: bool,
}

impl RecordingAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            failing: true,
        }
    }

    pub async fn events(&self) -> Vec<PurchaseEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl AnalyticsSink for RecordingAnalytics {
    async fn record_purchase(&self, event: PurchaseEvent) -> Result<(), ClientError> {
        if self.failing {
            return Err(ClientError::Network("analytics endpoint down".to_string()));
        }
        self.events.write().await.push(event);
        Ok(())
    }
}
