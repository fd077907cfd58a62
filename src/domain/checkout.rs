use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::CheckoutError;

/// Which branch a transaction took after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentPath {
    Coupon,
    Gateway,
}

/// The checkout state machine. `Delivered` and `Cancelled` are terminal;
/// `ErrorRecoverable` hands control back to `Idle` via a fresh transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    Validating,
    CouponIssuing,
    OrderCreating,
    GatewayAwaiting,
    Verifying,
    ReportGenerating,
    Delivered,
    Cancelled,
    ErrorRecoverable,
}

impl CheckoutState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CheckoutState::Delivered | CheckoutState::Cancelled)
    }

    /// The transition table. States are forward-only, so a transaction can
    /// never re-enter a state it has exited.
    pub fn can_advance_to(self, next: CheckoutState) -> bool {
        use CheckoutState::*;
        if next == ErrorRecoverable {
            return !self.is_terminal() && self != ErrorRecoverable;
        }
        matches!(
            (self, next),
            (Idle, Validating)
                | (Validating, CouponIssuing)
                | (Validating, OrderCreating)
                | (OrderCreating, GatewayAwaiting)
                | (GatewayAwaiting, Verifying)
                | (GatewayAwaiting, Cancelled)
                | (Verifying, ReportGenerating)
                | (CouponIssuing, ReportGenerating)
                | (ReportGenerating, Delivered)
        )
    }
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckoutState::Idle => "idle",
            CheckoutState::Validating => "validating",
            CheckoutState::CouponIssuing => "coupon_issuing",
            CheckoutState::OrderCreating => "order_creating",
            CheckoutState::GatewayAwaiting => "gateway_awaiting",
            CheckoutState::Verifying => "verifying",
            CheckoutState::ReportGenerating => "report_generating",
            CheckoutState::Delivered => "delivered",
            CheckoutState::Cancelled => "cancelled",
            CheckoutState::ErrorRecoverable => "error_recoverable",
        };
        f.write_str(s)
    }
}

/// The gateway's success callback payload: payment and order references plus
/// the signature the report service verifies server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCapture {
    pub payment_ref: String,
    pub order_ref: String,
    pub signature: String,
}

/// URI of a rendered report. The client only ever holds this reference,
/// never the document bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLocator(pub String);

impl ReportLocator {
    /// Reports are always served over https, wherever they were minted.
    pub fn secure(&self) -> String {
        self.0.replacen("http://", "https://", 1)
    }
}

impl fmt::Display for ReportLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A delivered report as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub owner: String,
    pub locator: ReportLocator,
    pub retrieved_at: Timestamp,
}

/// Fixed, server-side pricing. Never derived from client input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pricing {
    pub amount_paise: u64,
    pub display_amount: Decimal,
    pub currency: String,
}

impl Pricing {
    pub fn from_config(config: &Config) -> Self {
        Self {
            amount_paise: config.report_price_paise,
            display_amount: config.display_price(),
            currency: Config::CURRENCY.to_string(),
        }
    }
}

/// Fixed merchant display metadata handed to the gateway's interactive
/// checkout; never derived from client state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantInfo {
    pub name: String,
    pub description: String,
    pub logo_url: String,
    pub theme_color: String,
}

impl Default for MerchantInfo {
    fn default() -> Self {
        Self {
            name: "Cosmic Numerology".to_string(),
            description: "Personalized Numerology Report".to_string(),
            logo_url: "https://numerology.example.com/images/logo.png".to_string(),
            theme_color: "#c9a227".to_string(),
        }
    }
}

/// The aggregate root of one checkout attempt. Owned exclusively by the
/// orchestrator while in flight; discarded on restart, never persisted.
#[derive(Debug, Clone)]
pub struct CheckoutTransaction {
    /// Server-assigned for the paid path (the order reference); a
    /// client-generated tag for the coupon path.
    pub id: Option<String>,
    pub path: PaymentPath,
    pub order_ref: Option<String>,
    pub payment: Option<PaymentCapture>,
    report: Option<ReportLocator>,
    state: CheckoutState,
}

impl CheckoutTransaction {
    pub fn new(path: PaymentPath) -> Self {
        Self {
            id: None,
            path,
            order_ref: None,
            payment: None,
            report: None,
            state: CheckoutState::Idle,
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn report(&self) -> Option<&ReportLocator> {
        self.report.as_ref()
    }

    pub fn advance(&mut self, next: CheckoutState) -> Result<(), CheckoutError> {
        if !self.state.can_advance_to(next) {
            return Err(CheckoutError::InvalidTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        self.state = next;
        Ok(())
    }

    /// Records the terminal report locator. At most one per transaction.
    pub fn deliver(&mut self, locator: ReportLocator) -> Result<(), CheckoutError> {
        if self.report.is_some() {
            return Err(CheckoutError::InvalidTransition {
                from: self.state.to_string(),
                to: CheckoutState::Delivered.to_string(),
            });
        }
        self.report = Some(locator);
        self.advance(CheckoutState::Delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paid_path_transition_chain() {
        use CheckoutState::*;
        let mut tx = CheckoutTransaction::new(PaymentPath::Gateway);
        for next in [Validating, OrderCreating, GatewayAwaiting, Verifying, ReportGenerating] {
            tx.advance(next).unwrap();
        }
        tx.deliver(ReportLocator("http://x/reports/a.pdf".into()))
            .unwrap();
        assert_eq!(tx.state(), Delivered);
        assert!(tx.state().is_terminal());
    }

    #[test]
    fn test_coupon_path_skips_gateway_states() {
        use CheckoutState::*;
        let mut tx = CheckoutTransaction::new(PaymentPath::Coupon);
        tx.advance(Validating).unwrap();
        tx.advance(CouponIssuing).unwrap();
        assert!(tx.advance(GatewayAwaiting).is_err());
        tx.advance(ReportGenerating).unwrap();
    }

    #[test]
    fn test_cancelled_only_from_gateway_awaiting() {
        use CheckoutState::*;
        assert!(GatewayAwaiting.can_advance_to(Cancelled));
        for state in [Idle, Validating, CouponIssuing, OrderCreating, Verifying, ReportGenerating]
        {
            assert!(!state.can_advance_to(Cancelled), "{state}");
        }
    }

    #[test]
    fn test_error_recoverable_from_every_non_terminal() {
        use CheckoutState::*;
        for state in [
            Idle,
            Validating,
            CouponIssuing,
            OrderCreating,
            GatewayAwaiting,
            Verifying,
            ReportGenerating,
        ] {
            assert!(state.can_advance_to(ErrorRecoverable), "{state}");
        }
        assert!(!Delivered.can_advance_to(ErrorRecoverable));
        assert!(!Cancelled.can_advance_to(ErrorRecoverable));
    }

    #[test]
    fn test_no_re_entry_after_exit() {
        use CheckoutState::*;
        let mut tx = CheckoutTransaction::new(PaymentPath::Gateway);
        tx.advance(Validating).unwrap();
        tx.advance(OrderCreating).unwrap();
        assert!(tx.advance(Validating).is_err());
        assert!(tx.advance(Idle).is_err());
    }

    #[test]
    fn test_report_locator_set_at_most_once() {
        use CheckoutState::*;
        let mut tx = CheckoutTransaction::new(PaymentPath::Coupon);
        tx.advance(Validating).unwrap();
        tx.advance(CouponIssuing).unwrap();
        tx.advance(ReportGenerating).unwrap();
        tx.deliver(ReportLocator("http://x/a.pdf".into())).unwrap();
        assert!(tx.deliver(ReportLocator("http://x/b.pdf".into())).is_err());
    }

    #[test]
    fn test_locator_secure_upgrade() {
        let locator = ReportLocator("http://backend/static/reports/r.pdf".into());
        assert_eq!(locator.secure(), "https://backend/static/reports/r.pdf");
        let already = ReportLocator("https://backend/r.pdf".into());
        assert_eq!(already.secure(), "https://backend/r.pdf");
    }
}
