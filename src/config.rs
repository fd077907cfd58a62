use rust_decimal::Decimal;

/// Runtime configuration, read once at startup.
///
/// Pricing is fixed here and never taken from client input; the checkout flow
/// only ever displays it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the report backend; report locators are minted under it.
    pub base_url: String,
    /// Report price in paise (minor units).
    pub report_price_paise: u64,
    /// The active promotional coupon code.
    pub coupon_code: String,
    /// Optional monitoring DSN, passed through to the telemetry layer.
    pub monitoring_dsn: Option<String>,
}

impl Config {
    pub const DEFAULT_PRICE_PAISE: u64 = 69_900; // 699.00 INR
    pub const DEFAULT_COUPON_CODE: &str = "vijay";
    pub const CURRENCY: &str = "INR";

    pub fn from_env() -> Self {
        let report_price_paise = std::env::var("NUMERA_REPORT_PRICE_PAISE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Self::DEFAULT_PRICE_PAISE);
        Self {
            base_url: std::env::var("NUMERA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            report_price_paise,
            coupon_code: std::env::var("NUMERA_COUPON_CODE")
                .unwrap_or_else(|_| Self::DEFAULT_COUPON_CODE.to_string()),
            monitoring_dsn: std::env::var("NUMERA_MONITORING_DSN").ok(),
        }
    }

    /// Price in major units, for display and analytics values.
    pub fn display_price(&self) -> Decimal {
        Decimal::from(self.report_price_paise) / Decimal::from(100)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            report_price_paise: Self::DEFAULT_PRICE_PAISE,
            coupon_code: Self::DEFAULT_COUPON_CODE.to_string(),
            monitoring_dsn: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_display_price_is_major_units() {
        let config = Config::default();
        assert_eq!(config.display_price(), dec!(699.00));
    }
}
