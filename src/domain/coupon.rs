/// Advisory check of a submitted code against the active promotional code.
///
/// This is a UX pre-filter only; the report service re-verifies the code and
/// its verdict is authoritative.
#[derive(Debug, Clone)]
pub struct CouponGate {
    active_code: String,
}

impl CouponGate {
    pub fn new(active_code: impl Into<String>) -> Self {
        Self {
            active_code: active_code.into(),
        }
    }

    /// Case-insensitive match on trimmed input.
    pub fn matches(&self, code: &str) -> bool {
        code.trim().eq_ignore_ascii_case(&self.active_code)
    }
}

/// Coupon input state. `applied` holds only for the exact code value it was
/// granted for: any edit resets it, even if the new value matches again.
#[derive(Debug, Clone, Default)]
pub struct CouponState {
    code: String,
    applied: bool,
    error: Option<String>,
}

impl CouponState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn applied(&self) -> bool {
        self.applied
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Any edit to the code invalidates a previous application.
    pub fn set_code(&mut self, code: impl Into<String>) {
        let code = code.into();
        if code != self.code {
            self.applied = false;
            self.error = None;
        }
        self.code = code;
    }

    pub fn apply(&mut self, gate: &CouponGate) {
        if gate.matches(&self.code) {
            self.applied = true;
            self.error = None;
        } else {
            self.applied = false;
            self.error = Some("Invalid coupon code".to_string());
        }
    }
}
