pub mod checkout;
pub mod coupon;
pub mod form;
pub mod numerology;
pub mod ports;
pub mod validation;
