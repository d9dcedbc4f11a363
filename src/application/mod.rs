//! Application layer containing the pricing and checkout orchestration.
//!
//! `PricingEngine` wraps the immutable catalog and rate cards and produces
//! quotes. `RegistrationService` drives the checkout flow: re-price, charge,
//! persist, confirm.

pub mod pricing;
pub mod registration;
