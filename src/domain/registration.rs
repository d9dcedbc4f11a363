use super::course::{CourseId, Selection};
use super::money::Cents;
use super::pricing::Tier;
use crate::error::{RegistrationError, Result};
use serde::{Deserialize, Serialize};

/// What an attendee submits at checkout.
///
/// `amount_paid` is the amount the client echoed back from the quote page and
/// is never trusted; it is re-derived before charging.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub courses: Vec<CourseId>,
    pub coupon: Option<String>,
    pub amount_paid: Cents,
    pub card_token: String,
}

impl RegistrationForm {
    /// Checks the payer details. Course selection and amount are checked
    /// separately by the workflow.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RegistrationError::ValidationError(
                "Name is required".to_string(),
            ));
        }
        if !self.email.contains('@') {
            return Err(RegistrationError::ValidationError(format!(
                "Invalid email address '{}'",
                self.email
            )));
        }
        if self.phone.trim().is_empty() {
            return Err(RegistrationError::ValidationError(
                "Phone number is required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn selection(&self) -> Selection {
        self.courses.iter().cloned().collect()
    }

    /// Charge description shown on the payer's statement.
    pub fn charge_description(&self) -> String {
        let courses: Vec<&str> = self.courses.iter().map(CourseId::as_str).collect();
        format!("{}: {}", self.name, courses.join(","))
    }
}

/// A request to the payment gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeRequest {
    pub amount: Cents,
    pub currency: String,
    pub card_token: String,
    pub description: String,
}

/// A successful gateway charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub id: String,
    pub amount: Cents,
    pub fee: Cents,
}

/// A paid, persisted registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub courses: Vec<CourseId>,
    pub event: String,
    pub tier: Tier,
    pub amount_paid: Cents,
    pub payment_fee: Cents,
    pub charge_id: String,
}

impl Registration {
    pub fn new(form: &RegistrationForm, event: &str, tier: Tier, charge: &Charge) -> Self {
        Self {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            courses: form.courses.clone(),
            event: event.to_string(),
            tier,
            amount_paid: charge.amount,
            payment_fee: charge.fee,
            charge_id: charge.id.clone(),
        }
    }
}
