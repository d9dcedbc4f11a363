use super::pricing::PricingEngine;
use crate::domain::ports::{MailerBox, PaymentGatewayBox, RegistrationStoreBox};
use crate::domain::registration::{ChargeRequest, Registration, RegistrationForm};
use crate::error::{RegistrationError, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Currency every charge is made in.
pub const CURRENCY: &str = "usd";

/// The checkout workflow around the pricing engine.
///
/// `RegistrationService` owns the storage, payment and mail backends. It
/// re-prices every submission before charging, so a client can never pay a
/// different amount than the engine computes.
pub struct RegistrationService {
    pricing: Arc<PricingEngine>,
    store: RegistrationStoreBox,
    gateway: PaymentGatewayBox,
    mailer: MailerBox,
}

impl RegistrationService {
    /// Creates a new `RegistrationService`.
    ///
    /// # Arguments
    ///
    /// * `pricing` - The shared, immutable pricing engine.
    /// * `store` - Where paid registrations are persisted.
    /// * `gateway` - The card payment backend.
    /// * `mailer` - Sends confirmation emails.
    pub fn new(
        pricing: Arc<PricingEngine>,
        store: RegistrationStoreBox,
        gateway: PaymentGatewayBox,
        mailer: MailerBox,
    ) -> Self {
        Self {
            pricing,
            store,
            gateway,
            mailer,
        }
    }

    /// Charges, persists and confirms one registration.
    ///
    /// Nothing is charged unless the form is valid, at least one known course
    /// is selected and `amount_paid` equals the freshly computed total.
    /// Nothing is stored unless the charge succeeded, and no email is sent
    /// unless the registration was stored. A failed email does not undo the
    /// registration.
    pub async fn finalize(&self, form: RegistrationForm) -> Result<Registration> {
        form.validate()?;

        let selection = form.selection();
        let quote = self.pricing.quote(&selection, form.coupon.as_deref());
        if quote.courses.is_empty() {
            return Err(RegistrationError::NoCoursesSelected);
        }
        if form.amount_paid != quote.total {
            warn!(
                email = %form.email,
                submitted = form.amount_paid.value(),
                expected = quote.total.value(),
                "Submitted amount does not match computed total"
            );
            return Err(RegistrationError::AmountMismatch {
                submitted: form.amount_paid,
                expected: quote.total,
            });
        }

        let charge = self
            .gateway
            .charge(ChargeRequest {
                amount: quote.total,
                currency: CURRENCY.to_string(),
                card_token: form.card_token.clone(),
                description: form.charge_description(),
            })
            .await?;

        let registration = Registration::new(&form, self.pricing.event(), quote.tier, &charge);
        self.store.save(registration.clone()).await?;
        info!(
            charge_id = %registration.charge_id,
            email = %registration.email,
            amount = %registration.amount_paid,
            "Registration saved"
        );

        if let Err(e) = self.mailer.send_confirmation(&registration).await {
            warn!(email = %registration.email, "Failed to send confirmation: {}", e);
        }

        Ok(registration)
    }

    /// Consumes the service and returns every stored registration.
    pub async fn into_registrations(self) -> Result<Vec<Registration>> {
        self.store.all().await
    }
}
