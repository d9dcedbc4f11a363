use super::registration::{Charge, ChargeRequest, Registration};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn save(&self, registration: Registration) -> Result<()>;
    async fn get(&self, charge_id: &str) -> Result<Option<Registration>>;
    async fn all(&self) -> Result<Vec<Registration>>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charges the card. A declined card is `RegistrationError::PaymentDeclined`.
    async fn charge(&self, request: ChargeRequest) -> Result<Charge>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_confirmation(&self, registration: &Registration) -> Result<()>;
}

pub type RegistrationStoreBox = Box<dyn RegistrationStore>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type MailerBox = Box<dyn Mailer>;
