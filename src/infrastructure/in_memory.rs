use crate::domain::money::Cents;
use crate::domain::ports::{Mailer, PaymentGateway, RegistrationStore};
use crate::domain::registration::{Charge, ChargeRequest, Registration};
use crate::error::{RegistrationError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Card token the in-memory gateway always declines.
pub const DECLINED_TOKEN: &str = "tok_chargeDeclined";

const CHARGE_PREFIX: &str = "ch_";

/// A thread-safe in-memory store for registrations, keyed by charge id.
///
/// Uses `Arc<RwLock<HashMap<String, Registration>>>` so clones share state.
/// Ideal for testing or runs where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryRegistrationStore {
    registrations: Arc<RwLock<HashMap<String, Registration>>>,
}

impl InMemoryRegistrationStore {
    /// Creates a new, empty in-memory registration store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationStore for InMemoryRegistrationStore {
    async fn save(&self, registration: Registration) -> Result<()> {
        let mut registrations = self.registrations.write().await;
        if registrations.contains_key(&registration.charge_id) {
            return Err(RegistrationError::StorageError(format!(
                "Registration {} already exists",
                registration.charge_id
            )));
        }
        registrations.insert(registration.charge_id.clone(), registration);
        Ok(())
    }

    async fn get(&self, charge_id: &str) -> Result<Option<Registration>> {
        let registrations = self.registrations.read().await;
        Ok(registrations.get(charge_id).cloned())
    }

    async fn all(&self) -> Result<Vec<Registration>> {
        let registrations = self.registrations.read().await;
        let mut all: Vec<Registration> = registrations.values().cloned().collect();
        all.sort_by(|a, b| a.charge_id.cmp(&b.charge_id));
        Ok(all)
    }
}

#[derive(Default)]
struct GatewayState {
    next_id: u64,
    charges: Vec<ChargeRequest>,
}

/// A payment gateway that never leaves the process.
///
/// Accepts any non-empty card token except the configured declined ones,
/// hands out sequential charge ids and applies a 2.9% + 30¢ processing fee.
#[derive(Clone)]
pub struct InMemoryPaymentGateway {
    state: Arc<RwLock<GatewayState>>,
    declined: Arc<HashSet<String>>,
}

impl Default for InMemoryPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPaymentGateway {
    pub fn new() -> Self {
        Self::with_declined_tokens([DECLINED_TOKEN])
    }

    pub fn with_declined_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            state: Arc::new(RwLock::new(GatewayState::default())),
            declined: Arc::new(tokens.into_iter().map(Into::into).collect()),
        }
    }

    /// Continues numbering after `issued` earlier charges.
    pub fn resume_after(self, issued: u64) -> Self {
        let state = GatewayState {
            next_id: issued,
            charges: Vec::new(),
        };
        Self {
            state: Arc::new(RwLock::new(state)),
            ..self
        }
    }

    /// Continues numbering after the highest charge id among `registrations`.
    ///
    /// Ids not issued by this gateway are ignored.
    pub fn resume_from(self, registrations: &[Registration]) -> Self {
        let issued = registrations
            .iter()
            .filter_map(|r| r.charge_id.strip_prefix(CHARGE_PREFIX))
            .filter_map(|n| n.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        self.resume_after(issued)
    }

    /// Every successful charge request, in order.
    pub async fn charges(&self) -> Vec<ChargeRequest> {
        self.state.read().await.charges.clone()
    }

    /// 2.9% of the amount, rounded half up, plus 30 cents.
    pub fn fee_for(amount: Cents) -> Cents {
        let percent = amount.value().saturating_mul(29).saturating_add(500) / 1000;
        Cents(percent) + Cents(30)
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn charge(&self, request: ChargeRequest) -> Result<Charge> {
        if request.card_token.trim().is_empty() {
            return Err(RegistrationError::PaymentDeclined(
                "Card token is missing".to_string(),
            ));
        }
        if self.declined.contains(&request.card_token) {
            return Err(RegistrationError::PaymentDeclined(
                "Your card was declined".to_string(),
            ));
        }

        let mut state = self.state.write().await;
        state.next_id += 1;
        let charge = Charge {
            id: format!("{}{:06}", CHARGE_PREFIX, state.next_id),
            amount: request.amount,
            fee: Self::fee_for(request.amount),
        };
        state.charges.push(request);
        Ok(charge)
    }
}

/// A mailer that logs confirmations and keeps them in an outbox.
#[derive(Default, Clone)]
pub struct LogMailer {
    outbox: Arc<RwLock<Vec<Registration>>>,
}

impl LogMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn outbox(&self) -> Vec<Registration> {
        self.outbox.read().await.clone()
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_confirmation(&self, registration: &Registration) -> Result<()> {
        info!(
            to = %registration.email,
            event = %registration.event,
            amount = %registration.amount_paid,
            "Sending registration confirmation"
        );
        self.outbox.write().await.push(registration.clone());
        Ok(())
    }
}
