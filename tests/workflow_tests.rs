use async_trait::async_trait;
use festreg::application::registration::RegistrationService;
use festreg::config::PricingConfig;
use festreg::domain::course::CourseId;
use festreg::domain::money::Cents;
use festreg::domain::ports::{Mailer, RegistrationStore};
use festreg::domain::registration::{Registration, RegistrationForm};
use festreg::error::{RegistrationError, Result};
use festreg::infrastructure::in_memory::{
    DECLINED_TOKEN, InMemoryPaymentGateway, InMemoryRegistrationStore, LogMailer,
};
use std::sync::Arc;

struct BrokenStore;

#[async_trait]
impl RegistrationStore for BrokenStore {
    async fn save(&self, _registration: Registration) -> Result<()> {
        Err(RegistrationError::StorageError("disk full".to_string()))
    }

    async fn get(&self, _charge_id: &str) -> Result<Option<Registration>> {
        Ok(None)
    }

    async fn all(&self) -> Result<Vec<Registration>> {
        Ok(Vec::new())
    }
}

struct BrokenMailer;

#[async_trait]
impl Mailer for BrokenMailer {
    async fn send_confirmation(&self, _registration: &Registration) -> Result<()> {
        Err(RegistrationError::InternalError("smtp unreachable".into()))
    }
}

fn form(token: &str) -> RegistrationForm {
    RegistrationForm {
        name: "Paul Funktower".to_string(),
        email: "pfunk@example.com".to_string(),
        phone: "(555) 123-1234".to_string(),
        courses: vec![
            CourseId::from("Cosmic Shower"),
            CourseId::from("Wudang Tai Chi Chuan"),
        ],
        coupon: None,
        amount_paid: Cents(70000),
        card_token: token.to_string(),
    }
}

fn engine() -> Arc<festreg::application::pricing::PricingEngine> {
    Arc::new(PricingConfig::builtin().unwrap().into_engine().unwrap())
}

#[tokio::test]
async fn test_failed_save_sends_no_email() {
    let mailer = LogMailer::new();
    let service = RegistrationService::new(
        engine(),
        Box::new(BrokenStore),
        Box::new(InMemoryPaymentGateway::new()),
        Box::new(mailer.clone()),
    );

    let result = service.finalize(form("tok_visa")).await;
    assert!(matches!(result, Err(RegistrationError::StorageError(_))));
    assert!(mailer.outbox().await.is_empty());
}

#[tokio::test]
async fn test_failed_email_keeps_registration() {
    let store = InMemoryRegistrationStore::new();
    let service = RegistrationService::new(
        engine(),
        Box::new(store.clone()),
        Box::new(InMemoryPaymentGateway::new()),
        Box::new(BrokenMailer),
    );

    let registration = service.finalize(form("tok_visa")).await.unwrap();
    assert_eq!(registration.charge_id, "ch_000001");
    assert_eq!(registration.payment_fee, Cents(2060));
    assert!(store.get("ch_000001").await.unwrap().is_some());
}

#[tokio::test]
async fn test_declined_card_stores_and_sends_nothing() {
    let store = InMemoryRegistrationStore::new();
    let mailer = LogMailer::new();
    let gateway = InMemoryPaymentGateway::new();
    let service = RegistrationService::new(
        engine(),
        Box::new(store.clone()),
        Box::new(gateway.clone()),
        Box::new(mailer.clone()),
    );

    let result = service.finalize(form(DECLINED_TOKEN)).await;
    assert!(matches!(result, Err(RegistrationError::PaymentDeclined(_))));
    assert!(store.all().await.unwrap().is_empty());
    assert!(mailer.outbox().await.is_empty());
    assert!(gateway.charges().await.is_empty());
}

#[tokio::test]
async fn test_mismatch_is_never_charged() {
    let gateway = InMemoryPaymentGateway::new();
    let service = RegistrationService::new(
        engine(),
        Box::new(InMemoryRegistrationStore::new()),
        Box::new(gateway.clone()),
        Box::new(LogMailer::new()),
    );

    let mut tampered = form("tok_visa");
    tampered.coupon = Some("member2012".to_string());
    let result = service.finalize(tampered).await;
    assert!(matches!(
        result,
        Err(RegistrationError::AmountMismatch {
            submitted: Cents(70000),
            expected: Cents(60000),
        })
    ));
    assert!(gateway.charges().await.is_empty());
}

#[tokio::test]
async fn test_resumed_run_never_reuses_a_stored_charge_id() {
    let store = InMemoryRegistrationStore::new();

    // An earlier run charged ch_000001 without storing it, then stored ch_000002.
    let earlier = RegistrationService::new(
        engine(),
        Box::new(store.clone()),
        Box::new(InMemoryPaymentGateway::new().resume_after(1)),
        Box::new(LogMailer::new()),
    );
    let first = earlier.finalize(form("tok_visa")).await.unwrap();
    assert_eq!(first.charge_id, "ch_000002");

    let existing = store.all().await.unwrap();
    let service = RegistrationService::new(
        engine(),
        Box::new(store.clone()),
        Box::new(InMemoryPaymentGateway::new().resume_from(&existing)),
        Box::new(LogMailer::new()),
    );
    let mut next = form("tok_visa");
    next.name = "Ada Lin".to_string();
    next.email = "ada@example.com".to_string();
    let second = service.finalize(next).await.unwrap();

    assert_eq!(second.charge_id, "ch_000003");
    let all = store.all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "Paul Funktower");
    assert_eq!(all[1].name, "Ada Lin");
}
