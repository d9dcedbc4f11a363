use crate::domain::money::Cents;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDBError(#[from] rocksdb::Error),
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("No courses selected")]
    NoCoursesSelected,
    #[error("Amount mismatch: submitted {submitted}, expected {expected}")]
    AmountMismatch { submitted: Cents, expected: Cents },
    #[error("Payment declined: {0}")]
    PaymentDeclined(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, RegistrationError>;
