use crate::domain::ports::RegistrationStore;
use crate::domain::registration::Registration;
use crate::error::{RegistrationError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing paid registrations.
pub const CF_REGISTRATIONS: &str = "registrations";

/// A persistent registration store backed by RocksDB.
///
/// Registrations are stored as JSON, keyed by their charge id, in a dedicated
/// Column Family. Clones share the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDBRegistrationStore {
    db: Arc<DB>,
}

impl RocksDBRegistrationStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "registrations" column family exists.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_registrations = ColumnFamilyDescriptor::new(CF_REGISTRATIONS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_registrations])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_REGISTRATIONS).ok_or_else(|| {
            RegistrationError::StorageError("Registrations column family not found".to_string())
        })
    }
}

#[async_trait]
impl RegistrationStore for RocksDBRegistrationStore {
    async fn save(&self, registration: Registration) -> Result<()> {
        let cf = self.cf()?;
        let key = registration.charge_id.as_bytes();
        if self.db.get_pinned_cf(cf, key)?.is_some() {
            return Err(RegistrationError::StorageError(format!(
                "Registration {} already exists",
                registration.charge_id
            )));
        }
        let value = serde_json::to_vec(&registration)?;
        self.db.put_cf(cf, key, value)?;
        Ok(())
    }

    async fn get(&self, charge_id: &str) -> Result<Option<Registration>> {
        let cf = self.cf()?;
        match self.db.get_cf(cf, charge_id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn all(&self) -> Result<Vec<Registration>> {
        let cf = self.cf()?;
        let mut registrations = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            registrations.push(serde_json::from_slice(&value)?);
        }
        Ok(registrations)
    }
}
