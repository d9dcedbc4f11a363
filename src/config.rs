use crate::application::pricing::PricingEngine;
use crate::domain::course::{Catalog, Course};
use crate::domain::pricing::PriceSchedule;
use crate::error::Result;
use serde::Deserialize;
use std::path::Path;

const BUILTIN: &str = include_str!("../config/pricing.toml");

/// Event catalog and rate cards, read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    pub event: String,
    pub courses: Vec<Course>,
    pub prices: PriceSchedule,
}

impl PricingConfig {
    /// The rate card of the 2012 festival, compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Builds the catalog index and freezes everything into an engine.
    pub fn into_engine(self) -> Result<PricingEngine> {
        let catalog = Catalog::new(self.courses)?;
        Ok(PricingEngine::new(self.event, catalog, self.prices))
    }
}
