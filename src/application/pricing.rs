use crate::domain::course::{Catalog, CourseId, Selection};
use crate::domain::money::Cents;
use crate::domain::pricing::{PriceSchedule, PriceTable, Strategy, Tier};
use serde::Serialize;
use tracing::debug;

/// A price quote for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    /// Recognised courses, in catalog order.
    pub courses: Vec<CourseId>,
    pub tier: Tier,
    pub total: Cents,
    pub strategy: Strategy,
}

/// The configured pricing engine: catalog, both rate cards and event name.
///
/// Immutable once built, so it can be shared behind an `Arc` by any number
/// of callers without locking.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    event: String,
    catalog: Catalog,
    schedule: PriceSchedule,
}

impl PricingEngine {
    pub fn new(event: String, catalog: Catalog, schedule: PriceSchedule) -> Self {
        Self {
            event,
            catalog,
            schedule,
        }
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tier_for(&self, coupon: Option<&str>) -> Tier {
        self.schedule.tier_for(coupon)
    }

    pub fn table(&self, tier: Tier) -> &PriceTable {
        self.schedule.table(tier)
    }

    /// Total for `selection` at `tier`.
    pub fn total(&self, selection: &Selection, tier: Tier) -> Cents {
        crate::domain::pricing::compute_total(selection, &self.catalog, self.table(tier))
    }

    /// Quotes `selection`, picking the tier from `coupon`.
    pub fn quote(&self, selection: &Selection, coupon: Option<&str>) -> Quote {
        let tier = self.tier_for(coupon);
        let counts = self.catalog.tally(selection);
        let pricing = self.table(tier).price(counts);

        let courses = self
            .catalog
            .courses()
            .iter()
            .filter(|c| selection.iter().any(|id| *id == c.name))
            .map(|c| c.name.clone())
            .collect();

        debug!(
            ?tier,
            chi_kung = counts.chi_kung,
            tai_chi_chuan = counts.tai_chi_chuan,
            total = pricing.total.value(),
            strategy = ?pricing.strategy,
            "Priced selection"
        );

        Quote {
            courses,
            tier,
            total: pricing.total,
            strategy: pricing.strategy,
        }
    }

    /// Cap misconfigurations for both tiers, prefixed with the tier name.
    pub fn cap_violations(&self) -> Vec<String> {
        [Tier::NonMember, Tier::Member]
            .into_iter()
            .flat_map(|tier| {
                self.table(tier)
                    .cap_violations(&self.catalog)
                    .into_iter()
                    .map(move |v| format!("{}: {}", tier, v))
            })
            .collect()
    }
}
