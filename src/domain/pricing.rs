use super::course::{Catalog, Category, CategoryCounts, Selection};
use super::money::Cents;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pricing context, decided outside the engine by whether a valid
/// membership code was presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Member,
    NonMember,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Member => write!(f, "member"),
            Tier::NonMember => write!(f, "non-member"),
        }
    }
}

/// The six-value rate card for one tier.
///
/// The values are opaque configuration. Nothing here derives one from another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTable {
    /// One Chi Kung course.
    pub unit_chi_kung: Cents,
    /// One Tai Chi Chuan course.
    pub unit_tai_chi_chuan: Cents,
    /// One Chi Kung course paired with one Tai Chi Chuan course.
    pub one_pair_bundle: Cents,
    /// Ceiling for any number of Chi Kung courses.
    pub all_chi_kung_capped: Cents,
    /// Ceiling for any number of Tai Chi Chuan courses.
    pub all_tai_chi_chuan_capped: Cents,
    /// Ceiling for the whole festival.
    pub everything_capped: Cents,
}

/// Which candidate produced the final price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Every course at its unit price (single-category selections only).
    PerCourse,
    /// As many A+B pairs as possible, leftovers at unit price.
    PairedBundle,
    /// Chi Kung at its cap, Tai Chi Chuan per course.
    ChiKungCapped,
    /// Tai Chi Chuan at its cap, Chi Kung per course.
    TaiChiChuanCapped,
    /// The whole-festival ceiling.
    EverythingCapped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    pub total: Cents,
    pub strategy: Strategy,
}

impl Pricing {
    /// Picks the cheapest candidate; ties go to the earliest one.
    fn cheapest<const N: usize>(candidates: [(Strategy, Cents); N]) -> Self {
        candidates
            .into_iter()
            .min_by_key(|(_, total)| *total)
            .map(|(strategy, total)| Self { total, strategy })
            .unwrap_or(Self {
                total: Cents::ZERO,
                strategy: Strategy::PerCourse,
            })
    }
}

impl PriceTable {
    pub fn unit(&self, category: Category) -> Cents {
        match category {
            Category::ChiKung => self.unit_chi_kung,
            Category::TaiChiChuan => self.unit_tai_chi_chuan,
        }
    }

    pub fn capped(&self, category: Category) -> Cents {
        match category {
            Category::ChiKung => self.all_chi_kung_capped,
            Category::TaiChiChuan => self.all_tai_chi_chuan_capped,
        }
    }

    /// Prices a tally of recognised courses, trying every bundle strategy
    /// and keeping the cheapest.
    pub fn price(&self, counts: CategoryCounts) -> Pricing {
        let a = counts.chi_kung;
        let b = counts.tai_chi_chuan;

        if b == 0 {
            return Pricing::cheapest([
                (Strategy::PerCourse, self.unit_chi_kung.times(a)),
                (Strategy::ChiKungCapped, self.all_chi_kung_capped),
            ]);
        }
        if a == 0 {
            return Pricing::cheapest([
                (Strategy::PerCourse, self.unit_tai_chi_chuan.times(b)),
                (Strategy::TaiChiChuanCapped, self.all_tai_chi_chuan_capped),
            ]);
        }

        let pairs = a.min(b);
        let leftover = if b > a {
            self.unit_tai_chi_chuan.times(b - pairs)
        } else {
            self.unit_chi_kung.times(a - pairs)
        };

        Pricing::cheapest([
            (Strategy::PairedBundle, self.one_pair_bundle.times(pairs) + leftover),
            (
                Strategy::ChiKungCapped,
                self.all_chi_kung_capped + self.unit_tai_chi_chuan.times(b),
            ),
            (
                Strategy::TaiChiChuanCapped,
                self.all_tai_chi_chuan_capped + self.unit_chi_kung.times(a),
            ),
            (Strategy::EverythingCapped, self.everything_capped),
        ])
    }

    /// Reports caps that could never apply because the catalog is too small
    /// for them to undercut unit pricing.
    pub fn cap_violations(&self, catalog: &Catalog) -> Vec<String> {
        let mut violations = Vec::new();
        for category in [Category::ChiKung, Category::TaiChiChuan] {
            let full = self.unit(category).times(catalog.offered(category));
            if self.capped(category) > full {
                violations.push(format!(
                    "{} cap {} exceeds {} for all {} courses",
                    category,
                    self.capped(category),
                    full,
                    catalog.offered(category)
                ));
            }
        }
        let both = self.all_chi_kung_capped + self.all_tai_chi_chuan_capped;
        if self.everything_capped > both {
            violations.push(format!(
                "everything cap {} exceeds both category caps combined ({})",
                self.everything_capped, both
            ));
        }
        violations
    }
}

/// Both rate cards plus the codes that unlock member pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSchedule {
    pub member: PriceTable,
    pub non_member: PriceTable,
    #[serde(default)]
    pub member_codes: Vec<String>,
}

impl PriceSchedule {
    /// Member tier if `coupon` matches a member code, ignoring case and
    /// surrounding whitespace.
    pub fn tier_for(&self, coupon: Option<&str>) -> Tier {
        match coupon.map(str::trim) {
            Some(code)
                if !code.is_empty()
                    && self
                        .member_codes
                        .iter()
                        .any(|known| known.trim().eq_ignore_ascii_case(code)) =>
            {
                Tier::Member
            }
            _ => Tier::NonMember,
        }
    }

    pub fn table(&self, tier: Tier) -> &PriceTable {
        match tier {
            Tier::Member => &self.member,
            Tier::NonMember => &self.non_member,
        }
    }
}

/// Total price of `selection` under `table`.
///
/// Pure and infallible: duplicates collapse, unknown courses contribute zero
/// and an empty selection costs nothing.
pub fn compute_total(selection: &Selection, catalog: &Catalog, table: &PriceTable) -> Cents {
    table.price(catalog.tally(selection)).total
}
