use crate::error::{RegistrationError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// The two mutually exclusive course groupings of the festival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    ChiKung,
    TaiChiChuan,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::ChiKung => write!(f, "chi-kung"),
            Category::TaiChiChuan => write!(f, "tai-chi-chuan"),
        }
    }
}

/// Opaque name of one catalog course, e.g. "Cosmic Shower".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CourseId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for CourseId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub name: CourseId,
    pub category: Category,
}

/// A set of course ids picked for one registration attempt.
///
/// Duplicates collapse and order is irrelevant. Unknown ids are kept here and
/// only dropped when tallied against a [`Catalog`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(BTreeSet<CourseId>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, course: impl Into<CourseId>) -> bool {
        self.0.insert(course.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CourseId> {
        self.0.iter()
    }
}

impl<T: Into<CourseId>> FromIterator<T> for Selection {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Number of selected, recognised courses per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryCounts {
    pub chi_kung: u64,
    pub tai_chi_chuan: u64,
}

impl CategoryCounts {
    pub fn new(chi_kung: u64, tai_chi_chuan: u64) -> Self {
        Self {
            chi_kung,
            tai_chi_chuan,
        }
    }

    fn bump(&mut self, category: Category) {
        match category {
            Category::ChiKung => self.chi_kung += 1,
            Category::TaiChiChuan => self.tai_chi_chuan += 1,
        }
    }
}

/// The static course catalog with a precomputed name → category index.
#[derive(Debug, Clone)]
pub struct Catalog {
    courses: Vec<Course>,
    index: HashMap<CourseId, Category>,
}

impl Catalog {
    /// Builds the catalog, rejecting an empty list, blank names and names
    /// listed twice.
    pub fn new(courses: Vec<Course>) -> Result<Self> {
        if courses.is_empty() {
            return Err(RegistrationError::ConfigError(
                "Catalog must list at least one course".to_string(),
            ));
        }
        let mut index = HashMap::with_capacity(courses.len());
        for course in &courses {
            if course.name.as_str().trim().is_empty() {
                return Err(RegistrationError::ConfigError(
                    "Course name must not be empty".to_string(),
                ));
            }
            if index.insert(course.name.clone(), course.category).is_some() {
                return Err(RegistrationError::ConfigError(format!(
                    "Course '{}' is listed more than once",
                    course.name
                )));
            }
        }
        Ok(Self { courses, index })
    }

    pub fn category_of(&self, course: &CourseId) -> Option<Category> {
        self.index.get(course).copied()
    }

    /// Courses in catalog order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Number of distinct courses offered in `category`.
    pub fn offered(&self, category: Category) -> u64 {
        self.index.values().filter(|c| **c == category).count() as u64
    }

    /// Counts recognised courses in `selection` per category.
    pub fn tally(&self, selection: &Selection) -> CategoryCounts {
        let mut counts = CategoryCounts::default();
        for category in selection.iter().filter_map(|id| self.category_of(id)) {
            counts.bump(category);
        }
        counts
    }
}
