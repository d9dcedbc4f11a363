use crate::domain::course::CourseId;
use crate::domain::money::Cents;
use crate::domain::registration::RegistrationForm;
use crate::error::{RegistrationError, Result};
use serde::Deserialize;
use std::io::Read;

/// One CSV row as submitted. `courses` is a comma-separated list inside a
/// single quoted field.
#[derive(Debug, Deserialize)]
struct RegistrationRecord {
    name: String,
    email: String,
    phone: String,
    courses: String,
    coupon: Option<String>,
    amount_paid: u64,
    card_token: String,
}

impl From<RegistrationRecord> for RegistrationForm {
    fn from(record: RegistrationRecord) -> Self {
        let courses = record
            .courses
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(CourseId::from)
            .collect();
        let coupon = record
            .coupon
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Self {
            name: record.name,
            email: record.email,
            phone: record.phone,
            courses,
            coupon,
            amount_paid: Cents(record.amount_paid),
            card_token: record.card_token,
        }
    }
}

/// Reads registration forms from a CSV source.
///
/// Expects the header `name,email,phone,courses,coupon,amount_paid,card_token`.
/// Whitespace around fields is trimmed.
pub struct RegistrationReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RegistrationReader<R> {
    /// Creates a new `RegistrationReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and converts each row.
    pub fn registrations(self) -> impl Iterator<Item = Result<RegistrationForm>> {
        self.reader
            .into_deserialize::<RegistrationRecord>()
            .map(|result| {
                result
                    .map(RegistrationForm::from)
                    .map_err(RegistrationError::from)
            })
    }
}
