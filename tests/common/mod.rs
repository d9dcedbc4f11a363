#![allow(dead_code)]

use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const HEADER: [&str; 7] = [
    "name",
    "email",
    "phone",
    "courses",
    "coupon",
    "amount_paid",
    "card_token",
];

pub const CHI_KUNG: [&str; 4] = [
    "Generating Energy Flow",
    "Cosmic Shower",
    "Abdominal Breathing",
    "Merging with the Cosmos",
];

pub const TAI_CHI_CHUAN: [&str; 4] = [
    "Fundamentals of Tai Chi Chuan",
    "108-Pattern Yang style Tai Chi Chuan",
    "Flowing Water Floating Clouds",
    "Wudang Tai Chi Chuan",
];

/// Writes `rows` valid single-course registrations, each paying $300.00.
pub fn generate_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(HEADER)?;

    for i in 1..=rows {
        let name = format!("Attendee {}", i);
        let email = format!("attendee{}@example.com", i);
        wtr.write_record([
            name.as_str(),
            email.as_str(),
            "555-0100",
            CHI_KUNG[i % CHI_KUNG.len()],
            "",
            "30000",
            "tok_visa",
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
