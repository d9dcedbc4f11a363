use crate::domain::registration::{Registration, RegistrationForm};
use crate::error::{RegistrationError, Result};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Registered,
    Rejected,
}

/// Outcome of one processed row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub name: String,
    pub email: String,
    pub tier: String,
    pub amount: String,
    pub status: ReceiptStatus,
    pub reason: String,
    pub charge_id: String,
}

impl Receipt {
    pub fn registered(registration: &Registration) -> Self {
        Self {
            name: registration.name.clone(),
            email: registration.email.clone(),
            tier: registration.tier.to_string(),
            amount: registration.amount_paid.to_string(),
            status: ReceiptStatus::Registered,
            reason: String::new(),
            charge_id: registration.charge_id.clone(),
        }
    }

    /// A receipt for a form that was never charged. `amount` echoes what the
    /// client submitted.
    pub fn rejected(form: &RegistrationForm, error: &RegistrationError) -> Self {
        Self {
            name: form.name.clone(),
            email: form.email.clone(),
            tier: String::new(),
            amount: form.amount_paid.to_string(),
            status: ReceiptStatus::Rejected,
            reason: error.to_string(),
            charge_id: String::new(),
        }
    }

    /// A receipt for a row that could not be parsed into a form.
    pub fn unreadable(error: &RegistrationError) -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            tier: String::new(),
            amount: String::new(),
            status: ReceiptStatus::Rejected,
            reason: error.to_string(),
            charge_id: String::new(),
        }
    }
}

/// Writes receipts as CSV with a header row.
pub struct ReceiptWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReceiptWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_receipt(&mut self, receipt: &Receipt) -> Result<()> {
        self.writer.serialize(receipt)?;
        Ok(())
    }

    pub fn write_receipts<I>(&mut self, receipts: I) -> Result<()>
    where
        I: IntoIterator<Item = Receipt>,
    {
        for receipt in receipts {
            self.write_receipt(&receipt)?;
        }
        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
