//! CSV batch interface: registration forms in, receipts out.

pub mod receipt_writer;
pub mod registration_reader;
