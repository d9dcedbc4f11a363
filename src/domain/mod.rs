//! Domain layer: course catalog, money, the pricing rules and the
//! registration records, plus the ports the workflow talks through.

pub mod course;
pub mod money;
pub mod ports;
pub mod pricing;
pub mod registration;
