pub mod aggregate;
pub mod dashboard;
pub mod enrichment;
pub mod power_curve;
pub mod presentation;
pub mod records;
pub mod weather;
