pub mod admissions;
pub mod config;
pub mod error;
pub mod site;
pub mod telemetry;
