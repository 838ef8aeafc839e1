pub mod access;
pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
