pub mod config;
pub mod error;
pub mod outreach;
pub mod telemetry;
