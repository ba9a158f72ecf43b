pub mod applications;
pub mod config;
pub mod error;
pub mod feeds;
pub mod telemetry;
