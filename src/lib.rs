pub mod config;
pub mod demo;
pub mod error;
pub mod infra;
pub mod portal;
pub mod telemetry;
