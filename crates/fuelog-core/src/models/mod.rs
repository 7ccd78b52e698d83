//! Data models for fuel records, trip metrics, sink rows and configuration.

pub mod config;
pub mod record;
pub mod row;
