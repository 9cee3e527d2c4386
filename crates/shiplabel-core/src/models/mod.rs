//! Data models: extracted label data and pipeline configuration.

pub mod config;
pub mod label;
