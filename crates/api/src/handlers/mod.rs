//! HTTP handlers, one module per resource area.

pub mod dashboard;
pub mod generate;
pub mod rate_limit;
pub mod readmes;
