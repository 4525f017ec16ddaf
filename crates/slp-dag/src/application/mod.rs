//! # Application Module
//!
//! Application service orchestrating the algorithms and outbound ports.

pub mod service;

pub use service::{DagStats, DagValidationService};
