//! Ports module for token ancestry validation
//!
//! Defines inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::DagValidationApi;
pub use outbound::{RecordStore, TokenClassifier, TransactionCache, ValidatedTxStore};
