//! Domain module for token ancestry validation
//!
//! Contains core entities, value objects, errors, and invariants.
//! No I/O: store access goes through the ports in `crate::ports`.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use value_objects::*;
