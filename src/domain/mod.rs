//! Domain layer types and invariants.

pub mod entities;
pub mod error;
pub mod inputs;
pub mod slug;
pub mod types;
pub mod validation;
