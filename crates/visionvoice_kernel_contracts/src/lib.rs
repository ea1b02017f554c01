#![forbid(unsafe_code)]

pub mod common;
pub mod morph;
pub mod order;

pub use common::{ContractViolation, ReasonCodeId, SchemaVersion, TurnId, Validate};
