//! Result types and dispatch outcomes
//!
//! Provider payloads are normalized into these types, whatever their shape.

mod outcome;
mod types;

pub use outcome::{FailureKind, FailureReason, SearchOutcome};
pub use types::*;
