//! Search orchestration module
//!
//! Validates queries, hands them to the configured provider and tracks the
//! outcome of the most recent dispatch.

mod dispatcher;
mod error;
mod models;

pub use dispatcher::{Dispatch, DispatchOptions, DispatchSnapshot, Dispatcher};
pub use error::SearchError;
pub use models::*;
