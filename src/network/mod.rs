//! HTTP networking module
//!
//! Provides the HTTP client the search providers send their requests through.

mod client;
mod headers;

pub use client::HttpClient;
pub use headers::{accept_json, accept_language, default_user_agent};
