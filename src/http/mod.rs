//! HTTP client module with manual redirect handling and error classification.

mod client;

pub use client::{HttpClient, SchemePolicy};
