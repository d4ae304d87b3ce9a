//! Gemini outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `ReceiptExtractor`
//! port against the `generateContent` endpoint.

mod dto;
mod http_extractor;

pub use http_extractor::{DEFAULT_GEMINI_ENDPOINT, DEFAULT_GEMINI_MODEL, GeminiReceiptExtractor};
