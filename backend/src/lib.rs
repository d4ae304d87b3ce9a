//! Receipt-to-route delivery backend.
//!
//! Routes, images, history entries and delivery photos all live in one flat
//! key-value store. The [`domain`] implements every operation; [`inbound`]
//! exposes them over HTTP and [`outbound`] adapts Redis, the in-memory store
//! and the Gemini extraction service.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
