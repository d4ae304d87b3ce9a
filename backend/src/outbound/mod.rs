//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **kv**: the flat key-value store (in-memory or Redis via `bb8-redis`)
//! - **gemini**: the receipt vision service over `reqwest`
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod gemini;
pub mod kv;
