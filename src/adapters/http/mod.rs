//! HTTP adapters - REST API implementations.
//!
//! The public access context exposes the counterparty-facing endpoints.

pub mod access;

// Re-export key types for convenience
pub use access::access_routes;
pub use access::AccessHandlers;
