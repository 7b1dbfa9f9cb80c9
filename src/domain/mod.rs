//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `proposal` - Proposal aggregate, content snapshot, and status lifecycle
//! - `access` - One-time codes, access sessions, and the access error vocabulary
//! - `asset` - Asset reference resolution and signature image validation

pub mod access;
pub mod asset;
pub mod foundation;
pub mod proposal;
