//! PostgreSQL adapters - Database implementations for the store ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresProposalStore` - Proposal reads and the conditional countersign write
//! - `PostgresAccessSessionStore` - Ephemeral (proposal, email) access sessions

mod access_session_store;
mod proposal_store;

pub use access_session_store::PostgresAccessSessionStore;
pub use proposal_store::PostgresProposalStore;
