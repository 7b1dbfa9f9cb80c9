//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the Signet domain.

mod email_address;
mod errors;
mod ids;
mod timestamp;

pub use email_address::EmailAddress;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::ProposalId;
pub use timestamp::Timestamp;
