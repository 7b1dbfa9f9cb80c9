//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod access;
pub mod signature;

pub use access::{
    AccessPolicy, RequestAccessCodeCommand, RequestAccessCodeHandler, RequestCodeOutcome,
    UnlockedProposal, VerifyAccessCodeCommand, VerifyAccessCodeHandler,
};
pub use signature::{CountersignCommand, CountersignHandler, CountersignResult};
