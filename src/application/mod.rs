//! Application layer - Commands, Handlers, and the access flow.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers perform one operation each; `AccessFlow` strings them into the
//! view model a visitor walks through.

pub mod access_flow;
pub mod asset_urls;
pub mod handlers;

pub use access_flow::{AccessFlow, FlowStage};
pub use asset_urls::AssetUrlService;
pub use handlers::{
    // Access handlers
    AccessPolicy,
    RequestAccessCodeCommand, RequestAccessCodeHandler, RequestCodeOutcome,
    UnlockedProposal, VerifyAccessCodeCommand, VerifyAccessCodeHandler,
    // Signature handlers
    CountersignCommand, CountersignHandler, CountersignResult,
};
