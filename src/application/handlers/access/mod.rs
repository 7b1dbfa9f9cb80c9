//! Access verification handlers.
//!
//! The two steps of the recipient verification flow:
//! - `request_code`: match the visitor's address and mail a one-time code
//! - `verify_code`: exchange the mailed code for the unlocked proposal

mod policy;
mod request_code;
mod verify_code;

pub use policy::AccessPolicy;
pub use request_code::{RequestAccessCodeCommand, RequestAccessCodeHandler, RequestCodeOutcome};
pub use verify_code::{UnlockedProposal, VerifyAccessCodeCommand, VerifyAccessCodeHandler};
