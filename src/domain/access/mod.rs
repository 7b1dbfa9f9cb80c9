//! Access verification domain module.
//!
//! Models the email -> one-time-code -> verified flow that gates a
//! proposal's public view: code generation and digesting, the ephemeral
//! per-(proposal, email) session record, and the error vocabulary the
//! whole flow reports in.

mod errors;
mod one_time_code;
mod session;

pub use errors::AccessError;
pub use one_time_code::{CodeDigest, OneTimeCode};
pub use session::AccessSession;
