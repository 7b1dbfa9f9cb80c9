//! Proposal domain module.
//!
//! Models the shared business document from the counterparty's side:
//! the content snapshot frozen at share time, the authorized address,
//! and the one-way transition to `Signed` recorded by the
//! countersignature flow.

mod aggregate;
mod snapshot;
mod status;

pub use aggregate::Proposal;
pub use snapshot::{
    ProposalSnapshot, COUNTERPARTY_SIGNATURE_KEY, LOGO_KEY, PROVIDER_SIGNATURE_KEY,
};
pub use status::ProposalStatus;
