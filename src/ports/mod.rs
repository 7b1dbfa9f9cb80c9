//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `ProposalStore` - Proposal record reads and the atomic countersign write
//! - `AccessSessionStore` - Ephemeral (proposal, email) verification sessions
//!
//! ## Provider Ports
//!
//! - `ObjectStore` - Private asset uploads and signed-URL issuance
//! - `MailSender` - Outbound code delivery
//! - `RequestThrottle` - Fixed-window cap on code requests

mod access_session_store;
mod mail_sender;
mod object_store;
mod proposal_store;
mod request_throttle;

pub use access_session_store::AccessSessionStore;
pub use mail_sender::MailSender;
pub use object_store::ObjectStore;
pub use proposal_store::ProposalStore;
pub use request_throttle::{RequestThrottle, ThrottleDenied, ThrottleKey, ThrottleResult};
