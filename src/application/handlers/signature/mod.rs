//! Countersignature handlers.
//!
//! Modules:
//! - `countersign`: record a recipient's drawn signature and sign the proposal

mod countersign;

pub use countersign::{CountersignCommand, CountersignHandler, CountersignResult};
