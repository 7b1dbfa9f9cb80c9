//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `email` - Outbound mail (Resend, mock)
//! - `http` - REST API endpoints
//! - `postgres` - PostgreSQL persistence
//! - `storage` - Private object storage (Supabase, in-memory)
//! - `throttle` - Code-request throttling

pub mod email;
pub mod http;
pub mod postgres;
pub mod storage;
pub mod throttle;
