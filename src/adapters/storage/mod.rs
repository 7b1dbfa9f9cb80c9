//! Storage Adapters
//!
//! Implementations of the ObjectStore port for private asset uploads
//! and signed-URL issuance.
//!
//! ## Available Adapters
//!
//! - **SupabaseObjectStore** - Supabase Storage REST API (production)
//! - **InMemoryObjectStore** - Stores objects in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{InMemoryObjectStore, SupabaseObjectStore, SupabaseStorageConfig};
//!
//! // Production: Supabase Storage
//! let store = SupabaseObjectStore::new(SupabaseStorageConfig::from_env()?);
//!
//! // Testing: in-memory storage
//! let store = InMemoryObjectStore::new();
//! ```

mod in_memory_object_store;
mod supabase_storage;

pub use in_memory_object_store::InMemoryObjectStore;
pub use supabase_storage::{SupabaseObjectStore, SupabaseStorageConfig};
