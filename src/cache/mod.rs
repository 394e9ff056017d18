//! Credential-scoped cache for provider responses
//!
//! Key derivation, the memoizing invoker, and the backing store adapters.
//! Designed to elide repeated listing, query, and schema calls against the
//! remote provider.

pub mod invoker;
pub mod key;
pub mod store;

use std::time::Duration;

/// Default TTL applied to every cached entry (5 minutes).
///
/// Fixed per handler instance rather than per call, so the staleness
/// window stays uniform and predictable.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

// Re-export main types
pub use invoker::MemoizingInvoker;
pub use key::{KeyArg, cache_key};
pub use store::{CacheStats, CacheStore, ClearStats, MemoryStore, SqliteStore};
