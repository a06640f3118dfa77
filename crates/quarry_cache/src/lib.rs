//! Result caching for Quarry.
//!
//! Fetched result sets are keyed by a [`Fingerprint`] of the view id, the
//! rendered SQL and the bind values, and kept in a bounded
//! least-recently-used store.
//!
//! ```
//! use quarry_cache::{Fingerprint, ResultCache};
//! use quarry_core::{ResultSet, ScalarValue};
//!
//! let cache = ResultCache::new(2);
//! let key = Fingerprint::compute("people", "SELECT 1", &[ScalarValue::Int(30)]);
//!
//! assert!(cache.get(&key).is_none());
//! cache.put(key, ResultSet::empty(vec!["n".to_string()]));
//! assert_eq!(cache.get(&key).unwrap().column_count(), 1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cache;
mod fingerprint;
mod lru;

pub use cache::{CacheStats, DEFAULT_CAPACITY, ResultCache};
pub use fingerprint::Fingerprint;
pub use lru::LruStore;
