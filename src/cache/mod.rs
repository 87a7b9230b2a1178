// Cache module for in-memory weather caching.
// Values carry their capture time and expire after a configured window.

pub mod store;

pub use store::{CachedData, DEFAULT_TTL, TimedCache};
