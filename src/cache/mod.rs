//! In-memory cache for API responses
//!
//! This module provides a cache that holds parsed responses for a caller-chosen
//! TTL (time-to-live). Reads report whether an entry has expired rather than
//! hiding it, so callers decide whether stale data is acceptable. Time comes
//! from an injected [`Clock`] so expiry can be tested without sleeping.

mod clock;
mod manager;

pub use clock::{Clock, SystemClock};
pub use manager::{CacheManager, CachedData};

#[cfg(test)]
pub(crate) use clock::ManualClock;
