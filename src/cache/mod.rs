//! Caching utilities for the One Earth API.
//!
//! This module provides a generic time-based cache implementation with TTL support.

pub mod ttl_cache;

pub use ttl_cache::{Lookup, TtlCache};
