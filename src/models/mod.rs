//! Data models for measurement series.
//!
//! This module contains the point type parsed from the upstream CSV, the
//! snapshot stored in the cache, and the response bodies built from them.

pub mod point;
pub mod series;

pub use point::{LatestResponse, Point};
pub use series::{filter_recent, SeriesSnapshot};
