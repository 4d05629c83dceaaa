//! Series snapshot held in the cache.

use super::point::Point;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// The newest point together with the full ordered series it came from.
///
/// Both halves are stored as a single cache value so readers never observe
/// one updated without the other. The series is shared, so cloning a snapshot
/// out of the cache does not copy the points.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSnapshot {
    /// Last point in parse order
    pub latest: Point,

    /// Every surviving point, in the order the source listed them
    pub series: Arc<[Point]>,
}

impl SeriesSnapshot {
    /// Build a snapshot from parsed points. Returns `None` for an empty series.
    pub fn from_points(points: Vec<Point>) -> Option<Self> {
        let latest = *points.last()?;
        Some(Self {
            latest,
            series: points.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Points strictly newer than `now - days`, in their original order.
///
/// Works on a borrowed slice so cached data is never modified.
pub fn filter_recent(series: &[Point], days: i64, now: DateTime<Utc>) -> Vec<Point> {
    // A window reaching past the representable range keeps everything
    let Some(cutoff) = Duration::try_days(days).and_then(|d| now.checked_sub_signed(d)) else {
        return series.to_vec();
    };
    series
        .iter()
        .filter(|p| p.timestamp > cutoff)
        .copied()
        .collect()
}
