//! Point model representing a single timestamped measurement.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A measurement at an instant.
///
/// Serialized as `{"T": "<RFC 3339>", "V": <number>}`, the shape the
/// dashboard's series schema expects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    /// When the measurement applies (UTC)
    #[serde(rename = "T")]
    pub timestamp: DateTime<Utc>,

    /// The measured value
    #[serde(rename = "V")]
    pub value: f64,
}

impl Point {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Body of the latest-value endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LatestResponse {
    /// RFC 3339 timestamp of the newest point
    pub timestamp: String,

    /// Value of the newest point
    pub value: f64,
}

impl From<&Point> for LatestResponse {
    fn from(point: &Point) -> Self {
        Self {
            timestamp: point.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            value: point.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_point_serializes_with_short_field_names() {
        let point = Point::new(Utc.with_ymd_and_hms(2025, 8, 15, 0, 0, 0).unwrap(), 421.0);
        let json = serde_json::to_value(point).unwrap();

        assert_eq!(json["T"], "2025-08-15T00:00:00Z");
        assert_eq!(json["V"], 421.0);
    }

    #[test]
    fn test_latest_response_from_point() {
        let point = Point::new(Utc.with_ymd_and_hms(2025, 7, 16, 0, 0, 0).unwrap(), 420.12);
        let latest = LatestResponse::from(&point);

        assert_eq!(latest.timestamp, "2025-07-16T00:00:00Z");
        assert_eq!(latest.value, 420.12);

        let json = serde_json::to_string(&latest).unwrap();
        assert!(json.contains("\"timestamp\""));
        assert!(json.contains("\"value\""));
    }
}
