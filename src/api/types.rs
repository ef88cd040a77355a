//! Response bodies of the gym APIs
//!
//! Field names follow the wire format exactly; the occupancy endpoint uses
//! PascalCase, the route-set widget uses camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time_format::parse_timestamp;

/// Point-in-time snapshot of one gym's crowding level
///
/// Superseded by the next poll, never merged or stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OccupancyRecord {
    /// When the gym last reported its count, as sent by the API
    pub last_updated: String,
    pub name: String,
    /// Human-readable busy-ness label, shown verbatim
    pub status: String,
    /// Display colour for gauges and bars
    pub colour: String,
    /// How full the gym is, 0-100 (not necessarily an integer)
    pub current_percentage: f64,

    // Not displayed; a missing or null value must not fail the record
    #[serde(default)]
    pub current: Option<f64>,
    #[serde(default)]
    pub leaving: Option<f64>,
    #[serde(default)]
    pub allowed: Option<f64>,
    #[serde(default)]
    pub bookings: Option<f64>,
    #[serde(default)]
    pub capacity: Option<f64>,
    #[serde(default)]
    pub offset: Option<f64>,
    #[serde(default)]
    pub remaining: Option<f64>,
    #[serde(default)]
    pub google_status: Option<String>,
    #[serde(default)]
    pub font_colour: Option<String>,
    #[serde(default)]
    pub waiting_time: Option<String>,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub kids_names: Vec<serde_json::Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl OccupancyRecord {
    /// `LastUpdated` as an instant, if it parses
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.last_updated)
    }

    /// Percentage rounded to the nearest whole number, as shown on the gauge.
    /// Clamped to 0..=100 so an over-full gym still draws a full gauge.
    pub fn gauge_percentage(&self) -> i64 {
        (self.current_percentage.round() as i64).clamp(0, 100)
    }

    /// Percentage rounded down, as shown in the comparison chart
    pub fn floored_percentage(&self) -> i64 {
        self.current_percentage.floor() as i64
    }
}

/// When each climbing station at a gym was last reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSetSummary {
    #[serde(default)]
    pub stations: Vec<StationSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSet {
    pub station_name: String,
    pub last_set_date: String,
}

impl StationSet {
    pub fn last_set_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.last_set_date)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Occupancy JSON as the remote endpoint sends it
    pub fn occupancy_json(name: &str, percentage: f64, colour: &str) -> serde_json::Value {
        serde_json::json!({
            "LastUpdated": "2024-05-04T10:00:00Z",
            "Name": name,
            "Current": 87,
            "Leaving": 4,
            "Allowed": 200,
            "Bookings": 0,
            "Capacity": 200,
            "Offset": 0,
            "GoogleStatus": "Not too busy",
            "Remaining": 113,
            "Status": "Not too busy",
            "Colour": colour,
            "CurrentPercentage": percentage,
            "FontColour": "#ffffff",
            "WaitingTime": "",
            "Floor": "",
            "KidsNames": []
        })
    }

    pub fn occupancy(name: &str, percentage: f64, colour: &str) -> OccupancyRecord {
        serde_json::from_value(occupancy_json(name, percentage, colour)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_occupancy_wire_names() {
        let record = occupancy("Milton", 43.6, "#2ecc71");
        assert_eq!(record.name, "Milton");
        assert_eq!(record.current, Some(87.0));
        assert_eq!(record.colour, "#2ecc71");
        assert!(record.kids_names.is_empty());

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["CurrentPercentage"], 43.6);
        assert_eq!(json["GoogleStatus"], "Not too busy");
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let mut json = occupancy_json("Milton", 43.6, "#2ecc71");
        json.as_object_mut().unwrap().remove("Status");
        assert!(serde_json::from_value::<OccupancyRecord>(json).is_err());
    }

    #[test]
    fn test_loose_fields_do_not_fail_the_record() {
        let mut json = occupancy_json("Milton", 43.6, "#2ecc71");
        let fields = json.as_object_mut().unwrap();
        fields.insert("Offset".to_string(), serde_json::json!(0.5));
        fields.insert("WaitingTime".to_string(), serde_json::Value::Null);
        fields.insert("KidsNames".to_string(), serde_json::Value::Null);
        fields.remove("Floor");

        let record: OccupancyRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.offset, Some(0.5));
        assert_eq!(record.waiting_time, None);
        assert_eq!(record.floor, None);
        assert!(record.kids_names.is_empty());
        assert_eq!(record.status, "Not too busy");
    }

    #[test]
    fn test_percentage_rounding() {
        let record = occupancy("Milton", 43.6, "#2ecc71");
        assert_eq!(record.gauge_percentage(), 44);
        assert_eq!(record.floored_percentage(), 43);

        let overfull = occupancy("Milton", 104.2, "#e74c3c");
        assert_eq!(overfull.gauge_percentage(), 100);
    }

    #[test]
    fn test_route_set_wire_names() {
        let summary: RouteSetSummary = serde_json::from_str(
            r#"{"stations":[{"stationName":"Cave","lastSetDate":"2024-05-01T08:00:00Z"}]}"#,
        )
        .unwrap();
        assert_eq!(summary.stations.len(), 1);
        assert_eq!(summary.stations[0].station_name, "Cave");
        assert!(summary.stations[0].last_set_at().is_some());
    }
}
