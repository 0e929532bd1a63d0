//! Location normalization stage.

use serde_json::{json, Value};
use tracing::warn;

use pulse_shared::{GeoPoint, Region, TweetRecord};

use crate::enrich::EnrichStage;
use crate::errors::StageError;

/// Known city centers for the profile-location fallback, checked in order.
const CITY_COORDINATES: [(&str, f64, f64); 10] = [
    ("new york", 40.7128, -74.0060),
    ("los angeles", 34.0522, -118.2437),
    ("chicago", 41.8781, -87.6298),
    ("london", 51.5074, -0.1278),
    ("paris", 48.8566, 2.3522),
    ("tokyo", 35.6762, 139.6503),
    ("sydney", -33.8688, 151.2093),
    ("mumbai", 19.0760, 72.8777),
    ("beijing", 39.9042, 116.4074),
    ("cairo", 30.0444, 31.2357),
];

/// Whether a location value carries usable content.
///
/// Source payloads are loose: null, empty strings, empty containers, zero
/// and false all count as absent.
fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Read a coordinate that may arrive as a number or a numeric string.
fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Normalizes record locations into a geo point and a region.
///
/// Records without a usable location value fall back to the author's free-form
/// profile location, matched against the known city table. Records that still
/// have no coordinates are marked `location_normalized: false` and continue
/// through the pipeline.
pub struct LocationStage;

impl LocationStage {
    pub fn new() -> Self {
        Self
    }

    /// Coordinates of the first known city mentioned in the author's profile
    /// location, if any.
    fn city_from_profile(record: &TweetRecord) -> Option<(f64, f64)> {
        let profile = record.user.as_ref()?.location.as_ref()?.to_lowercase();
        CITY_COORDINATES
            .iter()
            .find(|(city, _, _)| profile.contains(city))
            .map(|(_, lat, lon)| (*lat, *lon))
    }
}

impl Default for LocationStage {
    fn default() -> Self {
        Self::new()
    }
}

impl EnrichStage for LocationStage {
    fn name(&self) -> &'static str {
        "location"
    }

    fn apply(&self, mut record: TweetRecord) -> Result<TweetRecord, StageError> {
        if !record.location.as_ref().map(has_content).unwrap_or(false) {
            match Self::city_from_profile(&record) {
                Some((lat, lon)) => {
                    record.location = Some(json!({ "lat": lat, "lon": lon }));
                }
                None => {
                    record.location_normalized = Some(false);
                    return Ok(record);
                }
            }
        }

        let geo = match record.location.as_ref().and_then(Value::as_object) {
            Some(fields) => match (fields.get("lat"), fields.get("lon")) {
                (Some(lat_value), Some(lon_value)) => {
                    match (coordinate(lat_value), coordinate(lon_value)) {
                        (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
                        _ => {
                            warn!(id = %record.id, "Location has unusable coordinate values");
                            None
                        }
                    }
                }
                _ => None,
            },
            None => None,
        };

        match geo {
            Some(point) => {
                record.region = Some(Region::from_coordinates(point.lat, point.lon));
                record.geo = Some(point);
                record.location_normalized = Some(true);
            }
            None => {
                record.location_normalized = Some(false);
            }
        }

        Ok(record)
    }

    fn on_failure(&self, mut record: TweetRecord) -> TweetRecord {
        record.location_normalized = Some(false);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_shared::{RecordId, TweetUser};

    fn apply(record: TweetRecord) -> TweetRecord {
        LocationStage::new().apply(record).unwrap()
    }

    fn record_with_location(location: Value) -> TweetRecord {
        let mut record = TweetRecord::new(RecordId::Int(1));
        record.location = Some(location);
        record
    }

    fn record_with_profile(profile: &str) -> TweetRecord {
        let mut record = TweetRecord::new(RecordId::Int(1));
        record.user = Some(TweetUser {
            location: Some(profile.to_string()),
            ..Default::default()
        });
        record
    }

    #[test]
    fn test_coordinates_produce_geo_and_region() {
        let enriched = apply(record_with_location(json!({ "lat": 40.71, "lon": -74.01 })));

        assert_eq!(enriched.geo, Some(GeoPoint::new(40.71, -74.01)));
        assert_eq!(enriched.region, Some(Region::NorthAmerica));
        assert_eq!(enriched.location_normalized, Some(true));
    }

    #[test]
    fn test_region_quadrants() {
        let cases = [
            (40.71, -74.01, Region::NorthAmerica),
            (-33.87, 151.21, Region::Oceania),
            (10.0, 45.0, Region::Africa),
            (48.86, 2.35, Region::Europe),
        ];

        for (lat, lon, region) in cases {
            let enriched = apply(record_with_location(json!({ "lat": lat, "lon": lon })));
            assert_eq!(enriched.region, Some(region));
        }
    }

    #[test]
    fn test_string_coordinates_are_parsed() {
        let enriched = apply(record_with_location(json!({ "lat": "48.86", "lon": "2.35" })));

        assert_eq!(enriched.geo, Some(GeoPoint::new(48.86, 2.35)));
        assert_eq!(enriched.region, Some(Region::Europe));
    }

    #[test]
    fn test_profile_city_fallback() {
        let enriched = apply(record_with_profile("Born in New York, USA"));

        assert_eq!(enriched.geo, Some(GeoPoint::new(40.7128, -74.0060)));
        assert_eq!(enriched.region, Some(Region::NorthAmerica));
        assert_eq!(enriched.location_normalized, Some(true));
    }

    #[test]
    fn test_profile_fallback_takes_first_table_match() {
        // Mentions two known cities; the table order decides.
        let enriched = apply(record_with_profile("london / new york"));

        assert_eq!(enriched.geo, Some(GeoPoint::new(40.7128, -74.0060)));
    }

    #[test]
    fn test_empty_location_values_use_profile() {
        for empty in [json!(null), json!(""), json!({}), json!(0), json!([])] {
            let mut record = record_with_profile("Tokyo");
            record.location = Some(empty);
            let enriched = apply(record);

            assert_eq!(enriched.geo, Some(GeoPoint::new(35.6762, 139.6503)));
            assert_eq!(enriched.location_normalized, Some(true));
        }
    }

    #[test]
    fn test_unknown_profile_is_not_normalized() {
        let enriched = apply(record_with_profile("Springfield"));

        assert!(enriched.geo.is_none());
        assert!(enriched.region.is_none());
        assert_eq!(enriched.location_normalized, Some(false));
    }

    #[test]
    fn test_no_location_anywhere_is_not_normalized() {
        let enriched = apply(TweetRecord::new(RecordId::Int(1)));

        assert!(enriched.geo.is_none());
        assert_eq!(enriched.location_normalized, Some(false));
    }

    #[test]
    fn test_object_missing_keys_is_not_normalized() {
        let enriched = apply(record_with_location(json!({ "lat": 40.71 })));

        assert!(enriched.geo.is_none());
        assert_eq!(enriched.location_normalized, Some(false));
    }

    #[test]
    fn test_unconvertible_coordinates_are_not_normalized() {
        for bad in [json!("north"), json!(null), json!({ "deep": true })] {
            let enriched = apply(record_with_location(json!({ "lat": bad, "lon": 2.35 })));

            assert!(enriched.geo.is_none());
            assert_eq!(enriched.location_normalized, Some(false));
        }
    }

    #[test]
    fn test_non_object_location_is_not_normalized() {
        let enriched = apply(record_with_location(json!([48.86, 2.35])));

        assert!(enriched.geo.is_none());
        assert_eq!(enriched.location_normalized, Some(false));
    }

    #[test]
    fn test_on_failure_marks_not_normalized() {
        let record = TweetRecord::new(RecordId::Int(9));
        let fallback = LocationStage::new().on_failure(record);

        assert_eq!(fallback.location_normalized, Some(false));
    }
}
