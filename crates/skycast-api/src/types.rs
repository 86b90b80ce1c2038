//! Wire types for the weather backend.
//!
//! Field names follow the backend's camelCase DTOs. Weather fields are all
//! optional: the backend returns a location row even when no upstream fetch
//! has succeeded yet, so absence of `temperature` is the sentinel for "no
//! weather data", not absence of the snapshot itself.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use skycast_core::Units;

/// A tracked location as returned by the backend, with its current
/// weather snapshot flattened into the same JSON object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedLocation {
    pub location_id: i64,
    pub location_name: String,
    pub display_name: Option<String>,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(flatten)]
    pub weather: WeatherSnapshot,
}

impl TrackedLocation {
    /// A location "has weather" only when temperature is present. The
    /// snapshot object can exist with all-null fields after a failed
    /// upstream fetch, so display logic must branch on this, not on
    /// snapshot presence.
    pub fn has_weather(&self) -> bool {
        self.weather.temperature.is_some()
    }

    /// Display name, falling back to the plain location name.
    pub fn label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.location_name,
        }
    }

    /// Parsed `lastUpdated` timestamp, `None` when absent or unparsable.
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.weather
            .last_updated
            .as_deref()
            .and_then(parse_timestamp)
    }
}

/// Current-weather payload embedded in a tracked location. Immutable once
/// returned; replaced wholesale on refresh, never patched field-by-field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<i32>,
    pub pressure: Option<i32>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<i32>,
    pub weather_condition: Option<String>,
    pub weather_description: Option<String>,
    pub weather_icon: Option<String>,
    pub cloudiness: Option<i32>,
    pub visibility: Option<i32>,
    /// Kept as text so an unparsable value is representable; staleness
    /// treats unparsable the same as absent.
    pub last_updated: Option<String>,
}

/// One timestamped future prediction from the 5-day forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub forecast_time: NaiveDateTime,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<i32>,
    pub pressure: Option<i32>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<i32>,
    pub weather_condition: Option<String>,
    pub weather_description: Option<String>,
    pub weather_icon: Option<String>,
    pub cloudiness: Option<i32>,
    /// Probability in 0..1.
    pub precipitation_probability: Option<f64>,
    pub rain_volume: Option<f64>,
}

/// Request body for creating a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLocation {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
    pub is_favorite: bool,
}

/// Request to update an existing location (partial update).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

/// Per-user preferences singleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub id: Option<i64>,
    #[serde(default)]
    pub default_units: Units,
    pub refresh_interval_minutes: Option<u32>,
    pub auto_refresh_enabled: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Request to update preferences (partial update).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_units: Option<Units>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_interval_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_refresh_enabled: Option<bool>,
}

/// Parse a backend timestamp. The backend serializes `LocalDateTime`
/// without an offset; RFC 3339 is accepted too and naive values are read
/// as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location_json(temperature: Option<f64>) -> serde_json::Value {
        serde_json::json!({
            "locationId": 7,
            "locationName": "Cape Town",
            "displayName": "Cape Town, ZA",
            "country": "ZA",
            "latitude": -33.9249,
            "longitude": 18.4241,
            "isFavorite": true,
            "temperature": temperature,
            "feelsLike": 17.2,
            "humidity": 64,
            "pressure": 1017,
            "windSpeed": 5.1,
            "weatherCondition": "Clouds",
            "weatherDescription": "scattered clouds",
            "weatherIcon": "03d",
            "lastUpdated": "2026-08-30T09:15:00"
        })
    }

    #[test]
    fn test_tracked_location_deserialization() {
        let loc: TrackedLocation = serde_json::from_value(location_json(Some(18.4))).unwrap();
        assert_eq!(loc.location_id, 7);
        assert_eq!(loc.location_name, "Cape Town");
        assert!(loc.is_favorite);
        assert_eq!(loc.weather.temperature, Some(18.4));
        assert_eq!(loc.weather.humidity, Some(64));
    }

    #[test]
    fn test_has_weather_branches_on_temperature_only() {
        let with = serde_json::from_value::<TrackedLocation>(location_json(Some(18.4))).unwrap();
        let without = serde_json::from_value::<TrackedLocation>(location_json(None)).unwrap();
        assert!(with.has_weather());
        // Snapshot fields are present, but no temperature means no weather.
        assert!(!without.has_weather());
        assert_eq!(without.weather.humidity, Some(64));
    }

    #[test]
    fn test_label_falls_back_to_location_name() {
        let mut loc: TrackedLocation =
            serde_json::from_value(location_json(Some(18.4))).unwrap();
        assert_eq!(loc.label(), "Cape Town, ZA");
        loc.display_name = None;
        assert_eq!(loc.label(), "Cape Town");
        loc.display_name = Some("   ".to_string());
        assert_eq!(loc.label(), "Cape Town");
    }

    #[test]
    fn test_missing_favorite_defaults_false() {
        let mut value = location_json(None);
        value.as_object_mut().unwrap().remove("isFavorite");
        let loc: TrackedLocation = serde_json::from_value(value).unwrap();
        assert!(!loc.is_favorite);
    }

    #[test]
    fn test_parse_timestamp_naive_and_rfc3339() {
        assert!(parse_timestamp("2026-08-30T09:15:00").is_some());
        assert!(parse_timestamp("2026-08-30T09:15:00.123").is_some());
        assert!(parse_timestamp("2026-08-30T09:15:00Z").is_some());
        assert!(parse_timestamp("not a date").is_none());
    }

    #[test]
    fn test_new_location_serialization() {
        let req = NewLocation {
            name: "Cape Town".to_string(),
            country: "ZA".to_string(),
            latitude: -33.9249,
            longitude: 18.4241,
            display_name: "Cape Town, ZA".to_string(),
            is_favorite: false,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["displayName"], "Cape Town, ZA");
        assert_eq!(json["isFavorite"], false);
    }

    #[test]
    fn test_location_update_partial() {
        let req = LocationUpdate {
            is_favorite: Some(true),
            ..LocationUpdate::default()
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"isFavorite":true}"#);
    }

    #[test]
    fn test_preferences_update_partial() {
        let req = PreferencesUpdate {
            default_units: Some(Units::Imperial),
            ..PreferencesUpdate::default()
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"defaultUnits":"IMPERIAL"}"#);
    }

    #[test]
    fn test_forecast_point_deserialization() {
        let point: ForecastPoint = serde_json::from_value(serde_json::json!({
            "forecastTime": "2026-08-31T12:00:00",
            "temperature": 21.0,
            "precipitationProbability": 0.35
        }))
        .unwrap();
        assert_eq!(point.precipitation_probability, Some(0.35));
        assert_eq!(point.forecast_time.and_utc().format("%H").to_string(), "12");
    }
}
