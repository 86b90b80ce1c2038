//! Pure display formatters, unit-conditioned where the quantity is.
//!
//! Missing values render as the `"N/A"` sentinel rather than erroring or
//! leaking "NaN" into the UI.

use skycast_core::Units;

/// Sentinel rendered for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

const METERS_PER_MILE: f64 = 1609.34;

/// Format a temperature, rounded to whole degrees.
pub fn format_temperature(temp: Option<f64>, units: Units) -> String {
    let Some(temp) = temp else {
        return NOT_AVAILABLE.to_string();
    };
    let rounded = temp.round() as i64;
    match units {
        Units::Imperial => format!("{rounded}°F"),
        Units::Standard => format!("{rounded}K"),
        Units::Metric => format!("{rounded}°C"),
    }
}

/// Format a wind speed, rounded. STANDARD shares METRIC's m/s.
pub fn format_wind_speed(speed: Option<f64>, units: Units) -> String {
    let Some(speed) = speed else {
        return NOT_AVAILABLE.to_string();
    };
    let rounded = speed.round() as i64;
    match units {
        Units::Imperial => format!("{rounded} mph"),
        Units::Metric | Units::Standard => format!("{rounded} m/s"),
    }
}

/// Format pressure in hPa. Unit-independent.
pub fn format_pressure(pressure: Option<i32>) -> String {
    match pressure {
        Some(p) => format!("{p} hPa"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format humidity as a percentage. Unit-independent.
pub fn format_humidity(humidity: Option<i32>) -> String {
    match humidity {
        Some(h) => format!("{h}%"),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format visibility given in meters: miles for IMPERIAL, km otherwise.
pub fn format_visibility(visibility: Option<i32>, units: Units) -> String {
    let Some(meters) = visibility else {
        return NOT_AVAILABLE.to_string();
    };
    match units {
        Units::Imperial => format!("{:.1} miles", f64::from(meters) / METERS_PER_MILE),
        Units::Metric | Units::Standard => format!("{:.1} km", f64::from(meters) / 1000.0),
    }
}

/// Provider icon URL for a condition icon code.
pub fn weather_icon_url(icon_code: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon_code}@2x.png")
}
