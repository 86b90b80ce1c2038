//! Backend client for the SkyCast weather service.
//!
//! Wraps the locations, forecast and preferences resource groups as plain
//! request/response calls, plus the pure display formatters that belong to
//! the client's public surface.

pub mod client;
pub mod forecast;
pub mod format;
pub mod types;

pub use client::{ApiError, BackendClient};
pub use forecast::{group_by_date, DayForecast};
pub use types::{
    ForecastPoint, LocationUpdate, NewLocation, PreferencesUpdate, TrackedLocation,
    UserPreferences, WeatherSnapshot,
};
