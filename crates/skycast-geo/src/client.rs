//! Geocoding provider client: name search and reverse geocoding.
//!
//! Both operations require the provisioned API key and fail fast with
//! [`GeoError::MissingApiKey`] before any network call when it is absent.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use skycast_core::{AppError, ConfigError, NetworkError, ReqwestErrorExt};
use url::Url;

use crate::types::GeoPlace;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Fixed result cap for name search.
pub const SEARCH_LIMIT: u32 = 5;

/// Errors from provider calls.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// No API key is provisioned; detected before attempting the request.
    #[error("Weather API key is not configured")]
    MissingApiKey,

    #[error("Provider error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl GeoError {
    /// Short message suitable for inline display.
    pub fn user_message(&self) -> &'static str {
        match self {
            GeoError::MissingApiKey => "Weather API key is not configured",
            GeoError::Status { .. } => "Location search failed. Please try again.",
            GeoError::Network(e) => e.user_message(),
            GeoError::InvalidUrl(_) => "Invalid provider configuration. Check your settings.",
        }
    }
}

impl From<reqwest::Error> for GeoError {
    fn from(err: reqwest::Error) -> Self {
        GeoError::Network(err.into_network_error())
    }
}

/// Fold into the application-level aggregate. A missing key is a
/// configuration condition, not a network one.
impl From<GeoError> for AppError {
    fn from(err: GeoError) -> Self {
        match err {
            GeoError::MissingApiKey => {
                AppError::Config(ConfigError::MissingSetting("provider.api_key".to_string()))
            }
            GeoError::Status { status, message } => {
                AppError::Network(NetworkError::ServerError { status, message })
            }
            GeoError::Network(e) => AppError::Network(e),
            GeoError::InvalidUrl(e) => AppError::Config(ConfigError::Invalid(e.to_string())),
        }
    }
}

/// Client for the external geocoding provider.
#[derive(Debug, Clone)]
pub struct Geocoder {
    base_url: Url,
    api_key: Option<String>,
    client: Arc<Client>,
}

impl Geocoder {
    /// Create a client against the provider base URL (e.g.
    /// `https://api.openweathermap.org/geo/1.0`). The key may be absent;
    /// calls will then fail fast without touching the network.
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, GeoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| GeoError::Network(e.into_network_error()))?;

        let normalized = format!("{}/", base_url.trim_end_matches('/'));

        Ok(Self {
            base_url: Url::parse(&normalized)?,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client: Arc::new(client),
        })
    }

    /// True when search and reverse geocoding can be attempted at all.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn key(&self) -> Result<&str, GeoError> {
        self.api_key.as_deref().ok_or(GeoError::MissingApiKey)
    }

    async fn check_response(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GeoError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!("Provider returned {}: {}", status, message);
            return Err(GeoError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// Search places by free-text name, capped at [`SEARCH_LIMIT`] results.
    pub async fn search(&self, query: &str) -> Result<Vec<GeoPlace>, GeoError> {
        let key = self.key()?;
        tracing::debug!("Searching places for {:?}", query);

        let url = self.base_url.join("direct")?;
        let response = self
            .client
            .get(url)
            .query(&[
                ("q", query),
                ("limit", &SEARCH_LIMIT.to_string()),
                ("appid", key),
            ])
            .send()
            .await?;
        let response = self.check_response(response).await?;
        let places: Vec<GeoPlace> = response.json().await?;

        tracing::info!("Search for {:?} returned {} places", query, places.len());
        Ok(places)
    }

    /// Reverse geocode a coordinate to its nearest place, if any.
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<GeoPlace>, GeoError> {
        let key = self.key()?;
        tracing::debug!("Reverse geocoding {}, {}", lat, lon);

        let url = self.base_url.join("reverse")?;
        let response = self
            .client
            .get(url)
            .query(&[
                ("lat", lat.to_string().as_str()),
                ("lon", lon.to_string().as_str()),
                ("limit", "1"),
                ("appid", key),
            ])
            .send()
            .await?;
        let response = self.check_response(response).await?;
        let mut places: Vec<GeoPlace> = response.json().await?;

        if places.is_empty() {
            tracing::debug!("No place found at {}, {}", lat, lon);
            return Ok(None);
        }
        Ok(Some(places.remove(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_not_configured() {
        let geocoder = Geocoder::new("https://geo.test/geo/1.0", None).unwrap();
        assert!(!geocoder.is_configured());
    }

    #[test]
    fn test_blank_key_treated_as_missing() {
        let geocoder =
            Geocoder::new("https://geo.test/geo/1.0", Some("  ".to_string())).unwrap();
        assert!(!geocoder.is_configured());
    }

    #[tokio::test]
    async fn test_search_without_key_fails_fast() {
        let geocoder = Geocoder::new("https://geo.test/geo/1.0", None).unwrap();
        let err = geocoder.search("Cape Town").await.unwrap_err();
        assert!(matches!(err, GeoError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_reverse_without_key_fails_fast() {
        let geocoder = Geocoder::new("https://geo.test/geo/1.0", None).unwrap();
        let err = geocoder.reverse(-33.9, 18.4).await.unwrap_err();
        assert!(matches!(err, GeoError::MissingApiKey));
    }

    #[test]
    fn test_missing_key_folds_into_config_error() {
        let app_err = AppError::from(GeoError::MissingApiKey);
        assert!(matches!(
            app_err,
            AppError::Config(ConfigError::MissingSetting(_))
        ));
    }
}
