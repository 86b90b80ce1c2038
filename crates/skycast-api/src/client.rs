//! HTTP client for the weather backend.
//!
//! Every non-2xx response is surfaced as [`ApiError::Status`] carrying the
//! HTTP status and the response body, before any JSON decoding is
//! attempted. Nothing is retried automatically; retry is a manual repeat
//! of the user's action.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client};
use skycast_core::{AppError, ConfigError, NetworkError, ReqwestErrorExt, Units};
use url::Url;

use crate::types::{
    ForecastPoint, LocationUpdate, NewLocation, PreferencesUpdate, TrackedLocation,
    UserPreferences,
};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Errors from backend calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("Backend error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Short message suitable for inline display.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Status { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            ApiError::Status { .. } => "The request failed. Please try again.",
            ApiError::Network(e) => e.user_message(),
            ApiError::InvalidUrl(_) => "Invalid backend configuration. Check your settings.",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.into_network_error())
    }
}

/// Fold into the application-level aggregate at the coordinator/binary
/// boundary. Status errors keep their status so the user message split
/// survives the conversion.
impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status, message } => {
                AppError::Network(NetworkError::ServerError { status, message })
            }
            ApiError::Network(e) => AppError::Network(e),
            ApiError::InvalidUrl(e) => AppError::Config(ConfigError::Invalid(e.to_string())),
        }
    }
}

/// Client for the backend's locations, forecast and preferences resources.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: Url,
    forecast_path: String,
    client: Arc<Client>,
}

impl BackendClient {
    /// Create a client against the given base URL (e.g.
    /// `http://localhost:8080/api`).
    pub fn new(base_url: &str, forecast_path: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers({
                let mut headers = header::HeaderMap::new();
                headers.insert(
                    header::CONTENT_TYPE,
                    header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .map_err(|e| ApiError::Network(e.into_network_error()))?;

        // A trailing slash changes how Url::join resolves relative paths.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));

        Ok(Self {
            base_url: Url::parse(&normalized)?,
            forecast_path: forecast_path.trim_matches('/').to_string(),
            client: Arc::new(client),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    /// Check response status, turning non-2xx into `ApiError::Status`.
    async fn check_response(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!("Backend returned {}: {}", status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// List all tracked locations with their weather snapshots.
    pub async fn list_locations(&self, units: Units) -> Result<Vec<TrackedLocation>, ApiError> {
        tracing::debug!("Fetching tracked locations");

        let url = self.endpoint("weather/locations")?;
        let response = self
            .client
            .get(url)
            .query(&[("units", units.as_str())])
            .send()
            .await?;
        let response = self.check_response(response).await?;
        let locations: Vec<TrackedLocation> = response.json().await?;

        tracing::info!("Fetched {} locations", locations.len());
        Ok(locations)
    }

    /// Fetch a single location with its weather snapshot.
    pub async fn get_location(
        &self,
        id: i64,
        units: Units,
    ) -> Result<TrackedLocation, ApiError> {
        let url = self.endpoint(&format!("weather/locations/{id}"))?;
        let response = self
            .client
            .get(url)
            .query(&[("units", units.as_str())])
            .send()
            .await?;
        let response = self.check_response(response).await?;
        Ok(response.json().await?)
    }

    /// Create a new tracked location. The server assigns the identifier.
    pub async fn add_location(&self, location: &NewLocation) -> Result<TrackedLocation, ApiError> {
        tracing::debug!("Adding location {}", location.name);

        let url = self.endpoint("weather/locations")?;
        let response = self.client.post(url).json(location).send().await?;
        let response = self.check_response(response).await?;
        Ok(response.json().await?)
    }

    /// Partially update a location (favorite flag, display name).
    pub async fn update_location(
        &self,
        id: i64,
        update: &LocationUpdate,
    ) -> Result<TrackedLocation, ApiError> {
        let url = self.endpoint(&format!("weather/locations/{id}"))?;
        let response = self.client.put(url).json(update).send().await?;
        let response = self.check_response(response).await?;
        Ok(response.json().await?)
    }

    /// Delete a tracked location.
    pub async fn delete_location(&self, id: i64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("weather/locations/{id}"))?;
        let response = self.client.delete(url).send().await?;
        self.check_response(response).await?;
        Ok(())
    }

    /// Ask the backend to refresh a location's weather from its upstream
    /// provider, returning the refreshed snapshot.
    pub async fn refresh_weather(
        &self,
        id: i64,
        units: Units,
    ) -> Result<TrackedLocation, ApiError> {
        let url = self.endpoint(&format!("weather/locations/{id}/refresh"))?;
        let response = self
            .client
            .post(url)
            .query(&[("units", units.as_str())])
            .send()
            .await?;
        let response = self.check_response(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch the forecast point sequence for a location.
    pub async fn forecast(&self, id: i64, units: Units) -> Result<Vec<ForecastPoint>, ApiError> {
        let url = self.endpoint(&format!("{}/{id}", self.forecast_path))?;
        let response = self
            .client
            .get(url)
            .query(&[("units", units.as_str())])
            .send()
            .await?;
        let response = self.check_response(response).await?;
        Ok(response.json().await?)
    }

    /// Fetch the per-user preferences singleton.
    pub async fn preferences(&self) -> Result<UserPreferences, ApiError> {
        let url = self.endpoint("preferences")?;
        let response = self.client.get(url).send().await?;
        let response = self.check_response(response).await?;
        Ok(response.json().await?)
    }

    /// Update preferences, returning the stored result.
    pub async fn update_preferences(
        &self,
        update: &PreferencesUpdate,
    ) -> Result<UserPreferences, ApiError> {
        let url = self.endpoint("preferences")?;
        let response = self.client.put(url).json(update).send().await?;
        let response = self.check_response(response).await?;
        Ok(response.json().await?)
    }
}
