//! Top-level application state: the tracked-location list, unit
//! preference, and the refresh lifecycle. The workflow hands finished
//! locations back here; everything else goes through the backend and is
//! re-fetched rather than patched locally.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use skycast_api::{
    group_by_date, ApiError, BackendClient, DayForecast, LocationUpdate, PreferencesUpdate,
    TrackedLocation, UserPreferences,
};
use skycast_core::{AppError, Units};
use tokio::task::JoinSet;

use crate::dashboard::{DashboardInputs, DashboardMetrics};

pub struct App {
    api: Arc<BackendClient>,
    locations: Vec<TrackedLocation>,
    units: Units,
    preferences: Option<UserPreferences>,
    loading: bool,
    refreshing: bool,
    fetch_error: Option<String>,
    session_refresh_count: u64,
    last_sync_at: Option<DateTime<Utc>>,
}

impl App {
    pub fn new(api: Arc<BackendClient>) -> Self {
        Self {
            api,
            locations: Vec::new(),
            units: Units::default(),
            preferences: None,
            loading: false,
            refreshing: false,
            fetch_error: None,
            session_refresh_count: 0,
            last_sync_at: None,
        }
    }

    pub fn locations(&self) -> &[TrackedLocation] {
        &self.locations
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn preferences(&self) -> Option<&UserPreferences> {
        self.preferences.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    /// Initial load: preferences first (failure is logged, not fatal,
    /// the default unit stands in), then the location list.
    pub async fn load(&mut self) {
        self.loading = true;
        match self.api.preferences().await {
            Ok(preferences) => {
                self.units = preferences.default_units;
                self.preferences = Some(preferences);
            }
            Err(err) => {
                tracing::warn!("Failed to load preferences, using defaults: {err}");
            }
        }
        self.refetch().await;
        self.loading = false;
    }

    /// Re-fetch the location list. On failure the previous list is kept
    /// and the error recorded for the dashboard.
    pub async fn refetch(&mut self) {
        match self.api.list_locations(self.units).await {
            Ok(locations) => {
                self.locations = locations;
                self.fetch_error = None;
            }
            Err(err) => {
                tracing::error!("Failed to fetch locations: {err}");
                self.fetch_error = Some(AppError::from(err).user_message().to_string());
            }
        }
    }

    /// Refresh weather for every tracked location concurrently, then
    /// re-fetch the list regardless of individual failures.
    pub async fn refresh_all(&mut self) {
        if self.refreshing || self.locations.is_empty() {
            return;
        }
        self.refreshing = true;

        let mut tasks: JoinSet<Result<TrackedLocation, ApiError>> = JoinSet::new();
        for location in &self.locations {
            let api = Arc::clone(&self.api);
            let id = location.location_id;
            let units = self.units;
            tasks.spawn(async move { api.refresh_weather(id, units).await });
        }

        let mut failed = false;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(_)) => {}
                Ok(Err(err)) => {
                    tracing::warn!("Weather refresh failed: {err}");
                    failed = true;
                }
                Err(err) => {
                    tracing::warn!("Refresh task failed: {err}");
                    failed = true;
                }
            }
        }

        self.refetch().await;
        self.session_refresh_count += 1;
        if !failed {
            self.last_sync_at = Some(Utc::now());
        }
        self.refreshing = false;
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), ApiError> {
        self.api.delete_location(id).await?;
        self.refetch().await;
        Ok(())
    }

    pub async fn toggle_favorite(&mut self, id: i64) -> Result<(), ApiError> {
        let current = self
            .locations
            .iter()
            .find(|l| l.location_id == id)
            .map(|l| l.is_favorite)
            .unwrap_or(false);
        let update = LocationUpdate {
            is_favorite: Some(!current),
            ..LocationUpdate::default()
        };
        self.api.update_location(id, &update).await?;
        self.refetch().await;
        Ok(())
    }

    /// Persist a new unit preference and re-fetch so weather values
    /// arrive converted by the backend.
    pub async fn set_units(&mut self, units: Units) -> Result<(), ApiError> {
        let update = PreferencesUpdate {
            default_units: Some(units),
            ..PreferencesUpdate::default()
        };
        let preferences = self.api.update_preferences(&update).await?;
        self.units = preferences.default_units;
        self.preferences = Some(preferences);
        self.refetch().await;
        Ok(())
    }

    /// Use a unit system for this session only, without persisting it as
    /// the preference.
    pub async fn override_units(&mut self, units: Units) {
        if units == self.units {
            return;
        }
        self.units = units;
        self.refetch().await;
    }

    /// Called after the add-location workflow completes.
    pub async fn location_added(&mut self) {
        self.refetch().await;
    }

    pub async fn forecast(&self, id: i64) -> Result<Vec<DayForecast>, ApiError> {
        let points = self.api.forecast(id, self.units).await?;
        Ok(group_by_date(&points))
    }

    pub fn metrics(&self, now: DateTime<Utc>) -> DashboardMetrics {
        DashboardMetrics::compute(
            &self.locations,
            &DashboardInputs {
                refreshing: self.refreshing,
                has_error: self.fetch_error.is_some(),
                session_refresh_count: self.session_refresh_count,
                last_sync_at: self.last_sync_at,
                now,
            },
        )
    }
}
