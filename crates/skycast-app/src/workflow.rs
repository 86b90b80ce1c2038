//! Add-location workflow.
//!
//! Resolves a user's intent — search text, map click, device position or
//! typed coordinates — into one validated create payload, submitted
//! exactly once. Auto-fill from reverse geocoding reports partial progress
//! without ever blocking or overwriting manual input. Provider and backend
//! failures are translated to inline messages here; nothing propagates
//! past the workflow boundary.

use std::sync::Arc;

use skycast_api::{BackendClient, NewLocation, TrackedLocation};
use skycast_geo::{detect_position, GeoError, GeoPlace, Geocoder, PositionError, PositionSource};

use crate::draft::ManualDraft;

const MSG_SEARCH_FAILED: &str = "Failed to search locations";
const MSG_ADD_FAILED: &str = "Failed to add location";
const MSG_MANUAL_ADD_FAILED: &str = "Failed to add location from coordinates.";
const MSG_AUTO_FILLED: &str = "Location details were auto-filled from the selected coordinates.";
const MSG_COORDS_SELECTED: &str =
    "Coordinates selected. Enter a location name/country if needed.";
const MSG_NO_CAPABILITY: &str =
    "Current location is unavailable on this device. Enter coordinates manually.";
const MSG_PERMISSION_DENIED: &str =
    "Permission denied. Enable location permission or enter coordinates manually.";
const MSG_LOCATE_FAILED: &str = "Could not get current location. Enter coordinates manually.";

/// Input mode; mutually exclusive, user-switchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Search,
    Coordinates,
}

/// Search result state. `Results(empty)` is "searched, nothing found" —
/// distinct from both "not yet searched" and "search failed".
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchOutcome {
    #[default]
    NotSearched,
    Results(Vec<GeoPlace>),
    Failed(String),
}

/// State machine for adding a location.
pub struct AddLocationWorkflow {
    api: Arc<BackendClient>,
    geocoder: Arc<Geocoder>,
    active: bool,
    mode: InputMode,
    query: String,
    search: SearchOutcome,
    draft: ManualDraft,
    error: Option<String>,
    info: Option<String>,
    searching: bool,
    submitting: bool,
    locating: bool,
}

impl AddLocationWorkflow {
    pub fn new(api: Arc<BackendClient>, geocoder: Arc<Geocoder>) -> Self {
        Self {
            api,
            geocoder,
            active: false,
            mode: InputMode::default(),
            query: String::new(),
            search: SearchOutcome::default(),
            draft: ManualDraft::default(),
            error: None,
            info: None,
            searching: false,
            submitting: false,
            locating: false,
        }
    }

    /// Bring the workflow on screen. Idempotent; paired with
    /// [`deactivate`](Self::deactivate).
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Take the workflow off screen, discarding all transient state.
    /// Idempotent.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.reset();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Switch input mode; the draft survives switching.
    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Update the search query. Emptying it clears stale results back to
    /// the not-searched state.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.error = None;
        if query.trim().is_empty() {
            self.search = SearchOutcome::NotSearched;
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_outcome(&self) -> &SearchOutcome {
        &self.search
    }

    pub fn draft(&self) -> &ManualDraft {
        &self.draft
    }

    /// Latest inline error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Latest informational (non-blocking) message, if any.
    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_locating(&self) -> bool {
        self.locating
    }

    // Draft setters clear both message slots: the user is editing, so
    // stale guidance no longer applies.

    pub fn set_display_name(&mut self, value: &str) {
        self.draft.display_name = value.to_string();
        self.clear_messages();
    }

    pub fn set_name(&mut self, value: &str) {
        self.draft.name = value.to_string();
        self.clear_messages();
    }

    /// Country is upper-cased as typed, matching the input affordance.
    pub fn set_country(&mut self, value: &str) {
        self.draft.country = value.to_uppercase();
        self.clear_messages();
    }

    pub fn set_latitude(&mut self, value: &str) {
        self.draft.latitude = value.to_string();
        self.clear_messages();
    }

    pub fn set_longitude(&mut self, value: &str) {
        self.draft.longitude = value.to_string();
        self.clear_messages();
    }

    fn clear_messages(&mut self) {
        self.error = None;
        self.info = None;
    }

    /// Run a name search. Whitespace-only queries are silently ignored;
    /// no request is sent.
    pub async fn search(&mut self) {
        let query = self.query.trim().to_string();
        if query.is_empty() || self.searching {
            return;
        }

        self.searching = true;
        self.error = None;

        match self.geocoder.search(&query).await {
            Ok(places) => {
                self.search = SearchOutcome::Results(places);
            }
            Err(GeoError::MissingApiKey) => {
                self.search =
                    SearchOutcome::Failed(GeoError::MissingApiKey.user_message().to_string());
            }
            Err(e) => {
                tracing::error!("Search failed: {}", e);
                self.search = SearchOutcome::Failed(MSG_SEARCH_FAILED.to_string());
            }
        }

        self.searching = false;
    }

    /// Submit a search result directly. Provider data is trusted: the
    /// result's exact fields go out, favorite defaulted to false.
    pub async fn select_result(&mut self, index: usize) -> Option<TrackedLocation> {
        if self.submitting {
            return None;
        }
        let place = match &self.search {
            SearchOutcome::Results(places) => places.get(index)?.clone(),
            _ => return None,
        };

        let payload = NewLocation {
            name: place.name.clone(),
            country: place.country.clone(),
            latitude: place.lat,
            longitude: place.lon,
            display_name: place.display_label(),
            is_favorite: false,
        };
        self.submit(payload, MSG_ADD_FAILED).await
    }

    /// Accept a coordinate pair from a map click or the device position:
    /// write it into the draft as fixed 6-decimal text, then try to
    /// auto-fill the naming fields from a reverse geocode. The coordinate
    /// write always sticks; reverse-geocode failure only downgrades the
    /// auto-fill to a hint.
    pub async fn apply_position(&mut self, latitude: f64, longitude: f64) {
        self.draft.latitude = format!("{latitude:.6}");
        self.draft.longitude = format!("{longitude:.6}");
        self.error = None;

        let resolved = match self.geocoder.reverse(latitude, longitude).await {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!("Reverse geocode failed: {}", e);
                None
            }
        };

        match resolved {
            Some(place) => {
                // Fill only fields the user hasn't typed into.
                if self.draft.display_name.trim().is_empty() {
                    self.draft.display_name = place.display_label();
                }
                if self.draft.name.trim().is_empty() {
                    self.draft.name = place.name.clone();
                }
                if self.draft.country.trim().is_empty() {
                    self.draft.country = place.country.clone();
                }
                self.info = Some(MSG_AUTO_FILLED.to_string());
            }
            None => {
                self.info = Some(MSG_COORDS_SELECTED.to_string());
            }
        }
    }

    /// Resolve the device's own position and feed it through
    /// [`apply_position`](Self::apply_position). Capability absence is
    /// reported immediately; permission denial and generic failure get
    /// distinct messages.
    pub async fn use_device_position(&mut self, source: &dyn PositionSource) {
        if self.locating {
            return;
        }
        if !source.is_available() {
            self.error = Some(MSG_NO_CAPABILITY.to_string());
            return;
        }

        self.locating = true;
        self.error = None;

        match detect_position(source).await {
            Ok(position) => {
                self.apply_position(position.latitude, position.longitude).await;
            }
            Err(PositionError::PermissionDenied) => {
                self.error = Some(MSG_PERMISSION_DENIED.to_string());
            }
            Err(e) => {
                tracing::warn!("Device position failed: {}", e);
                self.error = Some(MSG_LOCATE_FAILED.to_string());
            }
        }

        self.locating = false;
    }

    /// Validate the draft and submit it. Validation failures set the
    /// inline error and send nothing; submission failures preserve the
    /// draft so the user can correct and retry.
    pub async fn submit_coordinates(&mut self) -> Option<TrackedLocation> {
        if self.submitting {
            return None;
        }

        let payload = match self.draft.validate() {
            Ok(payload) => payload,
            Err(e) => {
                self.error = Some(e.to_string());
                return None;
            }
        };

        self.submit(payload, MSG_MANUAL_ADD_FAILED).await
    }

    /// Single-flight submission. Success resets the whole workflow before
    /// the added location is handed back for the owner to refetch its
    /// list; the workflow itself never mutates shared state.
    async fn submit(
        &mut self,
        payload: NewLocation,
        failure_message: &str,
    ) -> Option<TrackedLocation> {
        self.submitting = true;
        self.error = None;

        match self.api.add_location(&payload).await {
            Ok(location) => {
                tracing::info!("Added location {}", location.location_name);
                self.reset();
                Some(location)
            }
            Err(e) => {
                tracing::error!("Add location failed: {}", e);
                self.error = Some(failure_message.to_string());
                self.submitting = false;
                None
            }
        }
    }

    /// Back to the pristine state: default mode, cleared fields, cleared
    /// messages, no busy flags.
    fn reset(&mut self) {
        self.mode = InputMode::default();
        self.query.clear();
        self.search = SearchOutcome::NotSearched;
        self.draft.clear();
        self.error = None;
        self.info = None;
        self.searching = false;
        self.submitting = false;
        self.locating = false;
    }
}
