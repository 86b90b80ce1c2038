//! Uncommitted form state for adding a location by coordinates.
//!
//! All fields are text because they mirror free-text inputs; parsing and
//! validation happen at submission, or when a derived map position is
//! needed. Validation applies uniformly no matter which source (map click,
//! device position, typed text) populated the draft.

use skycast_api::NewLocation;

/// Sentinel country code used when none is supplied.
pub const UNKNOWN_COUNTRY: &str = "XX";

/// Transient, workflow-local draft of a manually specified location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualDraft {
    pub display_name: String,
    pub name: String,
    pub country: String,
    pub latitude: String,
    pub longitude: String,
}

/// Validation failures; each maps to an actionable message and never
/// results in a network request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Enter valid numeric latitude and longitude.")]
    InvalidCoordinates,
    #[error("Latitude must be between -90 and 90, and longitude between -180 and 180.")]
    OutOfRange,
    #[error("Country must be a 2-letter code (or leave it blank to use XX).")]
    InvalidCountry,
}

/// Parse a coordinate text field. Only finite values count.
pub fn parse_coordinate(value: &str) -> Option<f64> {
    let parsed: f64 = value.trim().parse().ok()?;
    parsed.is_finite().then_some(parsed)
}

fn in_range(latitude: f64, longitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}

impl ManualDraft {
    /// Position derived from the coordinate fields for map display.
    /// `None` while the fields don't parse or are out of range; the map
    /// marker is simply hidden, which is not an error until submission.
    pub fn derived_position(&self) -> Option<(f64, f64)> {
        let latitude = parse_coordinate(&self.latitude)?;
        let longitude = parse_coordinate(&self.longitude)?;
        in_range(latitude, longitude).then_some((latitude, longitude))
    }

    /// Validate at submission time, producing the complete create payload.
    pub fn validate(&self) -> Result<NewLocation, DraftError> {
        let latitude =
            parse_coordinate(&self.latitude).ok_or(DraftError::InvalidCoordinates)?;
        let longitude =
            parse_coordinate(&self.longitude).ok_or(DraftError::InvalidCoordinates)?;

        if !in_range(latitude, longitude) {
            return Err(DraftError::OutOfRange);
        }

        let country = self.country.trim().to_uppercase();
        let country = if country.is_empty() {
            UNKNOWN_COUNTRY.to_string()
        } else if country.chars().count() == 2 {
            // Any 2-character code is accepted; alphabetic-ness is not
            // checked, matching the backend's observed tolerance.
            country
        } else {
            return Err(DraftError::InvalidCountry);
        };

        let display_name = non_blank(&self.display_name)
            .or_else(|| non_blank(&self.name))
            .unwrap_or_else(|| format!("{latitude:.4}, {longitude:.4}"));
        let name = non_blank(&self.name)
            .or_else(|| non_blank(&self.display_name))
            .unwrap_or_else(|| format!("Location {latitude:.2}, {longitude:.2}"));

        Ok(NewLocation {
            name,
            country,
            latitude,
            longitude,
            display_name,
            is_favorite: false,
        })
    }

    /// Back to pristine.
    pub fn clear(&mut self) {
        *self = ManualDraft::default();
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
