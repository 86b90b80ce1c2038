//! Provider result types.

use serde::Deserialize;

/// One geocoding result from the provider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeoPlace {
    pub name: String,
    pub country: String,
    /// Administrative area, present for some countries only.
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl GeoPlace {
    /// Composed display label: `name, [state, ]country`, the state segment
    /// omitted when absent.
    pub fn display_label(&self) -> String {
        match self.state.as_deref() {
            Some(state) if !state.is_empty() => {
                format!("{}, {}, {}", self.name, state, self.country)
            }
            _ => format!("{}, {}", self.name, self.country),
        }
    }
}
