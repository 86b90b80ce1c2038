//! Application layer: add-location workflow, dashboard aggregation, and
//! the coordinator that ties the backend and geocoder clients together.

pub mod coordinator;
pub mod dashboard;
pub mod draft;
pub mod workflow;

pub use coordinator::App;
pub use dashboard::{ActivityEntry, DashboardInputs, DashboardMetrics, SystemHealth};
pub use draft::{DraftError, ManualDraft, UNKNOWN_COUNTRY};
pub use workflow::{AddLocationWorkflow, InputMode, SearchOutcome};
