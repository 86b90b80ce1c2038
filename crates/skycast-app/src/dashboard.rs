//! Dashboard aggregation: derived, read-only metrics over the current
//! location list. A pure projection, recomputed on every call; nothing
//! here caches or issues network requests.

use chrono::{DateTime, Duration, Utc};
use skycast_api::TrackedLocation;

/// Weather older than this counts as stale (3 hours).
pub const STALE_AFTER_MS: i64 = 10_800_000;

/// Size of the recent-activity feed.
const ACTIVITY_LIMIT: usize = 5;

/// Two-valued system health; no intermediate states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemHealth {
    Up,
    Degraded,
}

impl SystemHealth {
    pub fn as_str(self) -> &'static str {
        match self {
            SystemHealth::Up => "UP",
            SystemHealth::Degraded => "DEGRADED",
        }
    }
}

impl std::fmt::Display for SystemHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the recent-activity feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub message: String,
    pub time_ago: String,
}

/// Session-scoped inputs the coordinator supplies alongside the list.
#[derive(Debug, Clone, Copy)]
pub struct DashboardInputs {
    pub refreshing: bool,
    pub has_error: bool,
    pub session_refresh_count: u64,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub now: DateTime<Utc>,
}

/// Derived dashboard metrics.
#[derive(Debug, Clone)]
pub struct DashboardMetrics {
    pub total: usize,
    pub favorites: usize,
    pub synced: usize,
    pub stale: usize,
    /// Rounded percentage, exactly `"0%"` for an empty list.
    pub sync_coverage: String,
    pub effective_last_sync: Option<DateTime<Utc>>,
    pub health: SystemHealth,
    pub refreshing: bool,
    pub session_refresh_count: u64,
    pub recent_activity: Vec<ActivityEntry>,
}

impl DashboardMetrics {
    pub fn compute(locations: &[TrackedLocation], inputs: &DashboardInputs) -> Self {
        let total = locations.len();
        let favorites = locations.iter().filter(|l| l.is_favorite).count();
        let synced = locations.iter().filter(|l| l.has_weather()).count();
        let stale = locations
            .iter()
            .filter(|l| is_stale(l, inputs.now))
            .count();

        let sync_coverage = if total == 0 {
            "0%".to_string()
        } else {
            let percent = (synced as f64 / total as f64 * 100.0).round() as i64;
            format!("{percent}%")
        };

        let latest_location_sync = locations
            .iter()
            .filter_map(TrackedLocation::last_updated_at)
            .max();
        let effective_last_sync = inputs.last_sync_at.or(latest_location_sync);

        let health = if inputs.has_error {
            SystemHealth::Degraded
        } else {
            SystemHealth::Up
        };

        let mut recent: Vec<(&TrackedLocation, DateTime<Utc>)> = locations
            .iter()
            .filter_map(|l| l.last_updated_at().map(|t| (l, t)))
            .collect();
        recent.sort_by(|a, b| b.1.cmp(&a.1));
        let recent_activity = recent
            .into_iter()
            .take(ACTIVITY_LIMIT)
            .map(|(location, at)| ActivityEntry {
                message: format!("Weather synced for \"{}\"", location.label()),
                time_ago: relative_time(at, inputs.now),
            })
            .collect();

        Self {
            total,
            favorites,
            synced,
            stale,
            sync_coverage,
            effective_last_sync,
            health,
            refreshing: inputs.refreshing,
            session_refresh_count: inputs.session_refresh_count,
            recent_activity,
        }
    }
}

/// Missing, unparsable, or older than the threshold: any one condition
/// marks the location stale.
fn is_stale(location: &TrackedLocation, now: DateTime<Utc>) -> bool {
    match location.last_updated_at() {
        Some(updated_at) => now - updated_at > Duration::milliseconds(STALE_AFTER_MS),
        None => true,
    }
}

/// Coarse "3 minutes ago"-style wording for the activity feed.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "less than a minute ago".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return if minutes == 1 {
            "1 minute ago".to_string()
        } else {
            format!("{minutes} minutes ago")
        };
    }
    let hours = minutes / 60;
    if hours < 24 {
        return if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{hours} hours ago")
        };
    }
    let days = hours / 24;
    if days == 1 {
        "1 day ago".to_string()
    } else {
        format!("{days} days ago")
    }
}
