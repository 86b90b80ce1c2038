//! Device position detection.
//!
//! The platform integration sits behind [`PositionSource`] so the workflow
//! can be tested without a real location service. Requests run against a
//! fixed 12-second deadline; an unavailable capability is reported
//! immediately without attempting a request.

use std::time::Duration;

use async_trait::async_trait;

/// Deadline for a device position request.
pub const DEVICE_TIMEOUT: Duration = Duration::from_secs(12);

/// Environment variable the desktop session uses to hand the device
/// position to the client, as `"lat,lon"`.
pub const ENV_POSITION: &str = "SKYCAST_POSITION";

/// A detected device position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: Option<f64>,
}

/// Position detection errors. Permission denial is distinguished from
/// generic failure because the two produce different user guidance.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PositionError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    Unavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

/// Source of the device's own position.
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// Whether this device has the capability at all. Checked before any
    /// request is attempted.
    fn is_available(&self) -> bool;

    /// Resolve the current position. High accuracy is requested where the
    /// platform supports the distinction.
    async fn current_position(&self) -> Result<Position, PositionError>;
}

/// Detect the device position under the fixed [`DEVICE_TIMEOUT`].
pub async fn detect_position(source: &dyn PositionSource) -> Result<Position, PositionError> {
    detect_position_with_timeout(source, DEVICE_TIMEOUT).await
}

/// Deadline-parameterized variant, used by tests.
pub async fn detect_position_with_timeout(
    source: &dyn PositionSource,
    deadline: Duration,
) -> Result<Position, PositionError> {
    if !source.is_available() {
        return Err(PositionError::Unavailable);
    }

    match tokio::time::timeout(deadline, source.current_position()).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("Position request exceeded {:?}", deadline);
            Err(PositionError::Timeout)
        }
    }
}

/// Position source fed by the desktop session via [`ENV_POSITION`].
///
/// Platforms without a location integration simply leave the variable
/// unset, and the capability reports as unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPositionSource;

impl SystemPositionSource {
    fn read_env() -> Option<Position> {
        let raw = std::env::var(ENV_POSITION).ok()?;
        let (lat, lon) = raw.split_once(',')?;
        let latitude: f64 = lat.trim().parse().ok()?;
        let longitude: f64 = lon.trim().parse().ok()?;
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }
        Some(Position {
            latitude,
            longitude,
            accuracy_meters: None,
        })
    }
}

#[async_trait]
impl PositionSource for SystemPositionSource {
    fn is_available(&self) -> bool {
        Self::read_env().is_some()
    }

    async fn current_position(&self) -> Result<Position, PositionError> {
        Self::read_env().ok_or(PositionError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSource(Position);

    #[async_trait]
    impl PositionSource for StaticSource {
        fn is_available(&self) -> bool {
            true
        }

        async fn current_position(&self) -> Result<Position, PositionError> {
            Ok(self.0)
        }
    }

    struct UnavailableSource;

    #[async_trait]
    impl PositionSource for UnavailableSource {
        fn is_available(&self) -> bool {
            false
        }

        async fn current_position(&self) -> Result<Position, PositionError> {
            panic!("must not be called when unavailable");
        }
    }

    struct StalledSource;

    #[async_trait]
    impl PositionSource for StalledSource {
        fn is_available(&self) -> bool {
            true
        }

        async fn current_position(&self) -> Result<Position, PositionError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!()
        }
    }

    struct DeniedSource;

    #[async_trait]
    impl PositionSource for DeniedSource {
        fn is_available(&self) -> bool {
            true
        }

        async fn current_position(&self) -> Result<Position, PositionError> {
            Err(PositionError::PermissionDenied)
        }
    }

    #[tokio::test]
    async fn test_detect_returns_position() {
        let source = StaticSource(Position {
            latitude: -33.9249,
            longitude: 18.4241,
            accuracy_meters: Some(25.0),
        });
        let position = detect_position(&source).await.unwrap();
        assert_eq!(position.latitude, -33.9249);
    }

    #[tokio::test]
    async fn test_unavailable_reported_without_request() {
        let err = detect_position(&UnavailableSource).await.unwrap_err();
        assert!(matches!(err, PositionError::Unavailable));
    }

    #[tokio::test]
    async fn test_stalled_source_times_out() {
        let err =
            detect_position_with_timeout(&StalledSource, Duration::from_millis(20))
                .await
                .unwrap_err();
        assert!(matches!(err, PositionError::Timeout));
    }

    #[tokio::test]
    async fn test_permission_denied_passes_through() {
        let err = detect_position(&DeniedSource).await.unwrap_err();
        assert!(matches!(err, PositionError::PermissionDenied));
    }
}
