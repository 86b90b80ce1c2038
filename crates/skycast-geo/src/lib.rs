//! Geocoding provider client and device position detection.
//!
//! Talks to the external geocoding provider for name search and reverse
//! geocoding, and resolves the device's own position behind a pluggable
//! source with a fixed deadline.

pub mod client;
pub mod position;
pub mod types;

pub use client::{GeoError, Geocoder};
pub use position::{
    detect_position, Position, PositionError, PositionSource, SystemPositionSource,
    DEVICE_TIMEOUT,
};
pub use types::GeoPlace;
