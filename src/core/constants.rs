//! Core constants for the landmark map widget.
//! Keeping them in a single place makes it easier to tweak widget-wide magic numbers.

/// Extent of the logical coordinate space on each axis (`[0, 100]`).
pub const LOGICAL_EXTENT: f64 = 100.0;

/// How far the view may be dragged from its origin on each axis, in device pixels.
pub const DEFAULT_MAX_PAN: f64 = 50.0;

/// Smallest zoom scale reachable with the zoom controls.
pub const DEFAULT_MIN_ZOOM: f64 = 0.5;

/// Largest zoom scale reachable with the zoom controls.
pub const DEFAULT_MAX_ZOOM: f64 = 3.0;

/// Scale added or removed by one zoom button press.
pub const DEFAULT_ZOOM_STEP: f64 = 0.2;

/// How long an info panel stays up after being shown.
pub const DEFAULT_AUTO_HIDE_MS: u64 = 5_000;

/// Delay before the institute panel shows itself after mount.
pub const DEFAULT_INTRO_DELAY_MS: u64 = 500;

/// Approximate meters represented by one logical unit.
pub const METERS_PER_UNIT: f64 = 50.0;

/// Walking speed used for the walking-time estimate, in meters per minute.
pub const WALKING_METERS_PER_MINUTE: f64 = 80.0;

/// Zoom results are snapped to `1 / ZOOM_PRECISION_SCALE` so repeated steps stay exact.
pub const ZOOM_PRECISION_SCALE: f64 = 1e9;

/// Default viewport size when the host has not reported one yet.
pub const DEFAULT_VIEWPORT_SIZE: (f64, f64) = (800.0, 400.0);

/// Marker radius in logical units.
pub const MARKER_RADIUS: f64 = 2.0;
