use crate::core::constants::{
    DEFAULT_MAX_PAN, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_VIEWPORT_SIZE, DEFAULT_ZOOM_STEP,
    LOGICAL_EXTENT, ZOOM_PRECISION_SCALE,
};
use crate::core::geo::Point;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Bounds applied to every transform mutation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformLimits {
    /// Maximum absolute pan offset on each axis, in device pixels
    pub max_pan: f64,
    /// The minimum allowed zoom scale
    pub min_zoom: f64,
    /// The maximum allowed zoom scale
    pub max_zoom: f64,
    /// Scale change per zoom button press
    pub zoom_step: f64,
}

impl Default for TransformLimits {
    fn default() -> Self {
        Self {
            max_pan: DEFAULT_MAX_PAN,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_step: DEFAULT_ZOOM_STEP,
        }
    }
}

impl TransformLimits {
    /// Checks that the limits describe a usable range containing the identity transform
    pub fn validate(&self) -> Result<()> {
        if !(self.max_pan.is_finite() && self.max_pan >= 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "max_pan must be a non-negative number, got {}",
                self.max_pan
            )));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= 1.0 && self.max_zoom >= 1.0)
            || !self.max_zoom.is_finite()
        {
            return Err(MapError::InvalidConfig(format!(
                "zoom range [{}, {}] must satisfy 0 < min <= 1 <= max",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            return Err(MapError::InvalidConfig(format!(
                "zoom_step must be positive, got {}",
                self.zoom_step
            )));
        }
        Ok(())
    }
}

/// Direction of a discrete zoom step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    In,
    Out,
}

/// Pan offset plus zoom scale applied when drawing the logical space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Translation in device pixels
    pub offset: Point,
    /// Scale factor (1.0 = no scaling), anchored at the viewport center
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub fn new(offset: Point, scale: f64) -> Self {
        Self { offset, scale }
    }

    /// Create identity transform (no change)
    pub fn identity() -> Self {
        Self {
            offset: Point::ZERO,
            scale: 1.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Returns this transform with both fields forced inside `limits`
    pub fn clamped(&self, limits: &TransformLimits) -> Self {
        let clamp_axis = |v: f64| {
            if v.is_finite() {
                v.clamp(-limits.max_pan, limits.max_pan)
            } else {
                0.0
            }
        };
        let scale = if self.scale.is_finite() {
            self.scale.clamp(limits.min_zoom, limits.max_zoom)
        } else {
            1.0_f64.clamp(limits.min_zoom, limits.max_zoom)
        };

        Self {
            offset: Point::new(clamp_axis(self.offset.x), clamp_axis(self.offset.y)),
            scale,
        }
    }

    /// Checks that the transform already lies within `limits`
    pub fn is_within(&self, limits: &TransformLimits) -> bool {
        self.offset.x.abs() <= limits.max_pan
            && self.offset.y.abs() <= limits.max_pan
            && self.scale >= limits.min_zoom
            && self.scale <= limits.max_zoom
    }
}

/// Maps a logical `[0, 100]` point to screen pixels.
///
/// The logical square is stretched linearly over the viewport, scaled about the
/// viewport center, then translated by the pan offset.
pub fn map_to_screen(point: &Point, transform: &ViewTransform, viewport_size: &Point) -> Point {
    let base = Point::new(
        point.x / LOGICAL_EXTENT * viewport_size.x,
        point.y / LOGICAL_EXTENT * viewport_size.y,
    );
    let center = viewport_size.multiply(0.5);

    base.subtract(&center)
        .multiply(transform.scale)
        .add(&center)
        .add(&transform.offset)
}

/// Inverse of [`map_to_screen`]; `None` when the viewport has no area.
pub fn screen_to_map(screen: &Point, transform: &ViewTransform, viewport_size: &Point) -> Option<Point> {
    if viewport_size.x <= 0.0 || viewport_size.y <= 0.0 || transform.scale <= 0.0 {
        return None;
    }

    let center = viewport_size.multiply(0.5);
    let base = screen
        .subtract(&transform.offset)
        .subtract(&center)
        .multiply(1.0 / transform.scale)
        .add(&center);

    Some(Point::new(
        base.x / viewport_size.x * LOGICAL_EXTENT,
        base.y / viewport_size.y * LOGICAL_EXTENT,
    ))
}

/// Adds `delta` to the offset and clamps each axis to `[-max_pan, max_pan]`
pub fn apply_pan(transform: &ViewTransform, delta: Point, limits: &TransformLimits) -> ViewTransform {
    if !delta.is_finite() {
        return transform.clamped(limits);
    }

    ViewTransform {
        offset: transform.offset.add(&delta),
        scale: transform.scale,
    }
    .clamped(limits)
}

/// Steps the scale by `zoom_step`; a no-op once the bound in that direction is reached
pub fn apply_zoom_step(
    transform: &ViewTransform,
    direction: ZoomDirection,
    limits: &TransformLimits,
) -> ViewTransform {
    let step = match direction {
        ZoomDirection::In => limits.zoom_step,
        ZoomDirection::Out => -limits.zoom_step,
    };
    let raw = transform.scale + step;
    let snapped = (raw * ZOOM_PRECISION_SCALE).round() / ZOOM_PRECISION_SCALE;

    ViewTransform {
        offset: transform.offset,
        scale: snapped,
    }
    .clamped(limits)
}

/// The identity transform restored by the reset control
pub fn reset() -> ViewTransform {
    ViewTransform::identity()
}

/// Manages the current view of the widget: viewport size, transform and its limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The size of the viewport in pixels
    pub size: Point,
    transform: ViewTransform,
    limits: TransformLimits,
}

impl Viewport {
    pub fn new(size: Point, limits: TransformLimits) -> Self {
        Self {
            size,
            transform: ViewTransform::identity().clamped(&limits),
            limits,
        }
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn limits(&self) -> &TransformLimits {
        &self.limits
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Replaces the transform, clamping it into the limits
    pub fn set_transform(&mut self, transform: ViewTransform) {
        self.transform = transform.clamped(&self.limits);
    }

    pub fn pan(&mut self, delta: Point) -> &ViewTransform {
        self.transform = apply_pan(&self.transform, delta, &self.limits);
        &self.transform
    }

    pub fn zoom_step(&mut self, direction: ZoomDirection) -> &ViewTransform {
        self.transform = apply_zoom_step(&self.transform, direction, &self.limits);
        &self.transform
    }

    pub fn reset(&mut self) -> &ViewTransform {
        self.transform = reset();
        &self.transform
    }

    /// Converts a logical point to screen pixel coordinates (container relative)
    pub fn map_to_screen(&self, point: &Point) -> Point {
        map_to_screen(point, &self.transform, &self.size)
    }

    /// Converts screen pixel coordinates back to the logical space
    pub fn screen_to_map(&self, pixel: &Point) -> Option<Point> {
        screen_to_map(pixel, &self.transform, &self.size)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        let (w, h) = DEFAULT_VIEWPORT_SIZE;
        Self::new(Point::new(w, h), TransformLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pan_clamps_each_axis() {
        let limits = TransformLimits::default();
        let t = apply_pan(&ViewTransform::identity(), Point::new(80.0, -120.0), &limits);
        assert_eq!(t.offset, Point::new(50.0, -50.0));

        // Pushing further against the edge changes nothing
        let again = apply_pan(&t, Point::new(10.0, -10.0), &limits);
        assert_eq!(again, t);

        // Dragging back does not have to "unwind" an accumulated overshoot
        let back = apply_pan(&again, Point::new(-10.0, 10.0), &limits);
        assert_eq!(back.offset, Point::new(40.0, -40.0));
    }

    #[test]
    fn test_pan_ignores_non_finite_delta() {
        let limits = TransformLimits::default();
        let t = ViewTransform::new(Point::new(5.0, 5.0), 1.0);
        assert_eq!(apply_pan(&t, Point::new(f64::NAN, 1.0), &limits), t);
    }

    #[test]
    fn test_zoom_clamp_scenario() {
        let limits = TransformLimits::default();
        let mut t = ViewTransform::identity();
        for _ in 0..11 {
            t = apply_zoom_step(&t, ZoomDirection::In, &limits);
        }
        assert_eq!(t.scale, 3.0);
    }

    #[test]
    fn test_zoom_steps_are_reversible() {
        let limits = TransformLimits::default();
        let t = apply_zoom_step(&ViewTransform::identity(), ZoomDirection::In, &limits);
        assert_eq!(t.scale, 1.2);
        let t = apply_zoom_step(&t, ZoomDirection::Out, &limits);
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn test_zoom_out_stops_at_min() {
        let limits = TransformLimits::default();
        let mut t = ViewTransform::identity();
        for _ in 0..20 {
            t = apply_zoom_step(&t, ZoomDirection::Out, &limits);
        }
        assert_eq!(t.scale, 0.5);
    }

    #[test]
    fn test_map_to_screen_identity() {
        let size = Point::new(800.0, 400.0);
        let p = map_to_screen(&Point::new(50.0, 50.0), &ViewTransform::identity(), &size);
        assert_eq!(p, Point::new(400.0, 200.0));

        let corner = map_to_screen(&Point::new(0.0, 100.0), &ViewTransform::identity(), &size);
        assert_eq!(corner, Point::new(0.0, 400.0));
    }

    #[test]
    fn test_map_to_screen_scales_about_center() {
        let size = Point::new(200.0, 200.0);
        let t = ViewTransform::new(Point::new(10.0, -5.0), 2.0);
        // (25,25) -> base (50,50) -> center offset (-50,-50) * 2 = (-100,-100) -> (0,0) + pan
        let p = map_to_screen(&Point::new(25.0, 25.0), &t, &size);
        assert_eq!(p, Point::new(10.0, -5.0));
    }

    #[test]
    fn test_screen_to_map_round_trip() {
        let size = Point::new(640.0, 480.0);
        let t = ViewTransform::new(Point::new(12.0, -30.0), 1.6);
        let logical = Point::new(55.0, 45.0);
        let screen = map_to_screen(&logical, &t, &size);
        let back = screen_to_map(&screen, &t, &size).expect("viewport has area");
        assert!((back.x - logical.x).abs() < 1e-9);
        assert!((back.y - logical.y).abs() < 1e-9);

        assert!(screen_to_map(&screen, &t, &Point::new(0.0, 480.0)).is_none());
    }

    #[test]
    fn test_limits_validation() {
        assert!(TransformLimits::default().validate().is_ok());

        let bad_zoom = TransformLimits {
            min_zoom: 1.5,
            ..TransformLimits::default()
        };
        assert!(bad_zoom.validate().is_err());

        let bad_step = TransformLimits {
            zoom_step: 0.0,
            ..TransformLimits::default()
        };
        assert!(bad_step.validate().is_err());

        let bad_pan = TransformLimits {
            max_pan: -1.0,
            ..TransformLimits::default()
        };
        assert!(bad_pan.validate().is_err());
    }

    #[test]
    fn test_viewport_reset() {
        let mut viewport = Viewport::default();
        viewport.pan(Point::new(30.0, 30.0));
        viewport.zoom_step(ZoomDirection::In);
        assert!(!viewport.transform().is_identity());

        viewport.reset();
        assert!(viewport.transform().is_identity());
    }
}
