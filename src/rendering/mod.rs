//! Presentation layer.
//!
//! The widget never draws anything itself. Each frame it builds a [`Scene`]
//! and hands it to a [`RenderAdapter`], which owns the actual surface: an SVG
//! document, a recorded draw list or an egui painter.

pub mod context;
#[cfg(feature = "egui")]
pub mod egui;
pub mod scenery;
pub mod style;
pub mod svg;

use crate::{
    core::{
        constants::{LOGICAL_EXTENT, MARKER_RADIUS},
        geo::Point,
        landmark::LandmarkSet,
        viewport::{map_to_screen, ViewTransform},
    },
    ui::{controls::ControlBinding, popup::InfoPanel},
    Result,
};
use serde::{Deserialize, Serialize};

pub use context::{DrawCommand, DrawListAdapter, RenderContext};
pub use style::{Color, MapStyle, MapThemes};

/// Host element the widget attaches to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountSurface {
    pub id: String,
    /// Pixel size of the surface at mount time
    pub size: Point,
}

impl MountSurface {
    pub fn new(id: impl Into<String>, size: Point) -> Self {
        Self { id: id.into(), size }
    }
}

/// Everything an adapter needs to draw one frame
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    pub landmarks: &'a LandmarkSet,
    pub transform: ViewTransform,
    pub viewport_size: Point,
    pub info: Option<InfoPanel>,
    /// Visible controls, in display order
    pub controls: Vec<ControlBinding>,
    /// Marker under the pointer; its name is drawn as a tooltip
    pub hovered: Option<usize>,
}

impl<'a> Scene<'a> {
    pub fn new(landmarks: &'a LandmarkSet, transform: ViewTransform, viewport_size: Point) -> Self {
        Self {
            landmarks,
            transform,
            viewport_size,
            info: None,
            controls: Vec::new(),
            hovered: None,
        }
    }

    pub fn with_info(mut self, info: Option<InfoPanel>) -> Self {
        self.info = info;
        self
    }

    pub fn with_controls(mut self, controls: Vec<ControlBinding>) -> Self {
        self.controls = controls;
        self
    }

    pub fn with_hover(mut self, hovered: Option<usize>) -> Self {
        self.hovered = hovered;
        self
    }

    /// Screen position of a logical point under this scene's transform
    pub fn to_screen(&self, point: &Point) -> Point {
        map_to_screen(point, &self.transform, &self.viewport_size)
    }

    /// Screen position of every landmark, in landmark order
    pub fn marker_positions(&self) -> Vec<Point> {
        self.landmarks
            .iter()
            .map(|landmark| self.to_screen(&landmark.position))
            .collect()
    }

    /// Marker radius in pixels; markers grow with zoom like the rest of the map
    pub fn marker_radius(&self) -> f64 {
        let short_side = self.viewport_size.x.min(self.viewport_size.y);
        MARKER_RADIUS / LOGICAL_EXTENT * short_side * self.transform.scale
    }

    /// Index of the topmost marker under `pixel`, if any
    pub fn marker_at(&self, pixel: &Point) -> Option<usize> {
        let radius = self.marker_radius();
        self.marker_positions()
            .iter()
            .enumerate()
            .rev()
            .find(|(_, position)| position.distance_to(pixel) <= radius)
            .map(|(index, _)| index)
    }
}

/// Backend that presents a [`Scene`] on some surface
pub trait RenderAdapter: Send {
    /// Attach to the host surface
    fn mount(&mut self, surface: &MountSurface) -> Result<()>;

    /// Draw one frame
    fn render(&mut self, scene: &Scene<'_>) -> Result<()>;

    /// Release the surface; calling it twice is harmless
    fn unmount(&mut self);

    /// Current pixel size of the surface
    fn viewport_size(&self) -> Point;

    fn is_mounted(&self) -> bool;
}

impl<T: RenderAdapter + ?Sized> RenderAdapter for Box<T> {
    fn mount(&mut self, surface: &MountSurface) -> Result<()> {
        (**self).mount(surface)
    }

    fn render(&mut self, scene: &Scene<'_>) -> Result<()> {
        (**self).render(scene)
    }

    fn unmount(&mut self) {
        (**self).unmount()
    }

    fn viewport_size(&self) -> Point {
        (**self).viewport_size()
    }

    fn is_mounted(&self) -> bool {
        (**self).is_mounted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MapConfig;

    #[test]
    fn test_marker_positions_follow_transform() {
        let landmarks = MapConfig::alexandria().landmark_set().unwrap();
        let size = Point::new(800.0, 400.0);

        let scene = Scene::new(&landmarks, ViewTransform::identity(), size);
        let positions = scene.marker_positions();
        // Station at (45, 50)
        assert_eq!(positions[0], Point::new(360.0, 200.0));

        let zoomed = Scene::new(&landmarks, ViewTransform::new(Point::new(10.0, -5.0), 2.0), size);
        // center + (base - center) * 2 + offset
        assert_eq!(zoomed.marker_positions()[0], Point::new(330.0, 195.0));
    }

    #[test]
    fn test_marker_hit_testing() {
        let landmarks = MapConfig::alexandria().landmark_set().unwrap();
        let scene = Scene::new(&landmarks, ViewTransform::identity(), Point::new(800.0, 400.0));

        assert_eq!(scene.marker_radius(), 8.0);
        assert_eq!(scene.marker_at(&Point::new(362.0, 203.0)), Some(0));
        assert_eq!(scene.marker_at(&Point::new(5.0, 5.0)), None);
    }
}
