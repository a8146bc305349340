use crate::{
    core::{geo::Point, landmark::LandmarkCategory},
    rendering::{
        scenery::{scenery, SceneryShape},
        style::{Color, FillStyle, LineStyle, MapStyle},
        MountSurface, RenderAdapter, Scene,
    },
    ui::{controls::ControlBinding, popup::InfoPanel},
    MapError, Result,
};

/// Pixels between a marker's edge and its tooltip
const TOOLTIP_GAP: f64 = 10.0;

/// Commands that can be issued to the render context, in screen pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        min: Point,
        max: Point,
        style: FillStyle,
        class: &'static str,
    },
    Ellipse {
        center: Point,
        radii: Point,
        style: FillStyle,
    },
    Line {
        from: Point,
        to: Point,
        style: LineStyle,
        class: &'static str,
    },
    Marker {
        /// Index into the scene's landmark set
        index: usize,
        name: String,
        category: LandmarkCategory,
        position: Point,
        radius: f64,
        fill: Color,
        stroke: (Color, f32),
    },
    /// Name tooltip; `anchor` is the bottom center of the bubble
    Tooltip {
        text: String,
        anchor: Point,
    },
    InfoPanel {
        panel: InfoPanel,
        anchor: Point,
        width: f64,
    },
    Control {
        binding: ControlBinding,
        slot: usize,
    },
}

/// Recorded frame: a size plus an ordered list of drawing primitives
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub width: u32,
    pub height: u32,
    pub drawing_queue: Vec<DrawCommand>,
}

impl RenderContext {
    /// Create a new render context
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            drawing_queue: Vec::new(),
        }
    }

    pub fn size(&self) -> Point {
        Point::new(f64::from(self.width), f64::from(self.height))
    }

    /// Begin a frame
    pub fn begin_frame(&mut self) {
        self.drawing_queue.clear();
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.drawing_queue.push(command);
    }

    /// Get the current drawing queue
    pub fn get_drawing_queue(&self) -> &[DrawCommand] {
        &self.drawing_queue
    }

    pub fn markers(&self) -> impl Iterator<Item = &DrawCommand> {
        self.drawing_queue
            .iter()
            .filter(|command| matches!(command, DrawCommand::Marker { .. }))
    }

    pub fn info_panel(&self) -> Option<&InfoPanel> {
        self.drawing_queue.iter().find_map(|command| match command {
            DrawCommand::InfoPanel { panel, .. } => Some(panel),
            _ => None,
        })
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.drawing_queue.iter().find_map(|command| match command {
            DrawCommand::Tooltip { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Record the whole scene: scenery, markers, the hover tooltip, the info
    /// panel, then controls
    pub fn record_scene(&mut self, scene: &Scene<'_>, style: &MapStyle) {
        self.begin_frame();
        let scale = scene.transform.scale as f32;

        for shape in scenery() {
            let command = match shape {
                SceneryShape::Water { min, max } => DrawCommand::Rect {
                    min: scene.to_screen(&min),
                    max: scene.to_screen(&max),
                    style: style.water,
                    class: "water-area",
                },
                SceneryShape::GreenArea { center, radii } => DrawCommand::Ellipse {
                    center: scene.to_screen(&center),
                    // Radii are lengths, so they only scale
                    radii: scene
                        .to_screen(&center.add(&radii))
                        .subtract(&scene.to_screen(&center)),
                    style: style.green_area,
                },
                SceneryShape::Building { min, max } => DrawCommand::Rect {
                    min: scene.to_screen(&min),
                    max: scene.to_screen(&max),
                    style: style.building,
                    class: "building",
                },
                SceneryShape::StreetGrid { from, to } => DrawCommand::Line {
                    from: scene.to_screen(&from),
                    to: scene.to_screen(&to),
                    style: LineStyle {
                        width: style.street_grid.width * scale,
                        ..style.street_grid
                    },
                    class: "street-grid",
                },
                SceneryShape::MainRoad { from, to } => DrawCommand::Line {
                    from: scene.to_screen(&from),
                    to: scene.to_screen(&to),
                    style: LineStyle {
                        width: style.main_road.width * scale,
                        ..style.main_road
                    },
                    class: "main-road",
                },
            };
            self.push(command);
        }

        let radius = scene.marker_radius();
        let (stroke_color, stroke_ratio) = style.marker_stroke;
        let positions = scene.marker_positions();
        for ((index, landmark), &position) in scene.landmarks.iter().enumerate().zip(&positions) {
            self.push(DrawCommand::Marker {
                index,
                name: landmark.name.clone(),
                category: landmark.category,
                position,
                radius,
                fill: Color::for_category(landmark.category),
                stroke: (stroke_color, stroke_ratio * radius as f32 / 2.0),
            });
        }

        let hovered = scene
            .hovered
            .and_then(|index| Some((scene.landmarks.get(index)?, positions.get(index)?)));
        if let Some((landmark, position)) = hovered {
            self.push(DrawCommand::Tooltip {
                text: landmark.name.clone(),
                anchor: Point::new(position.x, position.y - radius - TOOLTIP_GAP),
            });
        }

        if let Some(panel) = &scene.info {
            self.push(DrawCommand::InfoPanel {
                panel: panel.clone(),
                anchor: Point::new(10.0, 10.0),
                width: (scene.viewport_size.x - 20.0).clamp(0.0, 300.0),
            });
        }

        for (slot, binding) in scene.controls.iter().enumerate() {
            self.push(DrawCommand::Control {
                binding: binding.clone(),
                slot,
            });
        }
    }
}

/// Headless adapter that records each frame as a list of [`DrawCommand`]s
#[derive(Debug, Default)]
pub struct DrawListAdapter {
    context: RenderContext,
    style: MapStyle,
    surface: Option<MountSurface>,
    frames: u64,
}

impl DrawListAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: MapStyle) -> Self {
        self.style = style;
        self
    }

    /// The most recently recorded frame
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn surface(&self) -> Option<&MountSurface> {
        self.surface.as_ref()
    }
}

impl RenderAdapter for DrawListAdapter {
    fn mount(&mut self, surface: &MountSurface) -> Result<()> {
        if !surface.size.is_finite() || surface.size.x < 0.0 || surface.size.y < 0.0 {
            return Err(MapError::Mount(format!(
                "surface '{}' has invalid size {:?}",
                surface.id, surface.size
            )));
        }
        self.context = RenderContext::new(surface.size.x as u32, surface.size.y as u32);
        self.surface = Some(surface.clone());
        Ok(())
    }

    fn render(&mut self, scene: &Scene<'_>) -> Result<()> {
        if self.surface.is_none() {
            return Err(MapError::Render("draw list adapter is not mounted".into()));
        }
        self.context.width = scene.viewport_size.x.max(0.0) as u32;
        self.context.height = scene.viewport_size.y.max(0.0) as u32;
        self.context.record_scene(scene, &self.style);
        self.frames += 1;
        Ok(())
    }

    fn unmount(&mut self) {
        if self.surface.take().is_some() {
            log::debug!("draw list adapter unmounted after {} frames", self.frames);
        }
        self.context.begin_frame();
    }

    fn viewport_size(&self) -> Point {
        self.surface
            .as_ref()
            .map(|surface| surface.size)
            .unwrap_or_else(|| self.context.size())
    }

    fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{config::MapConfig, viewport::ViewTransform};

    fn mounted() -> DrawListAdapter {
        let mut adapter = DrawListAdapter::new();
        adapter
            .mount(&MountSurface::new("map", Point::new(800.0, 400.0)))
            .unwrap();
        adapter
    }

    #[test]
    fn test_render_requires_mount() {
        let landmarks = MapConfig::alexandria().landmark_set().unwrap();
        let scene = Scene::new(&landmarks, ViewTransform::identity(), Point::new(800.0, 400.0));

        let mut adapter = DrawListAdapter::new();
        assert!(adapter.render(&scene).is_err());
    }

    #[test]
    fn test_records_scenery_then_markers() {
        let landmarks = MapConfig::alexandria().landmark_set().unwrap();
        let scene = Scene::new(&landmarks, ViewTransform::identity(), Point::new(800.0, 400.0));

        let mut adapter = mounted();
        adapter.render(&scene).unwrap();

        let queue = adapter.context().get_drawing_queue();
        assert!(matches!(queue[0], DrawCommand::Ellipse { .. }));
        assert_eq!(adapter.context().markers().count(), landmarks.len());
        assert!(adapter.context().info_panel().is_none());

        // Water band spans the top 15% of the surface
        assert!(queue.iter().any(|command| matches!(
            command,
            DrawCommand::Rect { min, max, class: "water-area", .. }
                if *min == Point::ZERO && *max == Point::new(800.0, 60.0)
        )));
    }

    #[test]
    fn test_hovered_marker_gets_tooltip() {
        let landmarks = MapConfig::alexandria().landmark_set().unwrap();
        let scene = Scene::new(&landmarks, ViewTransform::identity(), Point::new(800.0, 400.0));

        let mut adapter = mounted();
        adapter.render(&scene).unwrap();
        assert!(adapter.context().tooltip().is_none());

        adapter.render(&scene.clone().with_hover(Some(0))).unwrap();
        assert_eq!(adapter.context().tooltip(), Some(landmarks.get(0).unwrap().name.as_str()));

        // Station marker sits at (360, 200) with an 8px radius
        assert!(adapter.context().get_drawing_queue().iter().any(|command| matches!(
            command,
            DrawCommand::Tooltip { anchor, .. } if *anchor == Point::new(360.0, 182.0)
        )));

        adapter.render(&scene.with_hover(Some(99))).unwrap();
        assert!(adapter.context().tooltip().is_none());
    }

    #[test]
    fn test_unmount_is_idempotent() {
        let mut adapter = mounted();
        adapter.unmount();
        adapter.unmount();
        assert!(!adapter.is_mounted());
    }

    #[test]
    fn test_invalid_surface_fails_to_mount() {
        let mut adapter = DrawListAdapter::new();
        let result = adapter.mount(&MountSurface::new("map", Point::new(f64::NAN, 10.0)));
        assert!(matches!(result, Err(MapError::Mount(_))));
    }
}
