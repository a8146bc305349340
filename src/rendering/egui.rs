//! egui painter backend.
//!
//! The adapter is a cheap handle: the widget owns one clone and the host's
//! frame loop keeps another. `render` records the scene; the host then calls
//! [`EguiAdapter::interact`] and [`EguiAdapter::paint`] from its `update`.

use crate::{
    core::geo::Point,
    input::events::InputEvent,
    rendering::{
        context::{DrawCommand, RenderContext},
        style::{Color, FillStyle, MapStyle},
        svg::{control_origin, tooltip_width, TOOLTIP_HEIGHT},
        MountSurface, RenderAdapter, Scene,
    },
    MapError, Result,
};
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Vec2};
use std::sync::{Arc, Mutex};

const ELLIPSE_SEGMENTS: usize = 48;
const CONTROL_SIZE: f32 = 30.0;

#[derive(Debug, Default)]
struct Frame {
    context: RenderContext,
    style: MapStyle,
    surface: Option<MountSurface>,
    size: Point,
    hovered: Option<usize>,
}

/// Paints scenes with an [`egui::Painter`]
#[derive(Debug, Clone, Default)]
pub struct EguiAdapter {
    shared: Arc<Mutex<Frame>>,
}

impl EguiAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(self, style: MapStyle) -> Self {
        if let Ok(mut frame) = self.shared.lock() {
            frame.style = style;
        }
        self
    }

    /// Allocates the map area and turns this frame's pointer input into widget events
    pub fn interact(&self, ui: &mut egui::Ui) -> (Rect, Vec<InputEvent>) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let mut events = Vec::new();

        let Ok(frame) = self.shared.lock() else {
            return (rect, events);
        };

        let size = Point::new(f64::from(rect.width()), f64::from(rect.height()));
        if size != frame.size {
            events.push(InputEvent::Resize { size });
        }

        let local = |pos: Pos2| {
            let offset = pos - rect.min;
            Point::new(f64::from(offset.x), f64::from(offset.y))
        };

        let hovered = response
            .hover_pos()
            .and_then(|pos| marker_at(&frame.context, &local(pos)));
        if hovered != frame.hovered {
            events.push(InputEvent::MarkerHover { index: hovered });
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                if let Some(index) = marker_at(&frame.context, &local(pos)) {
                    events.push(InputEvent::MarkerClick { index });
                }
            }
        }

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                events.push(InputEvent::PointerDown { position: local(pos) });
            }
        } else if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                events.push(InputEvent::PointerMove { position: local(pos) });
            }
        }
        if response.drag_released() {
            events.push(InputEvent::PointerUp);
        }

        (rect, events)
    }

    /// Paints the last rendered frame into `rect`. Control buttons are laid
    /// over the map; their presses come back as events for the next frame.
    pub fn paint(&self, ui: &mut egui::Ui, rect: Rect) -> Vec<InputEvent> {
        let Ok(frame) = self.shared.lock() else {
            return vec![];
        };

        let painter = ui.painter_at(rect);
        let to_pos = |p: &Point| rect.min + Vec2::new(p.x as f32, p.y as f32);
        let style = &frame.style;

        painter.rect_filled(rect, 0.0, color32(style.background));

        let mut controls = Vec::new();
        for command in &frame.context.drawing_queue {
            match command {
                DrawCommand::Rect { min, max, style, .. } => {
                    let (fill, stroke) = fill_stroke(style);
                    let r = Rect::from_two_pos(to_pos(min), to_pos(max));
                    painter.rect_filled(r, 0.0, fill);
                    painter.rect_stroke(r, 0.0, stroke);
                }
                DrawCommand::Ellipse {
                    center,
                    radii,
                    style,
                } => {
                    let (fill, stroke) = fill_stroke(style);
                    let c = to_pos(center);
                    let points = (0..ELLIPSE_SEGMENTS)
                        .map(|i| {
                            let t = i as f32 / ELLIPSE_SEGMENTS as f32 * std::f32::consts::TAU;
                            c + Vec2::new(radii.x as f32 * t.cos(), radii.y as f32 * t.sin())
                        })
                        .collect();
                    painter.add(Shape::convex_polygon(points, fill, stroke));
                }
                DrawCommand::Line { from, to, style, .. } => {
                    painter.line_segment(
                        [to_pos(from), to_pos(to)],
                        Stroke::new(style.width, color32(style.color)),
                    );
                }
                DrawCommand::Marker {
                    category,
                    position,
                    radius,
                    fill,
                    stroke,
                    ..
                } => {
                    let center = to_pos(position);
                    painter.circle(
                        center,
                        *radius as f32,
                        color32(*fill),
                        Stroke::new(stroke.1, color32(stroke.0)),
                    );
                    painter.text(
                        center,
                        Align2::CENTER_CENTER,
                        category.symbol(),
                        FontId::proportional(*radius as f32),
                        color32(style.symbol_color),
                    );
                }
                DrawCommand::Tooltip { text, anchor } => {
                    let size = Vec2::new(tooltip_width(text) as f32, TOOLTIP_HEIGHT as f32);
                    let bubble = Rect::from_min_size(
                        to_pos(anchor) - Vec2::new(size.x / 2.0, size.y),
                        size,
                    );
                    painter.rect_filled(bubble, 8.0, color32(style.tooltip_background));
                    painter.text(
                        bubble.center(),
                        Align2::CENTER_CENTER,
                        text,
                        FontId::proportional(12.0),
                        color32(style.tooltip_text),
                    );
                }
                DrawCommand::InfoPanel {
                    panel,
                    anchor,
                    width,
                } => {
                    let line_height = 18.0;
                    let height = line_height * (panel.lines.len() as f32 + 2.0);
                    let panel_rect =
                        Rect::from_min_size(to_pos(anchor), Vec2::new(*width as f32, height));
                    painter.rect_filled(panel_rect, 8.0, color32(style.panel_background));

                    // Right-aligned, the panel text is Arabic
                    let right = panel_rect.right() - 10.0;
                    painter.text(
                        Pos2::new(right, panel_rect.top() + line_height),
                        Align2::RIGHT_CENTER,
                        &panel.title,
                        FontId::proportional(15.0),
                        color32(style.panel_accent),
                    );
                    for (i, line) in panel.lines.iter().enumerate() {
                        painter.text(
                            Pos2::new(right, panel_rect.top() + line_height * (i as f32 + 2.0)),
                            Align2::RIGHT_CENTER,
                            line,
                            FontId::proportional(12.0),
                            color32(style.panel_text),
                        );
                    }
                }
                DrawCommand::Control { binding, slot } => {
                    controls.push((binding.clone(), *slot));
                }
            }
        }

        let viewport = frame.size;
        drop(frame);

        let mut events = Vec::new();
        for (binding, slot) in controls {
            let origin = control_origin(viewport, slot);
            let button_rect = Rect::from_min_size(
                rect.min + Vec2::new(origin.x as f32, origin.y as f32),
                Vec2::splat(CONTROL_SIZE),
            );
            if ui
                .put(button_rect, egui::Button::new(binding.label.as_str()))
                .clicked()
            {
                events.push(InputEvent::Control(binding.action));
            }
        }
        events
    }
}

fn marker_at(context: &RenderContext, pixel: &Point) -> Option<usize> {
    context
        .markers()
        .filter_map(|command| match command {
            DrawCommand::Marker {
                index,
                position,
                radius,
                ..
            } if position.distance_to(pixel) <= *radius => Some(*index),
            _ => None,
        })
        .last()
}

fn color32(color: Color) -> Color32 {
    let alpha = (color.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, alpha)
}

fn fill_stroke(style: &FillStyle) -> (Color32, Stroke) {
    let stroke = style
        .stroke
        .map(|(color, width)| Stroke::new(width, color32(color)))
        .unwrap_or(Stroke::NONE);
    (color32(style.fill), stroke)
}

impl RenderAdapter for EguiAdapter {
    fn mount(&mut self, surface: &MountSurface) -> Result<()> {
        let mut frame = self
            .shared
            .lock()
            .map_err(|_| MapError::Mount("egui frame lock poisoned".into()))?;
        frame.size = surface.size;
        frame.surface = Some(surface.clone());
        Ok(())
    }

    fn render(&mut self, scene: &Scene<'_>) -> Result<()> {
        let mut frame = self
            .shared
            .lock()
            .map_err(|_| MapError::Render("egui frame lock poisoned".into()))?;
        if frame.surface.is_none() {
            return Err(MapError::Render("egui adapter is not mounted".into()));
        }

        let Frame {
            context,
            style,
            size,
            hovered,
            ..
        } = &mut *frame;
        *size = scene.viewport_size;
        *hovered = scene.hovered;
        context.width = size.x.max(0.0) as u32;
        context.height = size.y.max(0.0) as u32;
        context.record_scene(scene, style);
        Ok(())
    }

    fn unmount(&mut self) {
        if let Ok(mut frame) = self.shared.lock() {
            frame.surface = None;
            frame.hovered = None;
            frame.context.begin_frame();
        }
    }

    fn viewport_size(&self) -> Point {
        self.shared.lock().map(|frame| frame.size).unwrap_or_default()
    }

    fn is_mounted(&self) -> bool {
        self.shared
            .lock()
            .map(|frame| frame.surface.is_some())
            .unwrap_or(false)
    }
}
