//! SVG document renderer.
//!
//! Each frame is recorded into a [`RenderContext`] first and then serialized,
//! so the SVG output and the headless draw list always agree on geometry.

use crate::{
    core::geo::Point,
    rendering::{
        context::{DrawCommand, RenderContext},
        style::{Color, FillStyle, MapStyle},
        MountSurface, RenderAdapter, Scene,
    },
    MapError, Result,
};
use std::borrow::Cow;
use std::fmt::Write;

const PANEL_LINE_HEIGHT: f64 = 20.0;
const CONTROL_SIZE: f64 = 30.0;
pub const TOOLTIP_HEIGHT: f64 = 28.0;

/// Renders frames as standalone SVG documents
#[derive(Debug, Default)]
pub struct SvgAdapter {
    style: MapStyle,
    surface: Option<MountSurface>,
    context: RenderContext,
    document: String,
}

impl SvgAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: MapStyle) -> Self {
        self.style = style;
        self
    }

    /// The last rendered document; empty before the first frame
    pub fn document(&self) -> &str {
        &self.document
    }

    fn write_document(&mut self) -> std::fmt::Result {
        let mut out = String::with_capacity(8 * 1024);
        let (w, h) = (self.context.width, self.context.height);
        let id = self.surface.as_ref().map(|s| s.id.as_str()).unwrap_or_default();

        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" id="{}" class="interactive-map" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            escape_xml(id)
        )?;
        writeln!(
            out,
            r#"<rect class="map-background" width="{w}" height="{h}" fill="{}"/>"#,
            self.style.background
        )?;

        for command in &self.context.drawing_queue {
            match command {
                DrawCommand::Rect {
                    min,
                    max,
                    style,
                    class,
                } => {
                    writeln!(
                        out,
                        r#"<rect class="{class}" x="{}" y="{}" width="{}" height="{}"{}/>"#,
                        min.x,
                        min.y,
                        max.x - min.x,
                        max.y - min.y,
                        fill_attrs(style)
                    )?;
                }
                DrawCommand::Ellipse {
                    center,
                    radii,
                    style,
                } => {
                    writeln!(
                        out,
                        r#"<ellipse class="green-area" cx="{}" cy="{}" rx="{}" ry="{}"{}/>"#,
                        center.x,
                        center.y,
                        radii.x,
                        radii.y,
                        fill_attrs(style)
                    )?;
                }
                DrawCommand::Line {
                    from,
                    to,
                    style,
                    class,
                } => {
                    writeln!(
                        out,
                        r#"<line class="{class}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" opacity="{}"/>"#,
                        from.x, from.y, to.x, to.y, style.color, style.width, style.color.opacity
                    )?;
                }
                DrawCommand::Marker {
                    index,
                    name,
                    category,
                    position,
                    radius,
                    fill,
                    stroke,
                } => {
                    writeln!(
                        out,
                        r#"<g class="landmark {}" data-index="{index}" transform="translate({},{})">"#,
                        category.css_class(),
                        position.x,
                        position.y
                    )?;
                    writeln!(out, "<title>{}</title>", escape_xml(name))?;
                    writeln!(
                        out,
                        r#"<circle r="{radius}" fill="{fill}" stroke="{}" stroke-width="{}"/>"#,
                        stroke.0, stroke.1
                    )?;
                    writeln!(
                        out,
                        r#"<text text-anchor="middle" dominant-baseline="central" font-size="{}" fill="{}">{}</text>"#,
                        radius,
                        self.style.symbol_color,
                        escape_xml(category.symbol())
                    )?;
                    writeln!(out, "</g>")?;
                }
                DrawCommand::Tooltip { text, anchor } => {
                    let width = tooltip_width(text);
                    writeln!(
                        out,
                        r#"<g class="landmark-tooltip" transform="translate({},{})">"#,
                        anchor.x, anchor.y
                    )?;
                    writeln!(
                        out,
                        r#"<rect x="{}" y="{}" width="{width}" height="{TOOLTIP_HEIGHT}" rx="8" fill="{}" opacity="{}"/>"#,
                        -width / 2.0,
                        -TOOLTIP_HEIGHT,
                        self.style.tooltip_background,
                        self.style.tooltip_background.opacity
                    )?;
                    writeln!(
                        out,
                        r#"<text y="{}" text-anchor="middle" dominant-baseline="central" font-size="12" fill="{}">{}</text>"#,
                        -TOOLTIP_HEIGHT / 2.0,
                        self.style.tooltip_text,
                        escape_xml(text)
                    )?;
                    writeln!(out, "</g>")?;
                }
                DrawCommand::InfoPanel {
                    panel,
                    anchor,
                    width,
                } => {
                    let height = PANEL_LINE_HEIGHT * (panel.lines.len() as f64 + 2.0);
                    writeln!(
                        out,
                        r#"<g class="map-info-panel" direction="rtl" transform="translate({},{})">"#,
                        anchor.x, anchor.y
                    )?;
                    writeln!(
                        out,
                        r#"<rect width="{width}" height="{height}" rx="8" fill="{}" opacity="{}"/>"#,
                        self.style.panel_background, self.style.panel_background.opacity
                    )?;
                    writeln!(
                        out,
                        r#"<text class="info-title" x="{}" y="{}" text-anchor="end" font-weight="bold" fill="{}">{}</text>"#,
                        width - 10.0,
                        PANEL_LINE_HEIGHT,
                        self.style.panel_accent,
                        escape_xml(&panel.title)
                    )?;
                    for (i, line) in panel.lines.iter().enumerate() {
                        writeln!(
                            out,
                            r#"<text x="{}" y="{}" text-anchor="end" font-size="12" fill="{}">{}</text>"#,
                            width - 10.0,
                            PANEL_LINE_HEIGHT * (i as f64 + 2.0),
                            self.style.panel_text,
                            escape_xml(line)
                        )?;
                    }
                    writeln!(out, "</g>")?;
                }
                DrawCommand::Control { binding, slot } => {
                    let origin = control_origin(self.context.size(), *slot);
                    writeln!(
                        out,
                        r#"<g class="map-control" data-control-id="{}" transform="translate({},{})">"#,
                        escape_xml(binding.id.as_str()),
                        origin.x,
                        origin.y
                    )?;
                    writeln!(
                        out,
                        r#"<rect width="{CONTROL_SIZE}" height="{CONTROL_SIZE}" rx="4" fill="{}"/>"#,
                        Color::WHITE
                    )?;
                    writeln!(
                        out,
                        r#"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="central" fill="{}">{}</text>"#,
                        CONTROL_SIZE / 2.0,
                        CONTROL_SIZE / 2.0,
                        self.style.panel_text,
                        escape_xml(&binding.label)
                    )?;
                    writeln!(out, "</g>")?;
                }
            }
        }

        out.push_str("</svg>\n");
        self.document = out;
        Ok(())
    }
}

/// Top-left corner of the control button in `slot`, stacked down the right edge
pub fn control_origin(viewport: Point, slot: usize) -> Point {
    Point::new(
        viewport.x - CONTROL_SIZE - 10.0,
        10.0 + slot as f64 * (CONTROL_SIZE + 5.0),
    )
}

/// Bubble width for a 12px label plus padding
pub fn tooltip_width(text: &str) -> f64 {
    text.chars().count() as f64 * 7.0 + 24.0
}

fn fill_attrs(style: &FillStyle) -> String {
    let mut attrs = format!(r#" fill="{}" opacity="{}""#, style.fill, style.fill.opacity);
    if let Some((color, width)) = style.stroke {
        // Writing to a String cannot fail
        let _ = write!(attrs, r#" stroke="{color}" stroke-width="{width}""#);
    }
    attrs
}

/// Escapes the five XML special characters
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

impl RenderAdapter for SvgAdapter {
    fn mount(&mut self, surface: &MountSurface) -> Result<()> {
        if surface.id.is_empty() {
            return Err(MapError::Mount("svg surface needs an id".into()));
        }
        self.surface = Some(surface.clone());
        self.context = RenderContext::new(surface.size.x.max(0.0) as u32, surface.size.y.max(0.0) as u32);
        log::debug!("svg adapter mounted on '{}'", surface.id);
        Ok(())
    }

    fn render(&mut self, scene: &Scene<'_>) -> Result<()> {
        if self.surface.is_none() {
            return Err(MapError::Render("svg adapter is not mounted".into()));
        }
        self.context.width = scene.viewport_size.x.max(0.0) as u32;
        self.context.height = scene.viewport_size.y.max(0.0) as u32;
        self.context.record_scene(scene, &self.style);
        self.write_document()
            .map_err(|e| MapError::Render(format!("failed to write svg: {e}")))
    }

    fn unmount(&mut self) {
        if let Some(surface) = self.surface.take() {
            log::debug!("svg adapter unmounted from '{}'", surface.id);
        }
        self.document.clear();
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
    use crate::core::{
        config::MapConfig,
        landmark::{Landmark, LandmarkCategory, LandmarkSet},
        viewport::ViewTransform,
    };
    use crate::ui::popup::InfoPanel;

    fn render(scene: &Scene<'_>) -> String {
        let mut adapter = SvgAdapter::new();
        adapter
            .mount(&MountSurface::new("map", scene.viewport_size))
            .unwrap();
        adapter.render(scene).unwrap();
        adapter.document().to_string()
    }

    #[test]
    fn test_markers_are_translated_groups() {
        let landmarks = MapConfig::alexandria().landmark_set().unwrap();
        let scene = Scene::new(&landmarks, ViewTransform::identity(), Point::new(800.0, 400.0));
        let svg = render(&scene);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"<g class="landmark transport" data-index="0" transform="translate(360,200)">"#));
        assert!(svg.contains(r#"<g class="landmark institute""#));
        assert!(svg.contains(r#"class="main-road""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let landmarks = LandmarkSet::new(vec![
            Landmark::new("Institute", LandmarkCategory::Institute, Point::new(50.0, 50.0)).unwrap(),
            Landmark::new("Fish & <Chips>", LandmarkCategory::Other, Point::new(10.0, 10.0)).unwrap(),
        ])
        .unwrap();
        let scene = Scene::new(&landmarks, ViewTransform::identity(), Point::new(100.0, 100.0))
            .with_info(Some(InfoPanel {
                title: "\"quoted\"".into(),
                lines: vec![],
            }));
        let svg = render(&scene);

        assert!(svg.contains("<title>Fish &amp; &lt;Chips&gt;</title>"));
        assert!(svg.contains("&quot;quoted&quot;"));
        assert!(!svg.contains("<Chips>"));
    }

    #[test]
    fn test_hover_tooltip_is_drawn() {
        let landmarks = LandmarkSet::new(vec![
            Landmark::new("Institute", LandmarkCategory::Institute, Point::new(50.0, 50.0)).unwrap(),
            Landmark::new("Park", LandmarkCategory::Park, Point::new(10.0, 10.0)).unwrap(),
        ])
        .unwrap();
        let scene = Scene::new(&landmarks, ViewTransform::identity(), Point::new(100.0, 100.0));
        assert!(!render(&scene).contains("landmark-tooltip"));

        let svg = render(&scene.with_hover(Some(1)));
        // Marker at (10, 10) with a 2px radius, tooltip 10px above it
        assert!(svg.contains(r#"<g class="landmark-tooltip" transform="translate(10,-2)">"#));
        assert!(svg.contains(">Park</text>"));
    }

    #[test]
    fn test_escape_xml_borrows_plain_text() {
        assert!(matches!(escape_xml("plain"), Cow::Borrowed("plain")));
        assert_eq!(escape_xml("a'b"), "a&apos;b");
    }

    #[test]
    fn test_unmount_clears_document() {
        let landmarks = MapConfig::alexandria().landmark_set().unwrap();
        let scene = Scene::new(&landmarks, ViewTransform::identity(), Point::new(800.0, 400.0));
        let mut adapter = SvgAdapter::new();
        adapter.mount(&MountSurface::new("map", scene.viewport_size)).unwrap();
        adapter.render(&scene).unwrap();
        adapter.unmount();

        assert!(adapter.document().is_empty());
        assert!(adapter.render(&scene).is_err());
    }
}
