use crate::core::landmark::LandmarkCategory;
use serde::{Deserialize, Serialize};
use std::fmt;

/// RGB color with a separate opacity, the way the map's stylesheet expresses it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub opacity: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, opacity: 1.0 }
    }

    pub const fn with_opacity(self, opacity: f32) -> Self {
        Self { opacity, ..self }
    }

    /// Parses `#rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// `#rrggbb`, ignoring opacity
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn for_category(category: LandmarkCategory) -> Self {
        let (r, g, b) = category.rgb();
        Self::rgb(r, g, b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

/// Fill and outline for closed shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillStyle {
    pub fill: Color,
    pub stroke: Option<(Color, f32)>,
}

impl FillStyle {
    pub const fn solid(fill: Color) -> Self {
        Self { fill, stroke: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Color,
    pub width: f32,
}

/// Style configuration for the map scenery, markers and info panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapStyle {
    pub background: Color,
    pub water: FillStyle,
    pub green_area: FillStyle,
    pub building: FillStyle,
    pub street_grid: LineStyle,
    pub main_road: LineStyle,
    /// Outline drawn around every marker circle
    pub marker_stroke: (Color, f32),
    pub symbol_color: Color,
    pub panel_background: Color,
    pub panel_text: Color,
    pub panel_accent: Color,
    /// Marker name tooltip shown on hover
    pub tooltip_background: Color,
    pub tooltip_text: Color,
}

impl Default for MapStyle {
    fn default() -> Self {
        MapThemes::light()
    }
}

/// Predefined map themes
pub struct MapThemes;

impl MapThemes {
    /// Light theme matching the institute's site
    pub fn light() -> MapStyle {
        MapStyle {
            background: Color::rgb(0xe3, 0xf2, 0xfd),
            water: FillStyle::solid(Color::rgb(0x21, 0x96, 0xf3).with_opacity(0.4)),
            green_area: FillStyle::solid(Color::rgb(0x4c, 0xaf, 0x50).with_opacity(0.6)),
            building: FillStyle::solid(Color::rgb(0x45, 0x5a, 0x64).with_opacity(0.7)),
            street_grid: LineStyle {
                color: Color::rgb(0x90, 0xca, 0xf9).with_opacity(0.6),
                width: 1.0,
            },
            main_road: LineStyle {
                color: Color::rgb(0x19, 0x76, 0xd2).with_opacity(0.8),
                width: 3.0,
            },
            marker_stroke: (Color::WHITE, 0.5),
            symbol_color: Color::WHITE,
            panel_background: Color::WHITE.with_opacity(0.95),
            panel_text: Color::rgb(0x2d, 0x37, 0x48),
            panel_accent: Color::rgb(0xe5, 0x3e, 0x3e),
            tooltip_background: Color::BLACK.with_opacity(0.8),
            tooltip_text: Color::WHITE,
        }
    }

    pub fn dark() -> MapStyle {
        MapStyle {
            background: Color::rgb(0x1a, 0x20, 0x2c),
            water: FillStyle::solid(Color::rgb(0x1e, 0x40, 0xaf).with_opacity(0.5)),
            green_area: FillStyle::solid(Color::rgb(0x2f, 0x85, 0x5a).with_opacity(0.6)),
            building: FillStyle::solid(Color::rgb(0x71, 0x80, 0x96).with_opacity(0.7)),
            street_grid: LineStyle {
                color: Color::rgb(0x4a, 0x55, 0x68).with_opacity(0.6),
                width: 1.0,
            },
            main_road: LineStyle {
                color: Color::rgb(0x63, 0xb3, 0xed).with_opacity(0.8),
                width: 3.0,
            },
            marker_stroke: (Color::rgb(0xe2, 0xe8, 0xf0), 0.5),
            symbol_color: Color::WHITE,
            panel_background: Color::rgb(0x2d, 0x37, 0x48).with_opacity(0.95),
            panel_text: Color::rgb(0xe2, 0xe8, 0xf0),
            panel_accent: Color::rgb(0xfc, 0x81, 0x81),
            tooltip_background: Color::rgb(0xe2, 0xe8, 0xf0).with_opacity(0.9),
            tooltip_text: Color::rgb(0x1a, 0x20, 0x2c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let color = Color::from_hex("#e53e3e").unwrap();
        assert_eq!(color, Color::rgb(0xe5, 0x3e, 0x3e));
        assert_eq!(color.hex(), "#e53e3e");
        assert!(Color::from_hex("e53e3e").is_none());
        assert!(Color::from_hex("#e53").is_none());
    }

    #[test]
    fn test_category_colors_match_hex() {
        for category in LandmarkCategory::ALL {
            assert_eq!(Color::for_category(category).hex(), category.color());
        }
    }
}
