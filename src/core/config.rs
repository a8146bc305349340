//! Static configuration for a map instance
//!
//! A [`MapConfig`] is supplied once at construction and never mutated by the
//! widget. It can be built in code, loaded from JSON, or taken from the
//! bundled Alexandria preset.

use crate::core::constants::{DEFAULT_AUTO_HIDE_MS, DEFAULT_INTRO_DELAY_MS};
use crate::core::geo::{LatLng, Point};
use crate::core::landmark::{Landmark, LandmarkCategory, LandmarkSet};
use crate::core::viewport::TransformLimits;
use crate::{MapError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A public transport line serving the institute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportRoute {
    pub name: String,
    pub stops: Vec<String>,
}

impl TransportRoute {
    pub fn new(name: impl Into<String>, stops: &[&str]) -> Self {
        Self {
            name: name.into(),
            stops: stops.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Stops joined right-to-left, as shown in the info panel
    pub fn stops_display(&self) -> String {
        self.stops.join(" ← ")
    }
}

/// Fixed facts about the institute shown in its info panel and used for links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstituteInfo {
    pub name: String,
    pub address: String,
    /// Real-world location, only used by navigation links
    pub location: LatLng,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub hours: Option<String>,
    #[serde(default)]
    pub transport_routes: Vec<TransportRoute>,
}

/// Everything a map instance needs at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    pub institute: InstituteInfo,
    pub landmarks: Vec<Landmark>,
    #[serde(default)]
    pub limits: TransformLimits,
    #[serde(default = "default_auto_hide_ms")]
    pub auto_hide_ms: u64,
    /// Delay before the institute panel opens on its own after mount; `None` disables it
    #[serde(default = "default_intro_delay_ms")]
    pub intro_delay_ms: Option<u64>,
    #[serde(default = "default_viewport_size")]
    pub viewport_size: Point,
}

fn default_auto_hide_ms() -> u64 {
    DEFAULT_AUTO_HIDE_MS
}

fn default_intro_delay_ms() -> Option<u64> {
    Some(DEFAULT_INTRO_DELAY_MS)
}

fn default_viewport_size() -> Point {
    let (w, h) = crate::core::constants::DEFAULT_VIEWPORT_SIZE;
    Point::new(w, h)
}

static ALEXANDRIA: Lazy<MapConfig> = Lazy::new(|| {
    let landmark = |name: &str, category, x, y| Landmark {
        name: name.to_string(),
        category,
        position: Point::new(x, y),
    };

    MapConfig {
        institute: InstituteInfo {
            name: "المعهد المصري لأكاديمية الإسكندرية".to_string(),
            address: "3 شارع الملك - أمام محطة قطار المنتزة - شرق الإسكندرية".to_string(),
            location: LatLng::new(31.2001, 29.9187),
            phone: Some("16000".to_string()),
            hours: Some("9 ص - 3 م (الأحد-الخميس)".to_string()),
            transport_routes: vec![
                TransportRoute::new("أتوبيس 445", &["المنتزة", "سيدي جابر", "محطة مصر"]),
                TransportRoute::new("أتوبيس 750", &["المنتزة", "الإبراهيمية", "بولكلي"]),
                TransportRoute::new("ميكروباص", &["المنتزة", "سموحة", "محطة مصر"]),
            ],
        },
        landmarks: vec![
            landmark("محطة قطار المنتزة", LandmarkCategory::Transport, 45.0, 50.0),
            landmark("المعهد المصري", LandmarkCategory::Institute, 55.0, 45.0),
            landmark("مول سان ستيفانو", LandmarkCategory::Shopping, 60.0, 40.0),
            landmark("حديقة المنتزة", LandmarkCategory::Park, 70.0, 35.0),
            landmark("مسجد المنتزة", LandmarkCategory::ReligiousSite, 40.0, 55.0),
            landmark("مستشفى المنتزة", LandmarkCategory::Hospital, 35.0, 48.0),
            landmark("بنك مصر", LandmarkCategory::Bank, 50.0, 52.0),
            landmark("صيدلية النهار", LandmarkCategory::Pharmacy, 58.0, 48.0),
        ],
        limits: TransformLimits::default(),
        auto_hide_ms: DEFAULT_AUTO_HIDE_MS,
        intro_delay_ms: default_intro_delay_ms(),
        viewport_size: default_viewport_size(),
    }
});

impl MapConfig {
    /// The institute in Montaza, Alexandria, with its surrounding landmarks
    pub fn alexandria() -> Self {
        ALEXANDRIA.clone()
    }

    /// Parse a configuration from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: MapConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn auto_hide(&self) -> Duration {
        Duration::from_millis(self.auto_hide_ms)
    }

    pub fn intro_delay(&self) -> Option<Duration> {
        self.intro_delay_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<()> {
        self.limits.validate()?;
        if self.auto_hide_ms == 0 {
            return Err(MapError::InvalidConfig(
                "auto_hide_ms must be greater than zero".to_string(),
            ));
        }
        if !self.institute.location.is_valid() {
            return Err(MapError::InvalidCoordinates(format!(
                "institute location {} is not a valid coordinate",
                self.institute.location
            )));
        }
        self.landmark_set().map(|_| ())
    }

    pub fn landmark_set(&self) -> Result<LandmarkSet> {
        LandmarkSet::new(self.landmarks.clone())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self::alexandria()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alexandria_preset_is_valid() {
        let config = MapConfig::alexandria();
        assert!(config.validate().is_ok());
        assert_eq!(config.landmarks.len(), 8);
        assert_eq!(config.auto_hide(), Duration::from_millis(5_000));

        let set = config.landmark_set().unwrap();
        assert_eq!(set.institute().name, "المعهد المصري");
    }

    #[test]
    fn test_json_round_trip_keeps_meaning() {
        let config = MapConfig::alexandria();
        let json = config.to_json().unwrap();
        let parsed = MapConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_defaults_and_legacy_category() {
        let json = r#"{
            "institute": {
                "name": "Institute",
                "address": "1 Main St",
                "location": { "lat": 31.2, "lng": 29.9 }
            },
            "landmarks": [
                { "name": "Institute", "category": "institute", "position": { "x": 50, "y": 50 } },
                { "name": "Mosque", "category": "mosque", "position": { "x": 10, "y": 20 } }
            ]
        }"#;

        let config = MapConfig::from_json(json).unwrap();
        assert_eq!(config.limits, TransformLimits::default());
        assert_eq!(config.auto_hide_ms, DEFAULT_AUTO_HIDE_MS);
        assert_eq!(config.intro_delay(), Some(Duration::from_millis(500)));
        assert_eq!(config.landmarks[1].category, LandmarkCategory::ReligiousSite);
    }

    #[test]
    fn test_intro_can_be_disabled_from_json() {
        let mut value = serde_json::to_value(MapConfig::alexandria()).unwrap();
        value["intro_delay_ms"] = serde_json::Value::Null;

        let config = MapConfig::from_json(&value.to_string()).unwrap();
        assert_eq!(config.intro_delay(), None);
    }

    #[test]
    fn test_invalid_json_config_rejected() {
        assert!(matches!(
            MapConfig::from_json("{ not json"),
            Err(MapError::Serialization(_))
        ));

        let mut config = MapConfig::alexandria();
        config.landmarks.retain(|l| !l.is_institute());
        assert!(matches!(config.validate(), Err(MapError::InvalidConfig(_))));
    }

    #[test]
    fn test_route_display() {
        let route = TransportRoute::new("445", &["a", "b", "c"]);
        assert_eq!(route.stops_display(), "a ← b ← c");
    }
}
