use crate::core::constants::{LOGICAL_EXTENT, METERS_PER_UNIT, WALKING_METERS_PER_MINUTE};
use crate::core::geo::Point;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of place a landmark marks; decides marker color and symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LandmarkCategory {
    Institute,
    Transport,
    Shopping,
    Park,
    #[serde(alias = "mosque")]
    ReligiousSite,
    Hospital,
    Bank,
    Pharmacy,
    Other,
}

impl LandmarkCategory {
    pub const ALL: [LandmarkCategory; 9] = [
        Self::Institute,
        Self::Transport,
        Self::Shopping,
        Self::Park,
        Self::ReligiousSite,
        Self::Hospital,
        Self::Bank,
        Self::Pharmacy,
        Self::Other,
    ];

    /// Marker fill color as a `#rrggbb` string
    pub fn color(&self) -> &'static str {
        match self {
            Self::Institute => "#e53e3e",
            Self::Transport => "#3b82f6",
            Self::Shopping => "#9f7aea",
            Self::Park => "#4caf50",
            Self::ReligiousSite => "#059669",
            Self::Hospital => "#dc2626",
            Self::Bank => "#d97706",
            Self::Pharmacy => "#16a34a",
            Self::Other => "#6b7280",
        }
    }

    /// Marker fill color as RGB components
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = &self.color()[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        (channel(0), channel(2), channel(4))
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Institute => "🎓",
            Self::Transport => "🚌",
            Self::Shopping => "🛍️",
            Self::Park => "🌳",
            Self::ReligiousSite => "🕌",
            Self::Hospital => "🏥",
            Self::Bank => "🏦",
            Self::Pharmacy => "💊",
            Self::Other => "📍",
        }
    }

    /// Arabic label shown in the info panel
    pub fn label_ar(&self) -> &'static str {
        match self {
            Self::Institute => "معهد تعليمي",
            Self::Transport => "محطة مواصلات",
            Self::Shopping => "مركز تسوق",
            Self::Park => "حديقة عامة",
            Self::ReligiousSite => "مسجد",
            Self::Hospital => "مستشفى",
            Self::Bank => "بنك",
            Self::Pharmacy => "صيدلية",
            Self::Other => "مكان عام",
        }
    }

    /// CSS-style class name, matching the serialized form
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Institute => "institute",
            Self::Transport => "transport",
            Self::Shopping => "shopping",
            Self::Park => "park",
            Self::ReligiousSite => "religious-site",
            Self::Hospital => "hospital",
            Self::Bank => "bank",
            Self::Pharmacy => "pharmacy",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for LandmarkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}

/// A named point of interest at a fixed logical position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    pub category: LandmarkCategory,
    pub position: Point,
}

impl Landmark {
    /// Creates a landmark, rejecting positions outside the logical square
    pub fn new(name: impl Into<String>, category: LandmarkCategory, position: Point) -> Result<Self> {
        let landmark = Self {
            name: name.into(),
            category,
            position,
        };
        landmark.validate()?;
        Ok(landmark)
    }

    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64| v.is_finite() && (0.0..=LOGICAL_EXTENT).contains(&v);
        if in_range(self.position.x) && in_range(self.position.y) {
            Ok(())
        } else {
            Err(MapError::InvalidCoordinates(format!(
                "landmark '{}' at ({}, {}) lies outside [0, {}]",
                self.name, self.position.x, self.position.y, LOGICAL_EXTENT
            )))
        }
    }

    pub fn is_institute(&self) -> bool {
        self.category == LandmarkCategory::Institute
    }
}

/// Immutable, ordered landmark list with exactly one institute
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    landmarks: Vec<Landmark>,
    institute: usize,
}

impl LandmarkSet {
    pub fn new(landmarks: Vec<Landmark>) -> Result<Self> {
        for landmark in &landmarks {
            landmark.validate()?;
        }

        let mut institutes = landmarks
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_institute())
            .map(|(i, _)| i);

        let institute = match (institutes.next(), institutes.next()) {
            (Some(index), None) => index,
            (None, _) => {
                return Err(MapError::InvalidConfig(
                    "landmark set has no institute marker".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(MapError::InvalidConfig(
                    "landmark set has more than one institute marker".to_string(),
                ))
            }
        };

        Ok(Self {
            landmarks,
            institute,
        })
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.landmarks.iter()
    }

    pub fn as_slice(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn institute(&self) -> &Landmark {
        &self.landmarks[self.institute]
    }

    pub fn institute_index(&self) -> usize {
        self.institute
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.landmarks.iter().position(|l| l.name == name)
    }

    /// Approximate walking distance from the institute, rounded to whole meters
    pub fn distance_meters(&self, landmark: &Landmark) -> u32 {
        let units = self.institute().position.distance_to(&landmark.position);
        (units * METERS_PER_UNIT).round() as u32
    }

    /// Walking time from the institute, rounded up to whole minutes
    pub fn walking_minutes(&self, landmark: &Landmark) -> u32 {
        (self.distance_meters(landmark) as f64 / WALKING_METERS_PER_MINUTE).ceil() as u32
    }
}

impl<'a> IntoIterator for &'a LandmarkSet {
    type Item = &'a Landmark;
    type IntoIter = std::slice::Iter<'a, Landmark>;

    fn into_iter(self) -> Self::IntoIter {
        self.landmarks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landmark(name: &str, category: LandmarkCategory, x: f64, y: f64) -> Landmark {
        Landmark::new(name, category, Point::new(x, y)).unwrap()
    }

    #[test]
    fn test_exactly_one_institute() {
        let none = LandmarkSet::new(vec![landmark("bank", LandmarkCategory::Bank, 1.0, 1.0)]);
        assert!(matches!(none, Err(MapError::InvalidConfig(_))));

        let two = LandmarkSet::new(vec![
            landmark("a", LandmarkCategory::Institute, 1.0, 1.0),
            landmark("b", LandmarkCategory::Institute, 2.0, 2.0),
        ]);
        assert!(matches!(two, Err(MapError::InvalidConfig(_))));

        let ok = LandmarkSet::new(vec![
            landmark("bank", LandmarkCategory::Bank, 1.0, 1.0),
            landmark("institute", LandmarkCategory::Institute, 2.0, 2.0),
        ])
        .unwrap();
        assert_eq!(ok.institute_index(), 1);
    }

    #[test]
    fn test_out_of_range_position_rejected() {
        let err = Landmark::new("far", LandmarkCategory::Park, Point::new(101.0, 50.0));
        assert!(matches!(err, Err(MapError::InvalidCoordinates(_))));
    }

    #[test]
    fn test_distance_and_walking_time() {
        let set = LandmarkSet::new(vec![
            landmark("institute", LandmarkCategory::Institute, 55.0, 45.0),
            landmark("station", LandmarkCategory::Transport, 45.0, 50.0),
        ])
        .unwrap();
        let station = set.get(1).unwrap();

        // sqrt(100 + 25) * 50 = 559.01...
        assert_eq!(set.distance_meters(station), 559);
        assert_eq!(set.walking_minutes(station), 7);
        assert_eq!(set.distance_meters(set.institute()), 0);
    }

    #[test]
    fn test_category_serde_names() {
        let json = serde_json::to_string(&LandmarkCategory::ReligiousSite).unwrap();
        assert_eq!(json, "\"religious-site\"");

        let legacy: LandmarkCategory = serde_json::from_str("\"mosque\"").unwrap();
        assert_eq!(legacy, LandmarkCategory::ReligiousSite);
    }

    #[test]
    fn test_category_rgb() {
        assert_eq!(LandmarkCategory::Institute.rgb(), (0xe5, 0x3e, 0x3e));
        for category in LandmarkCategory::ALL {
            assert_eq!(category.color().len(), 7);
        }
    }
}
