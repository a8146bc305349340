//! Static background drawn under the markers, in logical map units.

use crate::core::constants::LOGICAL_EXTENT;
use crate::core::geo::Point;

/// One piece of background scenery
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneryShape {
    Water { min: Point, max: Point },
    GreenArea { center: Point, radii: Point },
    Building { min: Point, max: Point },
    StreetGrid { from: Point, to: Point },
    MainRoad { from: Point, to: Point },
}

const BUILDINGS: [(f64, f64, f64, f64); 4] = [
    (20.0, 40.0, 8.0, 12.0),
    (30.0, 35.0, 6.0, 15.0),
    (75.0, 50.0, 10.0, 10.0),
    (85.0, 45.0, 8.0, 18.0),
];

/// Background shapes in paint order: water and parks, buildings, then streets
pub fn scenery() -> Vec<SceneryShape> {
    let mut shapes = vec![
        SceneryShape::GreenArea {
            center: Point::new(70.0, 35.0),
            radii: Point::new(15.0, 10.0),
        },
        SceneryShape::Water {
            min: Point::ZERO,
            max: Point::new(LOGICAL_EXTENT, 15.0),
        },
    ];

    shapes.extend(BUILDINGS.iter().map(|&(x, y, w, h)| SceneryShape::Building {
        min: Point::new(x, y),
        max: Point::new(x + w, y + h),
    }));

    // Every 20 units from 10 to 90, both directions
    for i in (10..=90).step_by(20).map(f64::from) {
        shapes.push(SceneryShape::StreetGrid {
            from: Point::new(i, 0.0),
            to: Point::new(i, LOGICAL_EXTENT),
        });
        shapes.push(SceneryShape::StreetGrid {
            from: Point::new(0.0, i),
            to: Point::new(LOGICAL_EXTENT, i),
        });
    }

    shapes.push(SceneryShape::MainRoad {
        from: Point::new(0.0, 45.0),
        to: Point::new(LOGICAL_EXTENT, 45.0),
    });
    shapes.push(SceneryShape::MainRoad {
        from: Point::new(55.0, 0.0),
        to: Point::new(55.0, LOGICAL_EXTENT),
    });

    shapes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenery_counts() {
        let shapes = scenery();
        let count = |f: fn(&SceneryShape) -> bool| shapes.iter().filter(|s| f(s)).count();

        assert_eq!(count(|s| matches!(s, SceneryShape::Building { .. })), 4);
        assert_eq!(count(|s| matches!(s, SceneryShape::StreetGrid { .. })), 10);
        assert_eq!(count(|s| matches!(s, SceneryShape::MainRoad { .. })), 2);
        assert_eq!(shapes.len(), 18);
    }
}
