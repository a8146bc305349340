use crate::core::geo::Point;
use crate::core::viewport::ViewTransform;
use crate::ui::controls::ControlAction;
use crate::ui::navigation::NavigationKind;
use crate::ui::popup::InfoTarget;
use serde::{Deserialize, Serialize};

/// Input events delivered to the widget by its host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Mouse button pressed on the map surface
    PointerDown { position: Point },
    /// Mouse moved (anywhere; only matters while dragging)
    PointerMove { position: Point },
    PointerUp,
    /// Pointer left the map surface
    PointerLeave,
    /// Touch events. `End` and `Cancel` carry the touches that were lifted;
    /// an empty list means all of them.
    Touch {
        event_type: TouchEventType,
        touches: Vec<TouchPoint>,
    },
    /// A marker was clicked or tapped, by landmark index
    MarkerClick { index: usize },
    /// The pointer moved onto a marker, or off every marker
    MarkerHover { index: Option<usize> },
    /// A bound control was pressed
    Control(ControlAction),
    /// Viewport/container resize
    Resize { size: Point },
}

/// Types of touch events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchEventType {
    Start,
    Move,
    End,
    Cancel,
}

/// Individual touch point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: u64,
    pub position: Point,
}

impl TouchPoint {
    pub fn new(id: u64, position: Point) -> Self {
        Self { id, position }
    }
}

impl InputEvent {
    /// Gets the primary position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::PointerDown { position } | InputEvent::PointerMove { position } => {
                Some(*position)
            }
            InputEvent::Touch { touches, .. } => touches.first().map(|t| t.position),
            _ => None,
        }
    }

    pub fn is_pointer_event(&self) -> bool {
        matches!(
            self,
            InputEvent::PointerDown { .. }
                | InputEvent::PointerMove { .. }
                | InputEvent::PointerUp
                | InputEvent::PointerLeave
        )
    }

    pub fn is_touch_event(&self) -> bool {
        matches!(self, InputEvent::Touch { .. })
    }

    pub fn touch(event_type: TouchEventType, touches: &[(u64, Point)]) -> Self {
        InputEvent::Touch {
            event_type,
            touches: touches
                .iter()
                .map(|&(id, position)| TouchPoint::new(id, position))
                .collect(),
        }
    }
}

/// Events emitted by the widget to registered listeners
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// The view transform changed
    ViewChanged { transform: ViewTransform },
    DragStart { position: Point },
    DragEnd { transform: ViewTransform },
    InfoShown { target: InfoTarget },
    InfoHidden { target: InfoTarget },
    MarkerHovered { index: Option<usize> },
    NavigationRequested { kind: NavigationKind, url: String },
}

/// Listener key for [`MapEvent`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    ViewChanged,
    DragStart,
    DragEnd,
    InfoShown,
    InfoHidden,
    MarkerHovered,
    NavigationRequested,
}

impl MapEvent {
    pub fn kind(&self) -> MapEventKind {
        match self {
            MapEvent::ViewChanged { .. } => MapEventKind::ViewChanged,
            MapEvent::DragStart { .. } => MapEventKind::DragStart,
            MapEvent::DragEnd { .. } => MapEventKind::DragEnd,
            MapEvent::InfoShown { .. } => MapEventKind::InfoShown,
            MapEvent::InfoHidden { .. } => MapEventKind::InfoHidden,
            MapEvent::MarkerHovered { .. } => MapEventKind::MarkerHovered,
            MapEvent::NavigationRequested { .. } => MapEventKind::NavigationRequested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_event_position() {
        let down = InputEvent::PointerDown {
            position: Point::new(100.0, 200.0),
        };
        assert_eq!(down.position(), Some(Point::new(100.0, 200.0)));
        assert!(down.is_pointer_event());

        let touch = InputEvent::touch(TouchEventType::Start, &[(3, Point::new(5.0, 6.0))]);
        assert_eq!(touch.position(), Some(Point::new(5.0, 6.0)));
        assert!(touch.is_touch_event());

        assert_eq!(InputEvent::PointerUp.position(), None);
    }

    #[test]
    fn test_event_kind() {
        let event = MapEvent::InfoShown {
            target: InfoTarget::Institute,
        };
        assert_eq!(event.kind(), MapEventKind::InfoShown);
    }
}
