//! Prelude module for common landmark-map types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use landmark_map::prelude::*;`

pub use crate::core::{
    builder::MapBuilder,
    config::{InstituteInfo, MapConfig, TransportRoute},
    geo::{LatLng, Point},
    landmark::{Landmark, LandmarkCategory, LandmarkSet},
    viewport::{TransformLimits, ViewTransform, Viewport, ZoomDirection},
};

pub use crate::input::{
    events::{InputEvent, MapEvent, MapEventKind, TouchEventType, TouchPoint},
    handler::{Action, InputHandler},
};

pub use crate::rendering::{
    context::{DrawCommand, DrawListAdapter, RenderContext},
    svg::SvgAdapter,
    MountSurface, RenderAdapter, Scene,
};

#[cfg(feature = "egui")]
pub use crate::rendering::egui::EguiAdapter;

pub use crate::ui::{
    controls::{ControlAction, ControlId, ControlManager},
    navigation::{NavigationKind, Navigator},
    popup::{InfoPanel, InfoTarget},
    timer::{AutoHideTimer, DeadlineTimer},
    widget::MapWidget,
};

pub use crate::runtime::AsyncHandle;

pub use crate::{Error as MapError, Result};

pub use std::{collections::VecDeque, sync::Arc, time::Duration};

pub use instant::Instant;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet, FxHasher};
