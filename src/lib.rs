//! # landmark-map
//!
//! An interactive landmark map widget for a single site, such as an institute
//! and the places around it.
//!
//! The widget works in a logical `[0, 100] x [0, 100]` coordinate space instead
//! of real geographic projection. Users pan by dragging, zoom with discrete
//! steps anchored at the viewport center, and click markers to open an info
//! panel that hides itself after a fixed delay. Rendering goes through a
//! swappable [`RenderAdapter`], so the transform math can be tested without
//! any UI toolkit.

pub mod core;
pub mod input;
pub mod prelude;
pub mod rendering;
pub mod runtime;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    builder::MapBuilder,
    config::{InstituteInfo, MapConfig, TransportRoute},
    geo::{LatLng, Point},
    landmark::{Landmark, LandmarkCategory, LandmarkSet},
    viewport::{
        apply_pan, apply_zoom_step, map_to_screen, reset, screen_to_map, TransformLimits,
        ViewTransform, Viewport, ZoomDirection,
    },
};

pub use crate::input::{
    events::{InputEvent, MapEvent, MapEventKind},
    handler::{Action, InputHandler},
};

pub use crate::rendering::{
    context::{DrawCommand, DrawListAdapter, RenderContext},
    svg::SvgAdapter,
    MountSurface, RenderAdapter, Scene,
};

#[cfg(feature = "egui")]
pub use crate::rendering::egui::EguiAdapter;

#[cfg(feature = "egui")]
pub use crate::ui::UiMapExt;

pub use crate::ui::{
    controls::{ControlAction, ControlId, ControlManager},
    navigation::{NavigationKind, Navigator},
    popup::{InfoChange, InfoDisplay, InfoPanel, InfoTarget},
    timer::{AutoHideTimer, DeadlineTimer},
    widget::MapWidget,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Mount error: {0}")]
    Mount(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Installs an `env_logger` logger filtered by `RUST_LOG`, defaulting to
/// debug output for this crate. Safe to call more than once.
#[cfg(feature = "debug")]
pub fn init_logger() {
    let env = env_logger::Env::default().default_filter_or("landmark_map=debug,info");
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("logger already initialized");
    }
}

/// Error type alias for convenience
pub type Error = MapError;
