pub mod controls;
pub mod navigation;
pub mod popup;
pub mod timer;
pub mod widget;

pub use controls::{ControlAction, ControlBinding, ControlId, ControlManager};

pub use navigation::{
    GeolocationError, GeolocationProvider, LinkOpener, LoggingOpener, NavigationKind, Navigator,
    NoGeolocation,
};

pub use popup::{InfoChange, InfoDisplay, InfoPanel, InfoTarget};

pub use timer::{AutoHideTimer, DeadlineTimer};

pub use widget::MapWidget;

/// Shows a [`MapWidget`] inside an egui layout
#[cfg(feature = "egui")]
pub trait UiMapExt {
    /// Runs one frame of the map: input, auto-hide, render and paint.
    /// Returns whether the map wants another frame soon.
    fn landmark_map(
        &mut self,
        map: &mut MapWidget,
        adapter: &crate::rendering::egui::EguiAdapter,
    ) -> bool;
}

#[cfg(feature = "egui")]
impl UiMapExt for egui::Ui {
    fn landmark_map(
        &mut self,
        map: &mut MapWidget,
        adapter: &crate::rendering::egui::EguiAdapter,
    ) -> bool {
        let now = crate::prelude::Instant::now();

        let (rect, events) = adapter.interact(self);
        for event in events {
            map.handle_input(event, now);
        }
        map.update(now);

        if let Err(e) = map.render_if_dirty() {
            log::error!("map render failed: {}", e);
        }

        for event in adapter.paint(self, rect) {
            map.handle_input(event, now);
        }

        // Keep ticking while a timer is pending or a drag is in flight
        map.needs_render()
            || map.pending_hides() > 0
            || map.pending_intro().is_some()
            || map.is_dragging()
    }
}
