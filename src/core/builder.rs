//! Map builder for fluent API configuration
//!
//! This module provides a MapBuilder that collects the landmark data, view
//! limits, render backend and timer before a [`MapWidget`] is created.

use crate::{
    core::{
        config::{InstituteInfo, MapConfig},
        geo::Point,
        landmark::Landmark,
        viewport::{TransformLimits, Viewport},
    },
    input::handler::InputHandler,
    prelude::Duration,
    rendering::{context::DrawListAdapter, RenderAdapter},
    ui::{
        controls::ControlManager,
        navigation::{GeolocationProvider, LinkOpener, Navigator},
        popup::InfoDisplay,
        timer::{AutoHideTimer, DeadlineTimer},
        widget::MapWidget,
    },
    Result,
};

/// Builder for creating and configuring MapWidget instances
pub struct MapBuilder {
    config: MapConfig,
    adapter: Option<Box<dyn RenderAdapter>>,
    timer: Option<Box<dyn AutoHideTimer>>,
    controls: ControlManager,
    geolocation: Option<Box<dyn GeolocationProvider>>,
    opener: Option<Box<dyn LinkOpener>>,
    interactive: bool,
    dragging: bool,
}

impl MapBuilder {
    /// Create a new MapBuilder for the default Alexandria site
    pub fn new() -> Self {
        Self {
            config: MapConfig::alexandria(),
            adapter: None,
            timer: None,
            controls: ControlManager::standard(),
            geolocation: None,
            opener: None,
            interactive: true,
            dragging: true,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: MapConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_landmarks(mut self, landmarks: Vec<Landmark>) -> Self {
        self.config.landmarks = landmarks;
        self
    }

    pub fn with_institute(mut self, institute: InstituteInfo) -> Self {
        self.config.institute = institute;
        self
    }

    /// Set pan and zoom limits
    pub fn with_limits(mut self, limits: TransformLimits) -> Self {
        self.config.limits = limits;
        self
    }

    /// Set how long an info panel stays up
    pub fn with_auto_hide(mut self, delay: Duration) -> Self {
        self.config.auto_hide_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Delay before the institute panel opens on its own after mount;
    /// `None` keeps the map quiet until the user acts
    pub fn with_intro_delay(mut self, delay: Option<Duration>) -> Self {
        self.config.intro_delay_ms =
            delay.map(|delay| u64::try_from(delay.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Initial viewport size, used until the surface reports its own
    pub fn with_viewport_size(mut self, size: Point) -> Self {
        self.config.viewport_size = size;
        self
    }

    /// Set the render backend; defaults to a headless draw list
    pub fn with_adapter(mut self, adapter: impl RenderAdapter + 'static) -> Self {
        self.adapter = Some(Box::new(adapter));
        self
    }

    /// Set the auto-hide timer; defaults to a frame-polled deadline timer
    pub fn with_timer(mut self, timer: impl AutoHideTimer + 'static) -> Self {
        self.timer = Some(Box::new(timer));
        self
    }

    pub fn with_controls(mut self, controls: ControlManager) -> Self {
        self.controls = controls;
        self
    }

    pub fn with_geolocation(mut self, provider: impl GeolocationProvider + 'static) -> Self {
        self.geolocation = Some(Box::new(provider));
        self
    }

    pub fn with_link_opener(mut self, opener: impl LinkOpener + 'static) -> Self {
        self.opener = Some(Box::new(opener));
        self
    }

    /// Enable or disable all user input
    pub fn with_interaction(mut self, enabled: bool) -> Self {
        self.interactive = enabled;
        self
    }

    /// Enable or disable panning by drag
    pub fn with_dragging(mut self, enabled: bool) -> Self {
        self.dragging = enabled;
        self
    }

    /// Build the widget with the configured options; it is not mounted yet
    pub fn build(self) -> Result<MapWidget> {
        self.config.validate()?;
        let landmarks = self.config.landmark_set()?;

        let viewport = Viewport::new(self.config.viewport_size, self.config.limits);

        let timer = self
            .timer
            .unwrap_or_else(|| Box::new(DeadlineTimer::new()));
        let info = InfoDisplay::with_timer(self.config.auto_hide(), timer);

        let mut navigator = Navigator::new(self.config.institute.location);
        if let Some(provider) = self.geolocation {
            navigator = navigator.with_geolocation(provider);
        }
        if let Some(opener) = self.opener {
            navigator = navigator.with_opener(opener);
        }

        let mut input = InputHandler::new();
        input.enabled = self.interactive;
        input.pan_on_drag = self.dragging;

        let adapter = self
            .adapter
            .unwrap_or_else(|| Box::new(DrawListAdapter::new()));

        log::debug!(
            "building map for '{}' with {} landmarks",
            self.config.institute.name,
            landmarks.len()
        );

        let intro_delay = self.config.intro_delay();

        Ok(MapWidget::from_parts(
            self.config.institute,
            landmarks,
            viewport,
            input,
            info,
            self.controls,
            navigator,
            adapter,
            intro_delay,
        ))
    }
}

impl Default for MapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::landmark::LandmarkCategory;
    use crate::MapError;

    #[test]
    fn test_default_build() {
        let widget = MapBuilder::new().build().unwrap();
        assert!(widget.transform().is_identity());
        assert_eq!(widget.landmarks().len(), 8);
        assert!(!widget.is_mounted());
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let limits = TransformLimits {
            min_zoom: 3.0,
            max_zoom: 0.5,
            ..TransformLimits::default()
        };
        let result = MapBuilder::new().with_limits(limits).build();
        assert!(matches!(result, Err(MapError::InvalidConfig(_))));
    }

    #[test]
    fn test_landmarks_without_institute_rejected() {
        let landmarks = vec![
            Landmark::new("Station", LandmarkCategory::Transport, Point::new(10.0, 10.0)).unwrap(),
        ];
        assert!(MapBuilder::new().with_landmarks(landmarks).build().is_err());
    }

    #[test]
    fn test_auto_hide_is_configurable() {
        let widget = MapBuilder::new()
            .with_auto_hide(Duration::from_secs(2))
            .build()
            .unwrap();
        assert_eq!(widget.auto_hide(), Duration::from_secs(2));
    }

    #[test]
    fn test_intro_delay_is_configurable() {
        let widget = MapBuilder::new().build().unwrap();
        assert_eq!(widget.intro_delay(), Some(Duration::from_millis(500)));

        let widget = MapBuilder::new().with_intro_delay(None).build().unwrap();
        assert_eq!(widget.intro_delay(), None);
    }

    #[test]
    fn test_zero_auto_hide_rejected() {
        assert!(MapBuilder::new()
            .with_auto_hide(Duration::ZERO)
            .build()
            .is_err());
    }
}
