use crate::{
    core::{
        builder::MapBuilder,
        config::InstituteInfo,
        geo::Point,
        landmark::LandmarkSet,
        viewport::{ViewTransform, Viewport},
    },
    input::{
        events::{InputEvent, MapEvent, MapEventKind},
        handler::{Action, InputHandler, ViewState},
    },
    prelude::{Duration, Instant},
    rendering::{MountSurface, RenderAdapter, Scene},
    ui::{
        controls::{ControlAction, ControlId, ControlManager},
        navigation::{NavigationKind, Navigator},
        popup::{InfoChange, InfoDisplay, InfoPanel, InfoTarget},
    },
    Result,
};

/// Interactive landmark map.
///
/// Owns the view transform, the drag controller, the info panel with its
/// auto-hide timer and the render adapter. The host feeds input events and
/// frame ticks; the widget decides what changes and asks the adapter to draw.
/// Dropping the widget unmounts the adapter and cancels the pending hide.
pub struct MapWidget {
    institute: InstituteInfo,
    landmarks: LandmarkSet,
    viewport: Viewport,
    input: InputHandler,
    info: InfoDisplay,
    controls: ControlManager,
    navigator: Navigator,
    adapter: Box<dyn RenderAdapter>,
    surface: Option<MountSurface>,
    intro_delay: Option<Duration>,
    hovered: Option<usize>,
    dirty: bool,
}

impl MapWidget {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        institute: InstituteInfo,
        landmarks: LandmarkSet,
        viewport: Viewport,
        input: InputHandler,
        info: InfoDisplay,
        controls: ControlManager,
        navigator: Navigator,
        adapter: Box<dyn RenderAdapter>,
        intro_delay: Option<Duration>,
    ) -> Self {
        Self {
            institute,
            landmarks,
            viewport,
            input,
            info,
            controls,
            navigator,
            adapter,
            surface: None,
            intro_delay,
            hovered: None,
            dirty: true,
        }
    }

    /// Builds the widget and attaches it to `surface`.
    ///
    /// A missing surface is not an error: the page simply has no map there, so
    /// this logs a warning and returns `None`. Configuration and adapter
    /// failures are logged and also yield `None`.
    pub fn mount(builder: MapBuilder, surface: Option<&MountSurface>) -> Option<MapWidget> {
        let Some(surface) = surface else {
            log::warn!("map container not found, skipping initialization");
            return None;
        };

        let mut widget = match builder.build() {
            Ok(widget) => widget,
            Err(e) => {
                log::error!("failed to build map for '{}': {}", surface.id, e);
                return None;
            }
        };

        if let Err(e) = widget.attach(surface) {
            log::error!("failed to mount map on '{}': {}", surface.id, e);
            return None;
        }

        log::info!(
            "map mounted on '{}' with {} landmarks",
            surface.id,
            widget.landmarks.len()
        );
        Some(widget)
    }

    /// Mounts the adapter on `surface` and draws the first frame. The
    /// institute panel is scheduled to open once the intro delay passes.
    pub fn attach(&mut self, surface: &MountSurface) -> Result<()> {
        if self.surface.is_some() {
            self.adapter.unmount();
        }
        self.adapter.mount(surface)?;
        self.surface = Some(surface.clone());
        self.viewport.set_size(surface.size);
        self.dirty = true;
        self.render()?;

        if let Some(delay) = self.intro_delay {
            if !self.info.is_visible() {
                self.info.show_after(InfoTarget::Institute, delay, Instant::now());
            }
        }
        Ok(())
    }

    /// Detaches from the surface; the widget can be attached again later
    pub fn unmount(&mut self) {
        if let Some(surface) = self.surface.take() {
            log::debug!("unmounting map from '{}'", surface.id);
        }
        self.adapter.unmount();
        self.input.detach();
        self.hovered = None;
        if self.info.hide().is_some() {
            log::debug!("info panel closed on unmount");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    /// Feeds one input event. Returns whether anything visible changed.
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) -> bool {
        let event = match event {
            InputEvent::MarkerClick { index } if self.landmarks.get(index).is_none() => {
                log::debug!("ignoring click on unknown marker {}", index);
                return false;
            }
            other => other,
        };

        let actions = self.input.handle_event(
            event,
            ViewState {
                transform: self.viewport.transform(),
                limits: self.viewport.limits(),
                info_visible: self.info.is_visible(),
            },
        );

        let mut changed = false;
        for action in actions {
            changed |= self.apply(action, now);
        }
        self.input.process_events();

        self.dirty |= changed;
        changed
    }

    fn apply(&mut self, action: Action, now: Instant) -> bool {
        match action {
            Action::SetTransform(transform) => {
                let before = *self.viewport.transform();
                self.viewport.set_transform(transform);
                *self.viewport.transform() != before
            }
            Action::ShowInfo(target) => {
                let target = self.normalize(target);
                self.info.show(target, now);
                self.input.emit_event(MapEvent::InfoShown { target });
                true
            }
            Action::HideInfo => match self.info.hide() {
                Some(target) => {
                    self.input.emit_event(MapEvent::InfoHidden { target });
                    true
                }
                None => false,
            },
            Action::SetHover(index) => {
                let index = index.filter(|&index| self.landmarks.get(index).is_some());
                if index == self.hovered {
                    return false;
                }
                self.hovered = index;
                self.input.emit_event(MapEvent::MarkerHovered { index });
                true
            }
            Action::Navigate(kind) => {
                self.navigate(kind);
                false
            }
            Action::Resize(size) => {
                if size == self.viewport.size || !size.is_finite() {
                    return false;
                }
                self.viewport.set_size(size);
                true
            }
        }
    }

    /// The institute's own marker opens the institute panel
    fn normalize(&self, target: InfoTarget) -> InfoTarget {
        match target {
            InfoTarget::Landmark(index) if index == self.landmarks.institute_index() => {
                InfoTarget::Institute
            }
            other => other,
        }
    }

    /// Presses the control bound to `id`. Unknown ids are ignored.
    pub fn press(&mut self, id: impl Into<ControlId>, now: Instant) -> bool {
        let id = id.into();
        match self.controls.action_for(&id) {
            Some(action) => self.handle_input(InputEvent::Control(action), now),
            None => {
                log::debug!("no control bound to '{}'", id);
                false
            }
        }
    }

    pub fn click_marker(&mut self, index: usize, now: Instant) -> bool {
        self.handle_input(InputEvent::MarkerClick { index }, now)
    }

    pub fn zoom_in(&mut self, now: Instant) -> bool {
        self.handle_input(
            InputEvent::Control(ControlAction::Zoom(crate::ZoomDirection::In)),
            now,
        )
    }

    pub fn zoom_out(&mut self, now: Instant) -> bool {
        self.handle_input(
            InputEvent::Control(ControlAction::Zoom(crate::ZoomDirection::Out)),
            now,
        )
    }

    pub fn reset(&mut self, now: Instant) -> bool {
        self.handle_input(InputEvent::Control(ControlAction::Reset), now)
    }

    /// Opens a navigation link for the institute and returns its URL
    pub fn navigate(&mut self, kind: NavigationKind) -> String {
        let url = self.navigator.open(kind);
        self.input.emit_event(MapEvent::NavigationRequested {
            kind,
            url: url.clone(),
        });
        self.input.process_events();
        url
    }

    /// Frame tick: applies a due delayed show or auto-hide. Returns whether
    /// the panel changed.
    pub fn update(&mut self, now: Instant) -> bool {
        let event = match self.info.update(now) {
            Some(InfoChange::Shown(target)) => {
                log::debug!("showing info panel {:?} after intro delay", target);
                MapEvent::InfoShown { target }
            }
            Some(InfoChange::Hidden(target)) => {
                log::debug!("auto-hiding info panel {:?}", target);
                MapEvent::InfoHidden { target }
            }
            None => return false,
        };
        self.input.emit_event(event);
        self.input.process_events();
        self.dirty = true;
        true
    }

    /// Draws the current state through the adapter
    pub fn render(&mut self) -> Result<()> {
        let scene = Scene::new(
            &self.landmarks,
            *self.viewport.transform(),
            self.viewport.size,
        )
        .with_info(self.info_panel())
        .with_controls(self.controls.visible().cloned().collect())
        .with_hover(self.hovered);

        self.adapter.render(&scene)?;
        self.dirty = false;
        Ok(())
    }

    /// Renders only if something changed since the last frame
    pub fn render_if_dirty(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    pub fn resize(&mut self, size: Point) -> bool {
        let changed = self.apply(Action::Resize(size), Instant::now());
        self.dirty |= changed;
        changed
    }

    /// Register a listener for one kind of map event
    pub fn on<F>(&mut self, kind: MapEventKind, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.input.on(kind, callback);
    }

    pub fn set_interactive(&mut self, enabled: bool) {
        self.input.enabled = enabled;
    }

    pub fn transform(&self) -> &ViewTransform {
        self.viewport.transform()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn visible_info(&self) -> Option<InfoTarget> {
        self.info.visible()
    }

    /// Text of the visible info panel
    pub fn info_panel(&self) -> Option<InfoPanel> {
        self.info
            .visible()
            .and_then(|target| InfoPanel::for_target(target, &self.institute, &self.landmarks))
    }

    pub fn pending_hides(&self) -> usize {
        self.info.pending_hides()
    }

    /// Panel waiting for its delayed show
    pub fn pending_intro(&self) -> Option<InfoTarget> {
        self.info.pending_show()
    }

    pub fn auto_hide(&self) -> Duration {
        self.info.auto_hide()
    }

    pub fn intro_delay(&self) -> Option<Duration> {
        self.intro_delay
    }

    /// Marker whose name tooltip is showing
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn is_dragging(&self) -> bool {
        self.input.is_dragging()
    }

    pub fn landmarks(&self) -> &LandmarkSet {
        &self.landmarks
    }

    pub fn institute(&self) -> &InstituteInfo {
        &self.institute
    }

    pub fn controls(&self) -> &ControlManager {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ControlManager {
        self.dirty = true;
        &mut self.controls
    }

    pub fn adapter(&self) -> &dyn RenderAdapter {
        self.adapter.as_ref()
    }

    pub fn needs_render(&self) -> bool {
        self.dirty
    }
}

impl Drop for MapWidget {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for MapWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapWidget")
            .field("surface", &self.surface)
            .field("viewport", &self.viewport)
            .field("info", &self.info)
            .field("dragging", &self.input.is_dragging())
            .finish_non_exhaustive()
    }
}
