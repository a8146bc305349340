use crate::{
    core::{
        geo::Point,
        viewport::{apply_pan, apply_zoom_step, reset, TransformLimits, ViewTransform},
    },
    input::events::{InputEvent, MapEvent, MapEventKind, TouchEventType, TouchPoint},
    prelude::{HashMap, VecDeque},
    ui::{controls::ControlAction, navigation::NavigationKind, popup::InfoTarget},
};

/// Change requested by the controller; the widget applies it
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetTransform(ViewTransform),
    ShowInfo(InfoTarget),
    HideInfo,
    /// Marker whose name tooltip should show, or none
    SetHover(Option<usize>),
    Navigate(NavigationKind),
    Resize(Point),
}

/// Drag gesture state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        /// Touch id driving the drag; `None` for mouse drags
        touch_id: Option<u64>,
        start_pointer: Point,
        start_offset: Point,
    },
}

/// What the controller needs to know about the widget for one event
#[derive(Debug, Clone, Copy)]
pub struct ViewState<'a> {
    pub transform: &'a ViewTransform,
    pub limits: &'a TransformLimits,
    pub info_visible: bool,
}

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Event management system for the widget
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event kind
    listeners: HashMap<MapEventKind, Vec<EventCallback>>,
    /// Event queue for processing
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, kind: MapEventKind, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners.entry(kind).or_default().push(Box::new(callback));
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, event: MapEvent) {
        self.event_queue.push_back(event);
    }

    /// Process all queued events
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(&event.kind()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }

    /// Drop every listener
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }
}

/// Input handler that owns the drag state machine and turns events into actions
pub struct InputHandler {
    pub enabled: bool,
    pub pan_on_drag: bool,
    drag: DragState,
    event_manager: EventManager,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            enabled: true,
            pan_on_drag: true,
            drag: DragState::Idle,
            event_manager: EventManager::new(),
        }
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    /// Handle one input event and produce the actions it implies
    pub fn handle_event(&mut self, event: InputEvent, view: ViewState<'_>) -> Vec<Action> {
        if !self.enabled {
            return vec![];
        }

        match event {
            InputEvent::PointerDown { position } => self.begin_drag(None, position, view),
            InputEvent::PointerMove { position } => self.drag_to(None, position, view),
            InputEvent::PointerUp | InputEvent::PointerLeave => self.end_drag(view),
            InputEvent::Touch {
                event_type,
                touches,
            } => self.handle_touch(event_type, &touches, view),
            InputEvent::MarkerClick { index } => vec![Action::ShowInfo(InfoTarget::Landmark(index))],
            InputEvent::MarkerHover { index } => vec![Action::SetHover(index)],
            InputEvent::Control(action) => self.handle_control(action, view),
            InputEvent::Resize { size } => vec![Action::Resize(size)],
        }
    }

    fn handle_touch(
        &mut self,
        event_type: TouchEventType,
        touches: &[TouchPoint],
        view: ViewState<'_>,
    ) -> Vec<Action> {
        match event_type {
            // Only single-finger touches drag; pinch is not supported
            TouchEventType::Start => match touches {
                [touch] => self.begin_drag(Some(touch.id), touch.position, view),
                _ => vec![],
            },
            TouchEventType::Move => match touches {
                [touch] => self.drag_to(Some(touch.id), touch.position, view),
                _ => vec![],
            },
            TouchEventType::End | TouchEventType::Cancel => {
                let lifted = match self.drag {
                    DragState::Dragging {
                        touch_id: Some(id), ..
                    } => touches.is_empty() || touches.iter().any(|touch| touch.id == id),
                    // A mouse drag is not ended by a finger
                    _ => touches.is_empty(),
                };
                if lifted {
                    self.end_drag(view)
                } else {
                    vec![]
                }
            }
        }
    }

    fn begin_drag(&mut self, touch_id: Option<u64>, position: Point, view: ViewState<'_>) -> Vec<Action> {
        if !self.pan_on_drag || !position.is_finite() {
            return vec![];
        }

        self.drag = DragState::Dragging {
            touch_id,
            start_pointer: position,
            start_offset: view.transform.offset,
        };
        self.event_manager.emit(MapEvent::DragStart { position });
        vec![]
    }

    fn drag_to(&mut self, touch_id: Option<u64>, position: Point, view: ViewState<'_>) -> Vec<Action> {
        let DragState::Dragging {
            touch_id: active_touch,
            start_pointer,
            start_offset,
        } = self.drag
        else {
            return vec![];
        };

        if active_touch != touch_id {
            return vec![];
        }

        // Offset is recomputed from the drag origin so coalesced moves cannot drift
        let origin = ViewTransform::new(start_offset, view.transform.scale);
        let next = apply_pan(&origin, position.subtract(&start_pointer), view.limits);
        if next == *view.transform {
            return vec![];
        }

        self.event_manager.emit(MapEvent::ViewChanged { transform: next });
        vec![Action::SetTransform(next)]
    }

    fn end_drag(&mut self, view: ViewState<'_>) -> Vec<Action> {
        if self.is_dragging() {
            self.drag = DragState::Idle;
            self.event_manager.emit(MapEvent::DragEnd {
                transform: *view.transform,
            });
        }
        vec![]
    }

    fn handle_control(&mut self, action: ControlAction, view: ViewState<'_>) -> Vec<Action> {
        match action {
            ControlAction::Zoom(direction) => {
                let next = apply_zoom_step(view.transform, direction, view.limits);
                if next == *view.transform {
                    log::debug!("zoom {:?} ignored at scale {}", direction, next.scale);
                    return vec![];
                }
                self.event_manager.emit(MapEvent::ViewChanged { transform: next });
                vec![Action::SetTransform(next)]
            }
            ControlAction::Reset => {
                let identity = reset();
                if identity != *view.transform {
                    self.event_manager
                        .emit(MapEvent::ViewChanged { transform: identity });
                }
                if self.is_dragging() {
                    self.drag = DragState::Idle;
                    self.event_manager
                        .emit(MapEvent::DragEnd { transform: identity });
                }
                vec![
                    Action::SetTransform(identity),
                    Action::ShowInfo(InfoTarget::Institute),
                ]
            }
            ControlAction::ToggleInfo => {
                if view.info_visible {
                    vec![Action::HideInfo]
                } else {
                    vec![Action::ShowInfo(InfoTarget::Institute)]
                }
            }
            ControlAction::Navigate(kind) => vec![Action::Navigate(kind)],
        }
    }

    /// Register an event listener
    pub fn on<F>(&mut self, kind: MapEventKind, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.event_manager.on(kind, callback);
    }

    /// Emit an event manually
    pub fn emit_event(&mut self, event: MapEvent) {
        self.event_manager.emit(event);
    }

    /// Process all queued events and return them
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.event_manager.process_events()
    }

    /// Forget the gesture in progress and every listener
    pub fn detach(&mut self) {
        self.drag = DragState::Idle;
        self.event_manager.clear_listeners();
    }

    pub fn listener_count(&self) -> usize {
        self.event_manager.listener_count()
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
