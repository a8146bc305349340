use crate::core::config::InstituteInfo;
use crate::core::landmark::LandmarkSet;
use crate::prelude::{Duration, Instant};
use crate::ui::timer::{AutoHideTimer, DeadlineTimer};
use serde::{Deserialize, Serialize};

/// What an info panel is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfoTarget {
    /// The institute panel: name, address and transport routes
    Institute,
    /// A landmark panel, by index into the widget's landmark set
    Landmark(usize),
}

/// Text content of an info panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoPanel {
    pub title: String,
    pub lines: Vec<String>,
}

impl InfoPanel {
    pub fn for_target(target: InfoTarget, institute: &InstituteInfo, landmarks: &LandmarkSet) -> Option<Self> {
        match target {
            InfoTarget::Institute => Some(Self::institute(institute)),
            InfoTarget::Landmark(index) => {
                let landmark = landmarks.get(index)?;
                let meters = landmarks.distance_meters(landmark);
                Some(Self {
                    title: landmark.name.clone(),
                    lines: vec![
                        format!("نوع المكان: {}", landmark.category.label_ar()),
                        format!("المسافة من المعهد: {} متر تقريباً", meters),
                        format!("وقت المشي: {} دقائق", landmarks.walking_minutes(landmark)),
                    ],
                })
            }
        }
    }

    fn institute(institute: &InstituteInfo) -> Self {
        let mut lines = vec![institute.address.clone()];
        if let Some(phone) = &institute.phone {
            lines.push(format!("الهاتف: {}", phone));
        }
        if let Some(hours) = &institute.hours {
            lines.push(format!("المواعيد: {}", hours));
        }
        if !institute.transport_routes.is_empty() {
            lines.push("المواصلات المتاحة:".to_string());
            lines.extend(
                institute
                    .transport_routes
                    .iter()
                    .map(|route| format!("{}: {}", route.name, route.stops_display())),
            );
        }

        Self {
            title: institute.name.clone(),
            lines,
        }
    }
}

/// A panel change made by the timer rather than by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoChange {
    Shown(InfoTarget),
    Hidden(InfoTarget),
}

/// Which info panel is visible, and when it hides itself.
///
/// At most one target is visible. Every `show` cancels the pending hide and
/// schedules a fresh one, so there is never more than one hide outstanding.
/// A delayed show shares the same timer; any show or hide replaces it.
pub struct InfoDisplay {
    visible: Option<InfoTarget>,
    auto_hide: Duration,
    timer: Box<dyn AutoHideTimer>,
    generation: u64,
    /// Set while the timer is counting down to a show instead of a hide
    pending_show: Option<InfoTarget>,
}

impl InfoDisplay {
    pub fn new(auto_hide: Duration) -> Self {
        Self::with_timer(auto_hide, Box::new(DeadlineTimer::new()))
    }

    pub fn with_timer(auto_hide: Duration, timer: Box<dyn AutoHideTimer>) -> Self {
        Self {
            visible: None,
            auto_hide,
            timer,
            generation: 0,
            pending_show: None,
        }
    }

    /// Shows `target`, replacing whatever was visible, and restarts the auto-hide
    pub fn show(&mut self, target: InfoTarget, now: Instant) {
        self.pending_show = None;
        self.schedule(self.auto_hide, now);
        self.visible = Some(target);
    }

    /// Shows `target` once `delay` has passed; it then hides like any other panel
    pub fn show_after(&mut self, target: InfoTarget, delay: Duration, now: Instant) {
        self.schedule(delay, now);
        self.pending_show = Some(target);
    }

    fn schedule(&mut self, after: Duration, now: Instant) {
        self.timer.cancel();
        self.generation += 1;
        self.timer.schedule(self.generation, after, now);
    }

    /// Hides the current panel and drops a delayed show; returns what was visible
    pub fn hide(&mut self) -> Option<InfoTarget> {
        self.timer.cancel();
        self.pending_show = None;
        self.visible.take()
    }

    /// Applies a fired timer: a delayed show or an auto-hide
    pub fn update(&mut self, now: Instant) -> Option<InfoChange> {
        match self.timer.poll_fired(now) {
            Some(generation) if generation == self.generation => match self.pending_show.take() {
                Some(target) => {
                    self.show(target, now);
                    Some(InfoChange::Shown(target))
                }
                None => self.visible.take().map(InfoChange::Hidden),
            },
            _ => None,
        }
    }

    pub fn visible(&self) -> Option<InfoTarget> {
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible.is_some()
    }

    pub fn pending_hides(&self) -> usize {
        usize::from(self.timer.is_pending() && self.pending_show.is_none())
    }

    pub fn pending_show(&self) -> Option<InfoTarget> {
        self.pending_show
    }

    pub fn auto_hide(&self) -> Duration {
        self.auto_hide
    }
}

impl Drop for InfoDisplay {
    fn drop(&mut self) {
        self.timer.cancel();
    }
}

impl std::fmt::Debug for InfoDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfoDisplay")
            .field("visible", &self.visible)
            .field("auto_hide", &self.auto_hide)
            .field("generation", &self.generation)
            .field("pending_show", &self.pending_show)
            .finish_non_exhaustive()
    }
}
