use crate::core::viewport::ZoomDirection;
use crate::prelude::HashMap;
use crate::ui::navigation::NavigationKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a control does when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlAction {
    Zoom(ZoomDirection),
    /// Restore the identity transform and show the institute panel
    Reset,
    /// Show the institute panel, or hide whatever panel is open
    ToggleInfo,
    Navigate(NavigationKind),
}

/// Stable identifier a host uses to report which control was pressed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ControlId(String);

impl ControlId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ControlId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A control bound to an action; the label is presentation only
#[derive(Debug, Clone, PartialEq)]
pub struct ControlBinding {
    pub id: ControlId,
    pub action: ControlAction,
    pub label: String,
    pub visible: bool,
}

/// Control manager that holds every control binding of a widget.
///
/// Actions are looked up by [`ControlId`], never by the rendered label.
#[derive(Debug, Clone, Default)]
pub struct ControlManager {
    bindings: HashMap<ControlId, ControlBinding>,
    order: Vec<ControlId>,
}

impl ControlManager {
    pub const ZOOM_IN: &'static str = "zoom-in";
    pub const ZOOM_OUT: &'static str = "zoom-out";
    pub const RESET: &'static str = "reset";
    pub const INFO: &'static str = "info";
    pub const DIRECTIONS: &'static str = "directions";
    pub const STREET_VIEW: &'static str = "street-view";
    pub const OPEN_IN_MAPS: &'static str = "open-in-maps";

    pub fn new() -> Self {
        Self::default()
    }

    /// The zoom, reset and info buttons plus the three navigation links
    pub fn standard() -> Self {
        Self::new()
            .with_control(Self::ZOOM_IN, ControlAction::Zoom(ZoomDirection::In), "+")
            .with_control(Self::ZOOM_OUT, ControlAction::Zoom(ZoomDirection::Out), "−")
            .with_control(Self::RESET, ControlAction::Reset, "⌂")
            .with_control(Self::INFO, ControlAction::ToggleInfo, "ℹ")
            .with_control(
                Self::DIRECTIONS,
                ControlAction::Navigate(NavigationKind::Directions),
                "الاتجاهات",
            )
            .with_control(
                Self::STREET_VIEW,
                ControlAction::Navigate(NavigationKind::StreetView),
                "عرض الشارع",
            )
            .with_control(
                Self::OPEN_IN_MAPS,
                ControlAction::Navigate(NavigationKind::OpenInMaps),
                "فتح في الخرائط",
            )
    }

    pub fn with_control(
        mut self,
        id: impl Into<ControlId>,
        action: ControlAction,
        label: impl Into<String>,
    ) -> Self {
        self.bind(id, action, label);
        self
    }

    /// Binds `id` to `action`, replacing any earlier binding for the same id
    pub fn bind(&mut self, id: impl Into<ControlId>, action: ControlAction, label: impl Into<String>) {
        let id = id.into();
        let binding = ControlBinding {
            id: id.clone(),
            action,
            label: label.into(),
            visible: true,
        };
        if self.bindings.insert(id.clone(), binding).is_none() {
            self.order.push(id);
        }
    }

    pub fn unbind(&mut self, id: &ControlId) -> Option<ControlBinding> {
        self.order.retain(|existing| existing != id);
        self.bindings.remove(id)
    }

    pub fn action_for(&self, id: &ControlId) -> Option<ControlAction> {
        self.bindings.get(id).map(|binding| binding.action)
    }

    pub fn set_visible(&mut self, id: &ControlId, visible: bool) {
        if let Some(binding) = self.bindings.get_mut(id) {
            binding.visible = visible;
        }
    }

    /// Visible controls in registration order
    pub fn visible(&self) -> impl Iterator<Item = &ControlBinding> {
        self.order
            .iter()
            .filter_map(|id| self.bindings.get(id))
            .filter(|binding| binding.visible)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_by_id_not_label() {
        let controls = ControlManager::standard();
        assert_eq!(
            controls.action_for(&ControlManager::ZOOM_IN.into()),
            Some(ControlAction::Zoom(ZoomDirection::In))
        );
        // The label "+" is not an id
        assert_eq!(controls.action_for(&"+".into()), None);
    }

    #[test]
    fn test_rebinding_keeps_order() {
        let mut controls = ControlManager::standard();
        let before: Vec<_> = controls.visible().map(|b| b.id.clone()).collect();

        controls.bind(ControlManager::RESET, ControlAction::ToggleInfo, "?");
        let after: Vec<_> = controls.visible().map(|b| b.id.clone()).collect();

        assert_eq!(before, after);
        assert_eq!(
            controls.action_for(&ControlManager::RESET.into()),
            Some(ControlAction::ToggleInfo)
        );
    }

    #[test]
    fn test_hidden_controls_still_resolve() {
        let mut controls = ControlManager::standard();
        let id = ControlId::from(ControlManager::STREET_VIEW);
        controls.set_visible(&id, false);

        assert_eq!(controls.visible().count(), controls.len() - 1);
        assert!(controls.action_for(&id).is_some());

        controls.unbind(&id);
        assert!(controls.action_for(&id).is_none());
    }
}
