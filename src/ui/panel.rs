// src/ui/panel.rs
//! Editor panels
//!
//! The mode panel shows the three transform modes with the active one highlighted,
//! and the snap checkbox. Clicks are returned as [`UiAction`]s for the app to apply
//! once the frame is drawn.

use std::{cell::Cell, rc::Rc};

use crate::selection::{ModeDisplay, TransformMode};

/// A request made through the UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    SetMode(TransformMode),
    ToggleSnap(bool),
}

/// Shared cell holding the mode the panel highlights
///
/// The selection controller updates it through [`ModeDisplay`]; the panel reads it
/// every frame.
#[derive(Debug, Clone, Default)]
pub struct ModeIndicator {
    active: Rc<Cell<TransformMode>>,
}

impl ModeIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> TransformMode {
        self.active.get()
    }
}

impl ModeDisplay for ModeIndicator {
    fn update_mode_display(&mut self, mode: TransformMode) {
        self.active.set(mode);
    }
}

/// Label of a mode entry, e.g. `[T] Translate`
pub fn mode_entry_label(mode: TransformMode) -> String {
    format!("[{}] {}", mode.key_hint(), mode.label())
}

/// Mode and snapping panel
///
/// # Arguments
/// * `ui` - ImGui UI context
/// * `indicator` - Mode to highlight
/// * `snap_enabled` - Current state of the snap checkbox
///
/// # Returns
/// Actions requested this frame, in the order they were clicked
pub fn mode_panel(ui: &imgui::Ui, indicator: &ModeIndicator, snap_enabled: bool) -> Vec<UiAction> {
    let mut actions = Vec::new();
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return actions;
    }

    ui.window("Transform")
        .position([16.0, 16.0], imgui::Condition::FirstUseEver)
        .always_auto_resize(true)
        .collapsible(false)
        .build(|| {
            let active = indicator.active();
            for mode in TransformMode::ALL {
                if ui
                    .selectable_config(mode_entry_label(mode))
                    .selected(mode == active)
                    .build()
                {
                    actions.push(UiAction::SetMode(mode));
                }
            }

            ui.separator();

            let mut snap = snap_enabled;
            if ui.checkbox("Snap Feature", &mut snap) {
                actions.push(UiAction::ToggleSnap(snap));
            }

            ui.separator();
            ui.text_disabled("Right drag or shift+drag to pan, wheel to zoom");
            ui.text_disabled("Esc deselects");
        });

    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_follows_mode_display_updates() {
        let indicator = ModeIndicator::new();
        let mut display: Box<dyn ModeDisplay> = Box::new(indicator.clone());

        assert_eq!(indicator.active(), TransformMode::Translate);
        display.update_mode_display(TransformMode::Scale);
        display.update_mode_display(TransformMode::Scale);
        assert_eq!(indicator.active(), TransformMode::Scale);
    }

    #[test]
    fn test_entry_labels_show_shortcuts() {
        assert_eq!(mode_entry_label(TransformMode::Rotate), "[R] Rotate");
    }
}
