use crate::{config::SnapIncrements, gfx::gizmos::GizmoMode};

/// Operation applied by the transform handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransformMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl TransformMode {
    pub const ALL: [TransformMode; 3] = [Self::Translate, Self::Rotate, Self::Scale];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Translate => "Translate",
            Self::Rotate => "Rotate",
            Self::Scale => "Scale",
        }
    }

    /// Keyboard shortcut shown next to the mode
    pub fn key_hint(&self) -> &'static str {
        match self {
            Self::Translate => "T",
            Self::Rotate => "R",
            Self::Scale => "S",
        }
    }
}

impl From<TransformMode> for GizmoMode {
    fn from(mode: TransformMode) -> Self {
        match mode {
            TransformMode::Translate => GizmoMode::Translate,
            TransformMode::Rotate => GizmoMode::Rotate,
            TransformMode::Scale => GizmoMode::Scale,
        }
    }
}

/// Which handle axes are enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisVisibility {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl AxisVisibility {
    /// Translate and scale stay on the ground plane (X and Z); rotate only turns
    /// about the vertical axis.
    pub fn for_mode(mode: TransformMode) -> Self {
        match mode {
            TransformMode::Translate | TransformMode::Scale => Self {
                x: true,
                y: false,
                z: true,
            },
            TransformMode::Rotate => Self {
                x: false,
                y: true,
                z: false,
            },
        }
    }
}

/// Snap increments in effect on the handle; `None` means free-form
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SnapSettings {
    pub translation: Option<f32>,
    pub rotation: Option<f32>,
    pub scale: Option<f32>,
}

impl SnapSettings {
    pub fn enabled(increments: &SnapIncrements) -> Self {
        Self {
            translation: Some(increments.translation),
            rotation: Some(increments.rotation),
            scale: Some(increments.scale),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_free(&self) -> bool {
        self.translation.is_none() && self.rotation.is_none() && self.scale.is_none()
    }
}

/// Receives the active mode whenever it is (re)applied.
///
/// Implementations must tolerate repeated calls with the same mode.
pub trait ModeDisplay {
    fn update_mode_display(&mut self, mode: TransformMode);
}
