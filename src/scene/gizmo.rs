//! Editor gizmo configuration.
//!
//! Gizmos are purely descriptive here: the scene records which light carries
//! an affordance and how the manager is set up, a presenter with an editing
//! surface decides what to draw for them.

/// How the gizmo manager binds to its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AttachMode {
    /// Bound as soon as a target is configured.
    #[default]
    Always,
    /// Binding waits until the pointer explicitly picks a target.
    PointerGated,
}

/// A widget riding on a light so it can be grabbed and moved.
#[derive(Clone, Debug)]
pub struct LightGizmo {
    pub light: String,
    /// Size of the widget relative to its default, 2.0 doubles it.
    pub scale_ratio: f32,
}

impl LightGizmo {
    pub fn new(light: impl Into<String>, scale_ratio: f32) -> Self {
        Self {
            light: light.into(),
            scale_ratio,
        }
    }
}

/// Manager state shared by all gizmos of a scene.
#[derive(Clone, Debug, Default)]
pub struct GizmoSettings {
    pub position_enabled: bool,
    pub rotation_enabled: bool,
    pub attach: AttachMode,
    /// Light the manager is currently bound to. With
    /// [`AttachMode::PointerGated`] this records a manual binding that a
    /// pointer pick would replace.
    pub attached_to: Option<String>,
}
