use serde::{Deserialize, Serialize};

/// Engine-level actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// regenerate_scene = "KeyG"
/// toggle_view = "KeyV"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Discard the sphere field and generate a new one.
    RegenerateScene,
    /// Flip the ray tracer between tracing and pass-through.
    ToggleTracing,
    /// Switch the displayed output between ray tracer and HDRI aligner.
    ToggleView,
    /// Return the camera to its initial orbit.
    ResetCamera,
}
