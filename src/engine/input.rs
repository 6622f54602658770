//! Input methods for RenderEngine

use super::RenderEngine;
use crate::input::{InputEvent, KeyAction};

impl RenderEngine {
    /// Process a platform-agnostic input event.
    ///
    /// Mouse drags orbit or pan the camera, the wheel zooms. Returns `true`
    /// if the camera moved.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        let gesture = match event {
            InputEvent::CursorMoved { x, y } => self.mouse.cursor_moved(x, y),
            InputEvent::MouseButton { button, pressed } => {
                self.mouse.button(button, pressed);
                None
            }
            InputEvent::Scroll { delta } => self.mouse.scroll(delta),
            InputEvent::ModifiersChanged { shift } => {
                self.mouse.set_shift(shift);
                None
            }
        };
        gesture.is_some_and(|gesture| {
            self.camera_controller.apply(gesture);
            true
        })
    }

    /// Run the action bound to a physical key code string (e.g. `"KeyG"`).
    /// Returns `true` if the key was bound.
    pub fn handle_key(&mut self, key: &str) -> bool {
        let Some(action) = self.options.keybindings.lookup(key) else {
            return false;
        };
        log::debug!("{key} -> {action:?}");
        action.execute(self);
        true
    }
}

impl KeyAction {
    /// Apply this action to the engine.
    pub fn execute(self, engine: &mut RenderEngine) {
        match self {
            Self::RegenerateScene => engine.regenerate_scene(),
            Self::ToggleTracing => engine.toggle_tracing(),
            Self::ToggleView => engine.toggle_view(),
            Self::ResetCamera => engine.camera_controller.reset(),
        }
    }
}
