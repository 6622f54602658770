//! Keyboard actions and mouse-driven camera control.

/// Platform-agnostic input events.
pub mod event;
/// Bindable discrete actions.
pub mod keyboard;
/// Mouse drag and wheel gestures for the orbit camera.
pub mod mouse;

pub use event::InputEvent;
pub use keyboard::KeyAction;
pub use mouse::{MouseButton, MouseGesture, MouseState};
