use glam::Vec2;

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            _ => Self::Left,
        }
    }
}

/// Camera motion requested by the mouse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseGesture {
    /// Orbit by a cursor delta in pixels.
    Rotate(Vec2),
    /// Translate the focus point by a cursor delta in pixels.
    Pan(Vec2),
    /// Dolly in (positive) or out.
    Zoom(f32),
}

/// Tracks cursor position and held buttons, turning raw events into
/// [`MouseGesture`]s.
///
/// Left drag orbits; shift + left drag, right drag or middle drag pans.
#[derive(Debug, Default)]
pub struct MouseState {
    position: Option<Vec2>,
    left: bool,
    right: bool,
    middle: bool,
    shift: bool,
}

impl MouseState {
    /// Fresh state with no buttons held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a button press or release.
    pub fn button(&mut self, button: MouseButton, pressed: bool) {
        match button {
            MouseButton::Left => self.left = pressed,
            MouseButton::Right => self.right = pressed,
            MouseButton::Middle => self.middle = pressed,
        }
    }

    /// Record the shift modifier.
    pub fn set_shift(&mut self, shift: bool) {
        self.shift = shift;
    }

    /// Move the cursor. Returns a gesture while a button is held.
    pub fn cursor_moved(&mut self, x: f32, y: f32) -> Option<MouseGesture> {
        let current = Vec2::new(x, y);
        let delta = current - self.position.replace(current)?;
        if self.right || self.middle || (self.left && self.shift) {
            Some(MouseGesture::Pan(delta))
        } else if self.left {
            Some(MouseGesture::Rotate(delta))
        } else {
            None
        }
    }

    /// Scroll wheel motion (positive = zoom in).
    #[must_use]
    pub fn scroll(&self, delta: f32) -> Option<MouseGesture> {
        (delta != 0.0).then_some(MouseGesture::Zoom(delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_move_only_records_position() {
        let mut mouse = MouseState::new();
        mouse.button(MouseButton::Left, true);
        assert_eq!(mouse.cursor_moved(10.0, 10.0), None);
        assert_eq!(
            mouse.cursor_moved(13.0, 6.0),
            Some(MouseGesture::Rotate(Vec2::new(3.0, -4.0)))
        );
    }

    #[test]
    fn hover_without_buttons_is_ignored() {
        let mut mouse = MouseState::new();
        let _ = mouse.cursor_moved(0.0, 0.0);
        assert_eq!(mouse.cursor_moved(5.0, 5.0), None);
    }

    #[test]
    fn shift_or_secondary_buttons_pan() {
        let mut mouse = MouseState::new();
        let _ = mouse.cursor_moved(0.0, 0.0);
        mouse.button(MouseButton::Left, true);
        mouse.set_shift(true);
        assert_eq!(
            mouse.cursor_moved(1.0, 0.0),
            Some(MouseGesture::Pan(Vec2::X))
        );
        mouse.set_shift(false);
        mouse.button(MouseButton::Left, false);
        mouse.button(MouseButton::Right, true);
        assert_eq!(
            mouse.cursor_moved(1.0, 1.0),
            Some(MouseGesture::Pan(Vec2::Y))
        );
    }

    #[test]
    fn zero_scroll_is_dropped() {
        let mouse = MouseState::new();
        assert_eq!(mouse.scroll(0.0), None);
        assert_eq!(mouse.scroll(1.5), Some(MouseGesture::Zoom(1.5)));
    }
}
