//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns the transient input state (cursor tracking,
//! drag state) and the key-binding map. It sits between raw window events
//! and the engine's [`execute`](crate::engine::SwarmEngine::execute)
//! method.

use glam::Vec2;

use super::event::{InputEvent, MouseButton};
use crate::engine::command::SwarmCommand;
use crate::options::KeybindingOptions;

/// Converts raw window events into [`SwarmCommand`]s.
///
/// # Usage
///
/// ```ignore
/// if let Some(cmd) = input_processor.handle_event(event) {
///     engine.execute(cmd);
/// }
///
/// if let Some(cmd) = input_processor.handle_key_press("Tab") {
///     engine.execute(cmd);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    /// Last cursor position, `None` until the first move.
    last_cursor: Option<Vec2>,
    /// Whether the primary mouse button is currently held.
    mouse_pressed: bool,
    /// Key string → action mapping.
    key_bindings: KeybindingOptions,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeybindingOptions) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Whether the primary mouse button is pressed.
    #[must_use]
    pub fn mouse_pressed(&self) -> bool {
        self.mouse_pressed
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeybindingOptions {
        &self.key_bindings
    }

    /// Replace the key bindings.
    pub fn set_key_bindings(&mut self, key_bindings: KeybindingOptions) {
        self.key_bindings = key_bindings;
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<SwarmCommand> {
        self.key_bindings.lookup(key).map(|action| action.to_command())
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<SwarmCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(x, y),
            InputEvent::MouseButton { button, pressed } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = pressed;
                }
                None
            }
            InputEvent::Scroll { delta } => Some(SwarmCommand::Zoom { delta }),
        }
    }

    /// Cursor moved: orbit while the primary button is held.
    fn handle_cursor_moved(&mut self, x: f32, y: f32) -> Option<SwarmCommand> {
        let current = Vec2::new(x, y);
        let delta = self
            .last_cursor
            .replace(current)
            .map_or(Vec2::ZERO, |last| current - last);

        if self.mouse_pressed && delta != Vec2::ZERO {
            return Some(SwarmCommand::RotateCamera { delta });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawStrategy;

    #[test]
    fn drag_rotates_only_while_pressed() {
        let mut input = InputProcessor::new();
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 10.0, y: 10.0 }),
            None
        );
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 20.0, y: 10.0 }),
            None
        );

        let _ = input.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 25.0, y: 13.0 }),
            Some(SwarmCommand::RotateCamera {
                delta: Vec2::new(5.0, 3.0)
            })
        );

        let _ = input.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        });
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 30.0, y: 13.0 }),
            None
        );
    }

    #[test]
    fn first_move_after_press_has_no_jump() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 500.0, y: 400.0 }),
            None
        );
    }

    #[test]
    fn right_button_does_not_orbit() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(InputEvent::MouseButton {
            button: MouseButton::Right,
            pressed: true,
        });
        assert!(!input.mouse_pressed());
    }

    #[test]
    fn scroll_zooms() {
        let mut input = InputProcessor::new();
        assert_eq!(
            input.handle_event(InputEvent::Scroll { delta: -2.0 }),
            Some(SwarmCommand::Zoom { delta: -2.0 })
        );
    }

    #[test]
    fn default_keys_map_to_commands() {
        let input = InputProcessor::new();
        assert_eq!(
            input.handle_key_press("Tab"),
            Some(SwarmCommand::CycleStrategy)
        );
        assert_eq!(
            input.handle_key_press("Digit3"),
            Some(SwarmCommand::SetStrategy(DrawStrategy::MultiDrawIndirect))
        );
        assert_eq!(
            input.handle_key_press("Equal"),
            Some(SwarmCommand::StepInstanceCount { increase: true })
        );
        assert_eq!(input.handle_key_press("KeyZ"), None);
    }
}
