use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use crate::camera::controller::OrbitController;
use crate::camera::core::Camera;

/// Routes winit pointer events into an [`OrbitController`].
///
/// Left drag orbits, right drag or shift + left drag pans, the wheel
/// zooms.
#[derive(Debug, Default)]
pub struct InputHandler {
    last_mouse_pos: Option<Vec2>,
    left_pressed: bool,
    right_pressed: bool,
    shift_pressed: bool,
}

impl InputHandler {
    /// Handler with no buttons held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the event was consumed by the camera.
    pub fn handle_event(
        &mut self,
        controller: &mut OrbitController,
        camera: &Camera,
        viewport_height: f32,
        event: &WindowEvent,
    ) -> bool {
        match event {
            WindowEvent::MouseInput { button, state, .. } => {
                let pressed = *state == ElementState::Pressed;
                match button {
                    MouseButton::Left => self.left_pressed = pressed,
                    MouseButton::Right => self.right_pressed = pressed,
                    _ => return false,
                }
                true
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift_pressed = modifiers.state().shift_key();
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let current_pos =
                    Vec2::new(position.x as f32, position.y as f32);
                let delta = self
                    .last_mouse_pos
                    .map_or(Vec2::ZERO, |last| current_pos - last);
                self.last_mouse_pos = Some(current_pos);

                if self.right_pressed || (self.left_pressed && self.shift_pressed) {
                    controller.pan(camera, delta, viewport_height);
                } else if self.left_pressed {
                    controller.rotate(delta, viewport_height);
                }
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.last_mouse_pos = None;
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                controller.zoom(scroll);
                true
            }
            _ => false,
        }
    }
}
