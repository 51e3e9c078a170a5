use cgmath::Point2;
use glium::glutin::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

mod drag;

pub use drag::Drag;

/// Window input relevant to the viewer, independent of the windowing
/// backend.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    /// The window was asked to close.
    Quit,
    /// The left mouse button was pressed.
    PointerDown,
    /// The left mouse button was released.
    PointerUp,
    /// The cursor moved to a new position, in physical pixels.
    PointerMoved(Point2<f64>),
    /// The cursor left the window.
    PointerLeft,
    /// The mouse wheel moved; positive values scroll up (zoom in).
    Scroll(f64),
    /// The window was resized to a new size, in physical pixels.
    Resized(u32, u32),
}

impl InputEvent {
    /// Converts a window event, returning `None` for events the viewer
    /// ignores.
    pub fn from_window_event(ev: &WindowEvent<'_>) -> Option<Self> {
        match ev {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => Some(Self::Quit),

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => Some(Self::PointerDown),
                ElementState::Released => Some(Self::PointerUp),
            },

            WindowEvent::CursorMoved { position, .. } => {
                Some(Self::PointerMoved(Point2::new(position.x, position.y)))
            }
            WindowEvent::CursorLeft { .. } => Some(Self::PointerLeft),

            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_dx, dy) => *dy as f64,
                    MouseScrollDelta::PixelDelta(delta) => delta.y,
                };
                if dy == 0.0 {
                    None
                } else {
                    Some(Self::Scroll(dy))
                }
            }

            WindowEvent::Resized(size) => Some(Self::Resized(size.width, size.height)),

            _ => None,
        }
    }
}
