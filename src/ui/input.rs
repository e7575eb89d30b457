//! Input events for the control panel
//!
//! The panel consumes its own small event vocabulary. [`InputTranslator`]
//! produces it from winit window events, tracking the cursor because winit
//! reports button presses without a position.

use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{Key, NamedKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Pointer activity in window pixel coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Pressed {
        position: (f64, f64),
        button: PointerButton,
    },
    Moved {
        position: (f64, f64),
    },
    Released {
        position: (f64, f64),
        button: PointerButton,
    },
}

/// Keyboard input relevant to a focused text field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Backspace,
    Enter,
    Escape,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Key(KeyInput),
}

/// Converts winit window events into panel input events
#[derive(Clone, Debug, Default)]
pub struct InputTranslator {
    cursor: (f64, f64),
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> (f64, f64) {
        self.cursor
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Vec<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x, position.y);
                vec![InputEvent::Pointer(PointerEvent::Moved {
                    position: self.cursor,
                })]
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = pointer_button(*button) else {
                    return Vec::new();
                };
                let position = self.cursor;
                let pointer = match state {
                    ElementState::Pressed => PointerEvent::Pressed { position, button },
                    ElementState::Released => PointerEvent::Released { position, button },
                };
                vec![InputEvent::Pointer(pointer)]
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                match &event.logical_key {
                    Key::Named(NamedKey::Backspace) => vec![InputEvent::Key(KeyInput::Backspace)],
                    Key::Named(NamedKey::Enter) => vec![InputEvent::Key(KeyInput::Enter)],
                    Key::Named(NamedKey::Escape) => vec![InputEvent::Key(KeyInput::Escape)],
                    _ => event
                        .text
                        .as_ref()
                        .map(|text| {
                            text.chars()
                                .filter(|c| !c.is_control())
                                .map(|c| InputEvent::Key(KeyInput::Char(c)))
                                .collect::<Vec<_>>()
                        })
                        .unwrap_or_default(),
                }
            }
            _ => Vec::new(),
        }
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}
