use winit::event::{ElementState, Ime, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use super::types::{Event, Key, Modifiers, PointerButton};

/// Translates winit window events into [`Event`]s.
///
/// Keeps the little state the abstract model needs but winit does not put
/// on every event: the current modifier set and the last pointer position
/// (button events carry coordinates in the abstract model).
#[derive(Debug, Default)]
pub struct EventTranslator {
    modifiers: Modifiers,
    pointer: (f64, f64),
}

impl EventTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<Event> {
        match event {
            WindowEvent::CloseRequested => Some(Event::CloseRequested),

            WindowEvent::Resized(size) => {
                Some(Event::Resized { width: size.width, height: size.height })
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                Some(Event::ScaleFactorChanged { scale: *scale_factor })
            }

            WindowEvent::Focused(focused) => Some(Event::Focused(*focused)),

            WindowEvent::ModifiersChanged(m) => {
                self.modifiers = map_modifiers(m.state());
                None
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.pointer = (position.x, position.y);
                Some(Event::PointerMoved { x: position.x, y: position.y })
            }

            WindowEvent::CursorLeft { .. } => Some(Event::PointerLeft),

            WindowEvent::MouseInput { state, button, .. } => Some(Event::PointerButton {
                button: map_button(*button),
                pressed: *state == ElementState::Pressed,
                x: self.pointer.0,
                y: self.pointer.1,
                modifiers: self.modifiers,
            }),

            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (*x, *y),
                    MouseScrollDelta::PixelDelta(p) => (p.x as f32, p.y as f32),
                };
                Some(Event::Scroll { dx, dy, modifiers: self.modifiers })
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let (key, scancode) = map_physical_key(event.physical_key);
                Some(Event::Key {
                    key,
                    scancode,
                    pressed: event.state == ElementState::Pressed,
                    repeat: event.repeat,
                    modifiers: self.modifiers,
                })
            }

            WindowEvent::Ime(Ime::Commit(text)) if !text.is_empty() => {
                Some(Event::Text(text.clone()))
            }

            _ => None,
        }
    }
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
    }
}

fn map_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Left,
        MouseButton::Right => PointerButton::Right,
        MouseButton::Middle => PointerButton::Middle,
        MouseButton::Back => PointerButton::Back,
        MouseButton::Forward => PointerButton::Forward,
        MouseButton::Other(v) => PointerButton::Other(v),
    }
}

fn map_physical_key(key: PhysicalKey) -> (Key, u32) {
    match key {
        PhysicalKey::Code(code) => (key_from_code(code), code as u32),
        // No stable numeric code for unidentified platform keys.
        PhysicalKey::Unidentified(_) => (Key::Unknown(0), 0),
    }
}

/// Pure scancode-to-logical-key lookup.
pub fn key_from_code(code: KeyCode) -> Key {
    match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,

        KeyCode::Insert => Key::Insert,
        KeyCode::Delete => Key::Delete,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,

        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,

        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,

        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,

        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,

        other => Key::Unknown(other as u32),
    }
}
