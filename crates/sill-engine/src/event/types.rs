/// Modifier key state carried on keyboard/pointer events.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Pointer button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Logical key identifier.
///
/// Unmapped platform keys come through as `Unknown` with the stable
/// platform code, so applications can still bind them.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    Shift,
    Control,
    Alt,
    Meta,

    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    Unknown(u32),
}

/// Events delivered by the window runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CloseRequested,

    /// New inner size in physical pixels.
    Resized { width: u32, height: u32 },

    ScaleFactorChanged { scale: f64 },

    Focused(bool),

    Key {
        key: Key,
        /// Stable platform code for the physical key.
        scancode: u32,
        pressed: bool,
        repeat: bool,
        modifiers: Modifiers,
    },

    /// Committed text input (not IME composition updates).
    Text(String),

    /// Pointer position in physical pixels.
    PointerMoved { x: f64, y: f64 },

    PointerButton {
        button: PointerButton,
        pressed: bool,
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },

    /// Pointer left the window surface.
    PointerLeft,

    Scroll { dx: f32, dy: f32, modifiers: Modifiers },
}
