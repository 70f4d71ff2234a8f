//! Abstract event model.
//!
//! The runtime pumps platform window/input events into [`Event`]s; nothing
//! above the runtime sees a winit type. Translation state (modifier keys,
//! last pointer position) lives in [`EventTranslator`].

mod translate;
mod types;

pub use translate::{key_from_code, EventTranslator};
pub use types::{Event, Key, Modifiers, PointerButton};
