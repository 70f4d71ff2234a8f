//! Render-graph layer.
//!
//! Sits on top of a live [`GlContext`](crate::context::GlContext): typed
//! buffer creation, shader programs with reflected vertex inputs, and
//! [`VertexSource`], the named description that lazily instantiates one
//! GPU vertex-array object per program and caches it.
//!
//! Everything here runs on the thread that owns the current context and
//! performs no synchronization of its own.

mod binding;
mod buffer;
mod error;
mod program;
mod vertex_source;

pub use binding::{BufferBinding, LayoutSlot, VertexArrayObject};
pub use buffer::BufferUsage;
pub use error::{BindingError, ShaderError};
pub use program::{Program, ProgramId};
pub use vertex_source::{
    BufferDescriptor, IndexBinding, IndexElement, PrimitiveMode, VertexSource,
};

use std::cell::Cell;

use glow::HasContext;

use crate::context::{verify_symbols, ContextError, GlContext, CORE_SYMBOLS};

/// Vendor/renderer/version strings reported by the driver.
#[derive(Debug, Clone)]
pub struct DriverInfo {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
}

/// GPU object factory and draw-call issuer for one GL context.
///
/// Owns the GL dispatch table resolved from the context's loader and the
/// counter that mints [`ProgramId`]s. One `Gfx` per context; it must only
/// be used while that context is current.
pub struct Gfx {
    gl: glow::Context,
    next_program: Cell<u64>,
}

impl Gfx {
    /// Builds the GL dispatch table over a valid context.
    ///
    /// The core entry-point table is verified first so a wrong
    /// version/profile surfaces as one precise [`ContextError`] here
    /// instead of a crash at first use.
    pub fn new(context: &GlContext) -> Result<Self, ContextError> {
        verify_symbols(context, CORE_SYMBOLS)?;
        let gl = unsafe { glow::Context::from_loader_function_cstr(|s| context.load(s)) };
        Ok(Self { gl, next_program: Cell::new(1) })
    }

    /// Raw GL access for callers that outgrow this layer.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    pub fn driver_info(&self) -> DriverInfo {
        unsafe {
            DriverInfo {
                vendor: self.gl.get_parameter_string(glow::VENDOR),
                renderer: self.gl.get_parameter_string(glow::RENDERER),
                version: self.gl.get_parameter_string(glow::VERSION),
            }
        }
    }

    pub fn viewport(&self, width: u32, height: u32) {
        unsafe {
            self.gl.viewport(0, 0, width as i32, height as i32);
        }
    }

    pub fn clear(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    pub(crate) fn next_program_id(&self) -> ProgramId {
        let id = self.next_program.get();
        self.next_program.set(id + 1);
        ProgramId::new(id)
    }
}
