//! OpenGL context backends.
//!
//! A [`GlContext`] owns one driver-level GL context and walks a strict
//! lifecycle: acquired by a backend constructor, made current with
//! [`enter`](GlContext::enter), detached with [`exit`](GlContext::exit),
//! and destroyed exactly once with [`release`](GlContext::release). After
//! release every operation is a no-op that reports
//! [`ContextError::Released`]; a context is never half-alive, since a failed
//! constructor returns `Err` and drops whatever it had acquired.
//!
//! Backends:
//! - [`NativeContext`]: bound to a window surface (standalone or sharing
//!   object namespaces with a primary context).
//! - [`HeadlessContext`]: off-screen EGL device context, no window system.
//! - [`StubContext`]: inert placeholder for tests and driverless hosts.
//!
//! One context may be current per thread, enforced by the driver; instances
//! are not `Sync` and must be externally serialized.

mod error;
#[cfg(all(unix, not(target_os = "macos")))]
mod headless;
mod native;
mod stub;
mod symbols;

pub use error::ContextError;
#[cfg(all(unix, not(target_os = "macos")))]
pub use headless::HeadlessContext;
pub use native::NativeContext;
pub use stub::StubContext;
pub use symbols::{verify_symbols, SymbolRequirement, CORE_SYMBOLS};

use std::ffi::{c_void, CStr};

/// Context creation parameters shared by the backends.
#[derive(Debug, Clone)]
pub struct GlSettings {
    /// Requested core-profile GL version, `(major, minor)`.
    pub version: (u8, u8),
    /// Request a debug context from the driver.
    pub debug: bool,
    /// Synchronize presentation with the display (native surfaces only).
    pub vsync: bool,
    /// Compute device index (headless backend only).
    pub device_index: usize,
}

impl Default for GlSettings {
    fn default() -> Self {
        Self { version: (3, 3), debug: false, vsync: true, device_index: 0 }
    }
}

/// How a context relates to other contexts' object namespaces.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ContextMode {
    /// Owns its object namespace.
    Standalone,
    /// Shares buffers/textures/programs with the context it was split from.
    Shared,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BackendKind {
    Native,
    Headless,
    Stub,
}

/// The engine's GL context, polymorphic over acquisition backends.
///
/// The variants keep their backend-specific constructors and extras
/// (surface presentation, sharing); this enum carries the common
/// capability set.
pub enum GlContext {
    Native(NativeContext),
    #[cfg(all(unix, not(target_os = "macos")))]
    Headless(HeadlessContext),
    Stub(StubContext),
}

impl GlContext {
    pub fn kind(&self) -> BackendKind {
        match self {
            GlContext::Native(_) => BackendKind::Native,
            #[cfg(all(unix, not(target_os = "macos")))]
            GlContext::Headless(_) => BackendKind::Headless,
            GlContext::Stub(_) => BackendKind::Stub,
        }
    }

    /// Makes this context current on its own surface (none for headless).
    pub fn enter(&mut self) -> Result<(), ContextError> {
        match self {
            GlContext::Native(c) => c.enter(),
            #[cfg(all(unix, not(target_os = "macos")))]
            GlContext::Headless(c) => c.enter(),
            GlContext::Stub(c) => c.enter(),
        }
    }

    /// Makes no context current on this thread.
    pub fn exit(&mut self) -> Result<(), ContextError> {
        match self {
            GlContext::Native(c) => c.exit(),
            #[cfg(all(unix, not(target_os = "macos")))]
            GlContext::Headless(c) => c.exit(),
            GlContext::Stub(c) => c.exit(),
        }
    }

    /// Destroys the driver context. Idempotent; the display/device handle
    /// is left open (it lives for the process).
    pub fn release(&mut self) {
        match self {
            GlContext::Native(c) => c.release(),
            #[cfg(all(unix, not(target_os = "macos")))]
            GlContext::Headless(c) => c.release(),
            GlContext::Stub(c) => c.release(),
        }
    }

    /// True until [`release`](Self::release) is called.
    pub fn is_valid(&self) -> bool {
        match self {
            GlContext::Native(c) => c.is_valid(),
            #[cfg(all(unix, not(target_os = "macos")))]
            GlContext::Headless(c) => c.is_valid(),
            GlContext::Stub(c) => c.is_valid(),
        }
    }

    /// Resolves a GL entry point through the display's loader chain.
    ///
    /// Returns null for symbols the driver does not export; missing
    /// extensions are optional and the caller must tolerate null.
    pub fn load(&self, symbol: &CStr) -> *const c_void {
        match self {
            GlContext::Native(c) => c.load(symbol),
            #[cfg(all(unix, not(target_os = "macos")))]
            GlContext::Headless(c) => c.load(symbol),
            GlContext::Stub(c) => c.load(symbol),
        }
    }

    /// Presents the back buffer; a no-op for surfaceless backends.
    pub fn swap_buffers(&self) -> Result<(), ContextError> {
        match self {
            GlContext::Native(c) => c.swap_buffers(),
            #[cfg(all(unix, not(target_os = "macos")))]
            GlContext::Headless(_) => Ok(()),
            GlContext::Stub(_) => Ok(()),
        }
    }

    /// Propagates a window resize to the surface; no-op off-screen.
    pub fn resize(&self, width: u32, height: u32) {
        if let GlContext::Native(c) = self {
            c.resize(width, height);
        }
    }

    pub fn mode(&self) -> ContextMode {
        match self {
            GlContext::Native(c) => c.mode(),
            #[cfg(all(unix, not(target_os = "macos")))]
            GlContext::Headless(_) => ContextMode::Standalone,
            GlContext::Stub(_) => ContextMode::Standalone,
        }
    }
}
