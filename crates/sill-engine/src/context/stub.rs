use std::ffi::{c_void, CStr};

use super::ContextError;

/// Inert context backend.
///
/// Tracks the lifecycle state machine faithfully but never touches a
/// driver; every symbol resolves to null. Useful on hosts without GL and
/// for exercising context-state handling in tests.
#[derive(Debug, Default)]
pub struct StubContext {
    current: bool,
    released: bool,
}

impl StubContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self) -> Result<(), ContextError> {
        if self.released {
            return Err(ContextError::Released);
        }
        self.current = true;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<(), ContextError> {
        if self.released {
            return Err(ContextError::Released);
        }
        self.current = false;
        Ok(())
    }

    pub fn release(&mut self) {
        self.current = false;
        self.released = true;
    }

    pub fn is_valid(&self) -> bool {
        !self.released
    }

    pub fn is_current(&self) -> bool {
        self.current
    }

    pub fn load(&self, _symbol: &CStr) -> *const c_void {
        std::ptr::null()
    }
}

#[cfg(test)]
mod tests {
    use crate::context::{BackendKind, ContextError, GlContext, StubContext};

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn fresh_context_is_valid_and_not_current() {
        let ctx = StubContext::new();
        assert!(ctx.is_valid());
        assert!(!ctx.is_current());
    }

    #[test]
    fn enter_and_exit_toggle_currency() {
        let mut ctx = StubContext::new();
        ctx.enter().unwrap();
        assert!(ctx.is_current());
        ctx.exit().unwrap();
        assert!(!ctx.is_current());
    }

    #[test]
    fn release_invalidates() {
        let mut ctx = StubContext::new();
        ctx.enter().unwrap();
        ctx.release();
        assert!(!ctx.is_valid());
        assert!(!ctx.is_current());
    }

    #[test]
    fn released_operations_are_refused_without_driver_calls() {
        let mut ctx = StubContext::new();
        ctx.release();
        assert!(matches!(ctx.enter(), Err(ContextError::Released)));
        assert!(matches!(ctx.exit(), Err(ContextError::Released)));
    }

    #[test]
    fn release_is_idempotent() {
        let mut ctx = StubContext::new();
        ctx.release();
        ctx.release();
        assert!(!ctx.is_valid());
    }

    // ── through the backend enum ──────────────────────────────────────────

    #[test]
    fn enum_dispatch_matches_backend() {
        let mut ctx = GlContext::Stub(StubContext::new());
        assert_eq!(ctx.kind(), BackendKind::Stub);
        ctx.enter().unwrap();
        assert!(ctx.swap_buffers().is_ok());
        ctx.resize(640, 480);
        ctx.release();
        assert!(!ctx.is_valid());
        assert!(matches!(ctx.enter(), Err(ContextError::Released)));
    }

    #[test]
    fn stub_resolves_nothing() {
        let ctx = GlContext::Stub(StubContext::new());
        assert!(ctx.load(c"glGetString").is_null());
    }
}
