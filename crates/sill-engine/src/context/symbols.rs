use std::ffi::CStr;

use super::{ContextError, GlContext};

/// One row of the entry-point table: a symbol the render layer resolves,
/// and whether the layer can run without it.
pub struct SymbolRequirement {
    pub name: &'static CStr,
    pub required: bool,
}

const fn required(name: &'static CStr) -> SymbolRequirement {
    SymbolRequirement { name, required: true }
}

const fn optional(name: &'static CStr) -> SymbolRequirement {
    SymbolRequirement { name, required: false }
}

/// Entry points the render layer calls unconditionally.
///
/// Everything here is core since GL 3.3, so on a conforming driver the
/// whole table resolves; a null required entry means the context is not
/// the version/profile that was requested.
pub const CORE_SYMBOLS: &[SymbolRequirement] = &[
    required(c"glGetString"),
    required(c"glGetIntegerv"),
    required(c"glGetError"),
    required(c"glEnable"),
    required(c"glDisable"),
    required(c"glViewport"),
    required(c"glClearColor"),
    required(c"glClear"),
    // buffers
    required(c"glGenBuffers"),
    required(c"glBindBuffer"),
    required(c"glBufferData"),
    required(c"glBufferSubData"),
    required(c"glDeleteBuffers"),
    // vertex arrays
    required(c"glGenVertexArrays"),
    required(c"glBindVertexArray"),
    required(c"glDeleteVertexArrays"),
    required(c"glEnableVertexAttribArray"),
    required(c"glVertexAttribPointer"),
    required(c"glVertexAttribIPointer"),
    required(c"glVertexAttribDivisor"),
    // programs
    required(c"glCreateShader"),
    required(c"glShaderSource"),
    required(c"glCompileShader"),
    required(c"glGetShaderiv"),
    required(c"glGetShaderInfoLog"),
    required(c"glDeleteShader"),
    required(c"glCreateProgram"),
    required(c"glAttachShader"),
    required(c"glDetachShader"),
    required(c"glLinkProgram"),
    required(c"glGetProgramiv"),
    required(c"glGetProgramInfoLog"),
    required(c"glUseProgram"),
    required(c"glDeleteProgram"),
    required(c"glGetActiveAttrib"),
    required(c"glGetAttribLocation"),
    required(c"glBindFragDataLocation"),
    // draws
    required(c"glDrawArrays"),
    required(c"glDrawElements"),
    required(c"glDrawArraysInstanced"),
    required(c"glDrawElementsInstanced"),
    // debug output arrived in 4.3 / KHR_debug; fine to miss
    optional(c"glDebugMessageCallback"),
];

/// Resolves every entry in `table` in one pass.
///
/// The first missing required symbol aborts with
/// [`ContextError::MissingSymbol`]; missing optional symbols are only
/// noted at debug level. Resolved pointers are discarded; the GL dispatch
/// table is built separately, this pass exists to produce one precise
/// failure instead of a crash on first use.
pub fn verify_symbols(
    context: &GlContext,
    table: &[SymbolRequirement],
) -> Result<(), ContextError> {
    if !context.is_valid() {
        return Err(ContextError::Released);
    }

    for symbol in table {
        if !context.load(symbol.name).is_null() {
            continue;
        }
        let name = symbol.name.to_string_lossy().into_owned();
        if symbol.required {
            log::error!("required GL entry point {name:?} did not resolve");
            return Err(ContextError::MissingSymbol { name });
        }
        log::debug!("optional GL entry point {name:?} not present");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StubContext;

    fn stub() -> GlContext {
        GlContext::Stub(StubContext::new())
    }

    #[test]
    fn first_missing_required_symbol_is_reported() {
        // The stub resolves nothing, so verification stops on the first
        // required row.
        let err = verify_symbols(&stub(), CORE_SYMBOLS).unwrap_err();
        match err {
            ContextError::MissingSymbol { name } => assert_eq!(name, "glGetString"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn optional_symbols_do_not_fail_verification() {
        let table = [optional(c"glDebugMessageCallback"), optional(c"glNotAThing")];
        verify_symbols(&stub(), &table).unwrap();
    }

    #[test]
    fn released_context_fails_before_any_lookup() {
        let mut ctx = stub();
        ctx.release();
        assert!(matches!(
            verify_symbols(&ctx, CORE_SYMBOLS),
            Err(ContextError::Released)
        ));
    }

    #[test]
    fn empty_table_verifies_trivially() {
        verify_symbols(&stub(), &[]).unwrap();
    }
}
