use std::fmt;

/// Scalar class of a vertex attribute, before component count is applied.
///
/// `Padding` entries consume stride space but never bind to a shader input;
/// they are written as the `x` type code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BaseType {
    Float,
    Int,
    UInt,
    Padding,
}

/// One attribute slot parsed from a format descriptor token.
///
/// A token such as `3f/i` carries a component count (`3`), a type code (`f`,
/// 4-byte float) and an optional divisor suffix (`/i`, advance per instance
/// rather than per vertex).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AttributeFormat {
    /// The token this entry was parsed from, verbatim (e.g. `"3f/i"`).
    pub token: String,
    /// Number of components; always ≥ 1.
    pub components: u32,
    /// Bytes per component: 1, 2, 4 or 8.
    pub bytes_per_component: u32,
    /// Whether integer data is normalized to [0, 1] / [-1, 1] on fetch.
    pub normalized: bool,
    /// Whether the slot advances once per instance instead of per vertex.
    pub per_instance: bool,
    pub base: BaseType,
}

impl AttributeFormat {
    /// Total byte footprint of this slot within the vertex stride.
    pub fn byte_len(&self) -> u32 {
        self.components * self.bytes_per_component
    }

    /// True for `x` padding slots, which carry no attribute name.
    pub fn is_padding(&self) -> bool {
        self.base == BaseType::Padding
    }

    /// Builds a padding slot covering `bytes` bytes of stride space.
    ///
    /// This is the entry layout reconciliation emits for attributes a
    /// particular shader program does not consume.
    pub fn padding(bytes: u32) -> Self {
        debug_assert!(bytes >= 1);
        Self {
            token: format!("{bytes}x"),
            components: bytes,
            bytes_per_component: 1,
            normalized: false,
            per_instance: false,
            base: BaseType::Padding,
        }
    }
}

impl fmt::Display for AttributeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

/// Vertex stride implied by a slot sequence, in bytes.
pub fn stride(formats: &[AttributeFormat]) -> u32 {
    formats.iter().map(AttributeFormat::byte_len).sum()
}

/// Maps a type code to `(base, bytes_per_component, normalized)`.
///
/// Bare `f`/`u`/`i` (and their `n`-prefixed forms) default to 4-byte
/// elements; a digit suffix selects the element width. Only the float class
/// supports 8-byte elements.
pub(crate) fn type_code(code: &str) -> Option<(BaseType, u32, bool)> {
    let entry = match code {
        "f" | "f4" => (BaseType::Float, 4, false),
        "f1" => (BaseType::Float, 1, false),
        "f2" => (BaseType::Float, 2, false),
        "f8" => (BaseType::Float, 8, false),

        "u" | "u4" => (BaseType::UInt, 4, false),
        "u1" => (BaseType::UInt, 1, false),
        "u2" => (BaseType::UInt, 2, false),

        "i" | "i4" => (BaseType::Int, 4, false),
        "i1" => (BaseType::Int, 1, false),
        "i2" => (BaseType::Int, 2, false),

        "nf" | "nf4" => (BaseType::Float, 4, true),
        "nf1" => (BaseType::Float, 1, true),
        "nf2" => (BaseType::Float, 2, true),

        "nu" | "nu4" => (BaseType::UInt, 4, true),
        "nu1" => (BaseType::UInt, 1, true),
        "nu2" => (BaseType::UInt, 2, true),

        "ni" | "ni4" => (BaseType::Int, 4, true),
        "ni1" => (BaseType::Int, 1, true),
        "ni2" => (BaseType::Int, 2, true),

        // Skip/padding: one byte per "component", never bound to a name.
        "x" => (BaseType::Padding, 1, false),

        _ => return None,
    };
    Some(entry)
}
