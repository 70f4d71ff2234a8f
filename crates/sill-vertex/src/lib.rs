//! Vertex-format mini-language for the sill engine.
//!
//! A layout descriptor is a space-separated list of tokens, one per
//! attribute slot: `[count] typecode [/divisor]`.
//!
//! - `count`: component count, default 1 (`3f` is a vec3 of floats).
//! - `typecode`: scalar class and element width, `f`/`u`/`i` with an
//!   optional width suffix (`f2` = 2-byte float, `u1` = unsigned byte); an
//!   `n` prefix marks integer data as normalized (`4nu1` = RGBA8 color);
//!   `x` reserves padding bytes that bind to nothing.
//! - `/i`: the slot advances once per instance instead of per vertex.
//!
//! ```
//! use sill_vertex::parse;
//!
//! let layout = parse("3f 2f 1f 3f/i").unwrap();
//! assert_eq!(layout.len(), 4);
//! assert_eq!(layout[0].components, 3);
//! assert_eq!(layout[3].per_instance, true);
//! ```

pub mod error;
pub mod format;
pub mod parser;

pub use error::FormatError;
pub use format::{stride, AttributeFormat, BaseType};
pub use parser::parse;

#[cfg(test)]
mod parse_tests {
    use super::*;

    fn one(src: &str) -> AttributeFormat {
        let mut v = parse(src).unwrap();
        assert_eq!(v.len(), 1, "expected a single token in {src:?}");
        v.pop().unwrap()
    }

    // ── token grammar ─────────────────────────────────────────────────────

    #[test]
    fn float_sequence_with_instanced_tail() {
        let v = parse("3f 2f 1f 3f/i").unwrap();
        assert_eq!(v.len(), 4);

        assert_eq!(v[0].token, "3f");
        assert_eq!(v[0].components, 3);
        assert_eq!(v[0].bytes_per_component, 4);
        assert!(!v[0].per_instance);

        assert_eq!(v[1].token, "2f");
        assert_eq!(v[1].components, 2);
        assert_eq!(v[1].bytes_per_component, 4);
        assert!(!v[1].per_instance);

        assert_eq!(v[2].token, "1f");
        assert_eq!(v[2].components, 1);
        assert_eq!(v[2].bytes_per_component, 4);
        assert!(!v[2].per_instance);

        assert_eq!(v[3].token, "3f/i");
        assert_eq!(v[3].components, 3);
        assert_eq!(v[3].bytes_per_component, 4);
        assert!(v[3].per_instance);
    }

    #[test]
    fn empty_descriptor_is_empty_layout() {
        assert_eq!(parse(""), Ok(Vec::new()));
    }

    #[test]
    fn count_defaults_to_one() {
        let f = one("f");
        assert_eq!((f.components, f.bytes_per_component), (1, 4));
    }

    #[test]
    fn width_suffixes() {
        assert_eq!(one("f2").bytes_per_component, 2);
        assert_eq!(one("f8").bytes_per_component, 8);
        assert_eq!(one("u1").bytes_per_component, 1);
        assert_eq!(one("i2").bytes_per_component, 2);
        // `f4` is the explicit spelling of bare `f`.
        let (bare, wide) = (one("f"), one("f4"));
        assert_eq!(bare.bytes_per_component, wide.bytes_per_component);
        assert_eq!(bare.base, wide.base);
    }

    #[test]
    fn normalized_color_token() {
        let c = one("4nu1");
        assert_eq!(c.components, 4);
        assert_eq!(c.bytes_per_component, 1);
        assert!(c.normalized);
        assert_eq!(c.base, BaseType::UInt);
    }

    #[test]
    fn integer_tokens_are_not_normalized() {
        assert!(!one("3i").normalized);
        assert!(!one("2u4").normalized);
    }

    #[test]
    fn padding_token() {
        let p = one("12x");
        assert!(p.is_padding());
        assert_eq!(p.byte_len(), 12);
    }

    #[test]
    fn padding_constructor_round_trips() {
        assert_eq!(AttributeFormat::padding(16), one("16x"));
    }

    // ── divisors ──────────────────────────────────────────────────────────

    #[test]
    fn reserved_divisors_are_per_vertex() {
        assert!(!one("3f/v").per_instance);
        assert!(!one("3f/r").per_instance);
    }

    #[test]
    fn unknown_divisor_fails() {
        parse("3f/q").unwrap_err();
        parse("3f/").unwrap_err();
    }

    // ── malformed tokens ──────────────────────────────────────────────────

    #[test]
    fn unknown_type_code_fails() {
        let err = parse("7q").unwrap_err();
        assert_eq!(err.token, "7q");
    }

    #[test]
    fn purely_numeric_token_fails() {
        parse("3").unwrap_err();
    }

    #[test]
    fn zero_count_fails() {
        parse("0f").unwrap_err();
    }

    #[test]
    fn doubled_space_fails() {
        parse("3f  2f").unwrap_err();
    }

    #[test]
    fn mixed_valid_and_invalid_fails() {
        parse("3f 2f 1z").unwrap_err();
    }

    // ── stride ────────────────────────────────────────────────────────────

    #[test]
    fn stride_sums_slot_footprints() {
        let v = parse("3f 4nu1 2f2 8x").unwrap();
        assert_eq!(stride(&v), 12 + 4 + 4 + 8);
    }

    #[test]
    fn stride_matches_byte_len_sum() {
        let v = parse("3f 2f 1f 3f/i").unwrap();
        let total: u32 = v.iter().map(AttributeFormat::byte_len).sum();
        assert_eq!(stride(&v), total);
        assert_eq!(total, 36);
    }
}
