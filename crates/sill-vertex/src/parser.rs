use crate::error::FormatError;
use crate::format::{type_code, AttributeFormat};

/// Parses a format descriptor into attribute slots.
///
/// The descriptor is a space-separated token list, e.g. `"3f 4nu1 2f/i"`.
/// An empty descriptor yields an empty layout.
pub fn parse(descriptor: &str) -> Result<Vec<AttributeFormat>, FormatError> {
    if descriptor.is_empty() {
        return Ok(Vec::new());
    }
    descriptor.split(' ').map(parse_token).collect()
}

fn parse_token(token: &str) -> Result<AttributeFormat, FormatError> {
    if token.is_empty() {
        return Err(FormatError::new(token, "empty token (check for doubled spaces)"));
    }

    // Optional divisor suffix after `/`. Of the accepted codes only `i`
    // (per-instance) changes fetch behavior; `v` and `r` are reserved.
    let (body, divisor) = match token.split_once('/') {
        Some((body, divisor)) => (body, Some(divisor)),
        None => (token, None),
    };
    let per_instance = match divisor {
        None | Some("v") | Some("r") => false,
        Some("i") => true,
        Some(other) => {
            return Err(FormatError::new(token, format!("unknown divisor code {other:?}")));
        }
    };

    // Leading decimal integer is the component count, defaulting to 1.
    let code_start = body
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(body.len());
    let (count, code) = body.split_at(code_start);

    let components = if count.is_empty() {
        1
    } else {
        count
            .parse::<u32>()
            .map_err(|_| FormatError::new(token, format!("bad component count {count:?}")))?
    };
    if components == 0 {
        return Err(FormatError::new(token, "component count must be at least 1"));
    }
    if code.is_empty() {
        return Err(FormatError::new(token, "missing type code"));
    }

    let (base, bytes_per_component, normalized) = type_code(code)
        .ok_or_else(|| FormatError::new(token, format!("unknown type code {code:?}")))?;

    Ok(AttributeFormat {
        token: token.to_string(),
        components,
        bytes_per_component,
        normalized,
        per_instance,
        base,
    })
}
