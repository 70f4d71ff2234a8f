/// Removes `//` and `/* */` comments.
///
/// Newlines inside block comments are kept so line numbers in driver
/// compile logs still point at the right source lines; a block comment is
/// otherwise replaced by a single space to avoid gluing tokens together.
pub fn strip_comments(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '/' if chars.peek() == Some(&'/') => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                for ch in chars.by_ref() {
                    if prev == '*' && ch == '/' {
                        break;
                    }
                    if ch == '\n' {
                        out.push('\n');
                    }
                    prev = ch;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

/// Inserts `#define` lines for each `(name, value)` pair.
///
/// Definitions go immediately after a leading `#version` directive (which
/// must stay first in GLSL), or at the top when there is none, followed by
/// a `#line` directive restoring the original numbering. An empty value
/// emits a bare `#define NAME`.
pub fn inject_defines(src: &str, defines: &[(&str, &str)]) -> String {
    if defines.is_empty() {
        return src.to_string();
    }

    let version_line = src
        .lines()
        .position(|line| line.trim_start().starts_with("#version"));
    let insert_at = version_line.map(|i| i + 1).unwrap_or(0);

    let mut out = String::with_capacity(src.len() + defines.len() * 32);
    let mut emitted = false;

    let mut emit_block = |out: &mut String| {
        for (name, value) in defines {
            if value.is_empty() {
                out.push_str(&format!("#define {name}\n"));
            } else {
                out.push_str(&format!("#define {name} {value}\n"));
            }
        }
        out.push_str(&format!("#line {}\n", insert_at + 1));
    };

    for (i, line) in src.lines().enumerate() {
        if i == insert_at {
            emit_block(&mut out);
            emitted = true;
        }
        out.push_str(line);
        out.push('\n');
    }
    if !emitted {
        // #version was the last (or only) line.
        emit_block(&mut out);
    }
    out
}

/// Names of global-scope `out` declarations, in declaration order.
///
/// Used to bind fragment shader outputs to color locations before linking.
/// Function bodies and block contents are skipped by brace tracking, so
/// locals and nested declarations never match; `layout(...)`,
/// interpolation and precision qualifiers are tolerated, and an array
/// suffix is dropped from the reported name.
pub fn interface_outputs(src: &str) -> Vec<String> {
    let src = strip_comments(&src.replace('\r', ""));
    let mut outputs = Vec::new();
    let mut depth: u32 = 0;
    let mut statement = String::new();

    for ch in src.chars() {
        match ch {
            '{' => {
                depth += 1;
                statement.clear();
            }
            '}' => {
                depth = depth.saturating_sub(1);
                statement.clear();
            }
            ';' if depth == 0 => {
                if let Some(name) = output_name(&statement) {
                    outputs.push(name);
                }
                statement.clear();
            }
            '\n' if depth == 0 => {
                // Preprocessor directives are line-scoped, not
                // semicolon-terminated; drop them at end of line.
                if statement.trim_start().starts_with('#') {
                    statement.clear();
                } else {
                    statement.push(' ');
                }
            }
            _ if depth == 0 => statement.push(ch),
            _ => {}
        }
    }
    outputs
}

fn output_name(statement: &str) -> Option<String> {
    let mut s = statement.trim();

    if let Some(rest) = s.strip_prefix("layout") {
        let rest = rest.trim_start();
        let close = rest.find(')')?;
        s = rest[close + 1..].trim_start();
    }

    let mut words = s.split_whitespace().peekable();
    while matches!(
        words.peek(),
        Some(&"flat" | &"smooth" | &"noperspective" | &"centroid" | &"invariant")
    ) {
        words.next();
    }
    if words.next()? != "out" {
        return None;
    }

    // Whatever qualifiers and type words remain, the declared name is last.
    let name = words.last()?;
    let name = name.split('[').next().unwrap_or(name);
    if name.is_empty() { None } else { Some(name.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── strip_comments ────────────────────────────────────────────────────

    #[test]
    fn line_comments_go_newlines_stay() {
        let out = strip_comments("a // gone\nb");
        assert_eq!(out, "a \nb");
    }

    #[test]
    fn block_comment_collapses_to_space() {
        assert_eq!(strip_comments("a/*x*/b"), "a b");
    }

    #[test]
    fn block_comment_preserves_line_count() {
        let src = "a/* one\n two\n three */b";
        let out = strip_comments(src);
        assert_eq!(out.matches('\n').count(), src.matches('\n').count());
        assert!(out.ends_with("b"));
    }

    #[test]
    fn division_is_not_a_comment() {
        assert_eq!(strip_comments("x = a / b;"), "x = a / b;");
    }

    #[test]
    fn unterminated_block_comment_stops_at_eof() {
        assert_eq!(strip_comments("a/* trailing"), "a ");
    }

    // ── inject_defines ────────────────────────────────────────────────────

    #[test]
    fn no_defines_is_identity() {
        let src = "#version 330 core\nvoid main() {}\n";
        assert_eq!(inject_defines(src, &[]), src);
    }

    #[test]
    fn defines_go_after_version() {
        let src = "#version 330 core\nvoid main() {}";
        let out = inject_defines(src, &[("A", "1"), ("B", "")]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "#version 330 core");
        assert_eq!(lines[1], "#define A 1");
        assert_eq!(lines[2], "#define B");
        assert_eq!(lines[3], "#line 2");
        assert_eq!(lines[4], "void main() {}");
    }

    #[test]
    fn defines_go_on_top_without_version() {
        let out = inject_defines("void main() {}", &[("A", "1")]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "#define A 1");
        assert_eq!(lines[1], "#line 1");
        assert_eq!(lines[2], "void main() {}");
    }

    #[test]
    fn version_as_only_line_still_gets_defines() {
        let out = inject_defines("#version 330 core", &[("A", "1")]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "#version 330 core");
        assert_eq!(lines[1], "#define A 1");
    }

    // ── interface_outputs ─────────────────────────────────────────────────

    #[test]
    fn plain_output() {
        assert_eq!(interface_outputs("out vec4 frag_color;"), vec!["frag_color"]);
    }

    #[test]
    fn declaration_order_is_kept() {
        let src = "out vec4 color;\nout float depth_hint;\n";
        assert_eq!(interface_outputs(src), vec!["color", "depth_hint"]);
    }

    #[test]
    fn qualifiers_are_tolerated() {
        let src = "layout(location = 1) out vec4 bloom;\nflat out highp vec4 pick_id;";
        assert_eq!(interface_outputs(src), vec!["bloom", "pick_id"]);
    }

    #[test]
    fn array_suffix_is_dropped() {
        assert_eq!(interface_outputs("out vec4 cascades[4];"), vec!["cascades"]);
    }

    #[test]
    fn locals_and_other_storage_do_not_match() {
        let src = "\
#version 330 core
uniform vec4 tint;
in vec4 v_color;
out vec4 frag_color;
void main() {
    vec4 out_tmp = v_color * tint;
    frag_color = out_tmp;
}
";
        assert_eq!(interface_outputs(src), vec!["frag_color"]);
    }

    #[test]
    fn commented_out_declarations_do_not_match() {
        let src = "// out vec4 old_color;\n/* out vec4 older; */\nout vec4 current;";
        assert_eq!(interface_outputs(src), vec!["current"]);
    }
}
