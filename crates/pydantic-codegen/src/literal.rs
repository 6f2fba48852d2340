//! Python literal rendering.

/// Render a double-quoted Python string, switching to single quotes when the
/// text contains `"` but no `'`.
///
/// # Examples
///
/// ```
/// use pydantic_codegen::literal::py_quote;
///
/// assert_eq!(py_quote("abc"), r#""abc""#);
/// assert_eq!(py_quote(r#"say "hi""#), r#"'say "hi"'"#);
/// assert_eq!(py_quote("line\nbreak"), r#""line\nbreak""#);
/// ```
pub fn py_quote(s: &str) -> String {
    if s.contains('"') && !s.contains('\'') {
        return format!("'{}'", escape(s, '\''));
    }
    format!("\"{}\"", escape(s, '"'))
}

/// Render a single-quoted Python string.
///
/// Used inside `Literal[...]` and `frozenset({...})`, which sit within a
/// double-quoted annotation.
pub fn py_quote_single(s: &str) -> String {
    format!("'{}'", escape(s, '\''))
}

/// Render a Python bytes literal.
pub fn py_bytes(bytes: &[u8]) -> String {
    let mut out = String::from("b\"");
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(char::from(b)),
            _ => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out.push('"');
    out
}

/// Render a Python boolean.
pub fn py_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Render a Python float literal.
///
/// Uses the shortest representation that round-trips, switching to exponent
/// form when the decimal exponent is below -4 or at least 6. The result always
/// reads as a float in Python (`1.0`, not `1`).
///
/// # Examples
///
/// ```
/// use pydantic_codegen::literal::py_float;
///
/// assert_eq!(py_float(1.0), "1.0");
/// assert_eq!(py_float(0.5), "0.5");
/// assert_eq!(py_float(1_000_000.0), "1e+06");
/// assert_eq!(py_float(0.00001), "1e-05");
/// assert_eq!(py_float(123456.0), "123456.0");
/// ```
pub fn py_float(value: f64) -> String {
    if value.is_nan() {
        return "float(\"nan\")".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 {
            "float(\"inf\")".to_string()
        } else {
            "float(\"-inf\")".to_string()
        };
    }

    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let rendered = if exponent < -4 || exponent >= 6 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
    } else {
        format!("{value}")
    };

    if rendered.contains('.') || rendered.contains('e') {
        rendered
    } else {
        format!("{rendered}.0")
    }
}

/// Render a single-precision value, widened to double first.
pub fn py_float32(value: f32) -> String {
    py_float(f64::from(value))
}

fn escape(s: &str, quote: char) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\u{0b}' => out.push_str("\\v"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let code = u32::from(c);
                if code < 0x80 {
                    out.push_str(&format!("\\x{code:02x}"));
                } else if code <= 0xffff {
                    out.push_str(&format!("\\u{code:04x}"));
                } else {
                    out.push_str(&format!("\\U{code:08x}"));
                }
            }
            c => out.push(c),
        }
    }
    out
}
