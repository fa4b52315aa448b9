//! Value escaping (RFC 6350 §3.4) and Quoted-Printable (RFC 2045 §6.7),
//! the latter retained only for vCard 2.1 producers.

use crate::error::EncodingError;

/// Escape a scalar value for inclusion in vCard 3.0/4.0 text: backslash,
/// newline, comma and semicolon all become significant once embedded in
/// a content line.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            other => out.push(other),
        }
    }
    out
}

/// Unescape a value decoded from vCard 3.0/4.0 text. Unknown escapes
/// (`\x` for any `x` other than `n N , ; \`) are passed through literally
/// rather than rejected, per the lenient contract of the dispatcher.
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(',') => out.push(','),
            Some(';') => out.push(';'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Split `value` at every unescaped occurrence of `delim`, preserving
/// empty components (they carry positional meaning for `N` and `ADR`).
/// A `delim` preceded by an odd number of backslashes is not a split
/// point.
pub fn split_value(value: &str, delim: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            current.push(c);
            if let Some(next) = chars.next() {
                current.push(next);
            }
            continue;
        }
        if c == delim {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    parts.push(current);
    parts
}

/// Split on unescaped `delim`, then unescape each component.
pub fn split_value_unescaped(value: &str, delim: char) -> Vec<String> {
    split_value(value, delim)
        .into_iter()
        .map(|s| unescape(&s))
        .collect()
}

/// Join `values`, escaping each component first, with `delim` between
/// them. Inverse of [`split_value_unescaped`] modulo escape
/// normalization.
pub fn join_values(values: &[String], delim: char) -> String {
    values
        .iter()
        .map(|v| escape(v))
        .collect::<Vec<_>>()
        .join(&delim.to_string())
}

/// Decode a Quoted-Printable payload (RFC 2045 §6.7), as used by vCard
/// 2.1 properties with `ENCODING=QUOTED-PRINTABLE`.
///
/// `=XX` is a literal byte; `=` immediately followed by a line break is a
/// soft break and produces no output. The resulting bytes are interpreted
/// as UTF-8 when possible, falling back to Latin-1 (every byte maps to
/// the codepoint of the same value) since 2.1 producers frequently paired
/// Quoted-Printable with `CHARSET=ISO-8859-1` or left `CHARSET` unstated.
pub fn quoted_printable_decode(value: &str) -> Result<String, EncodingError> {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'=' => {
                if i + 1 < bytes.len() && bytes[i + 1] == b'\n' {
                    i += 2;
                } else if i + 2 < bytes.len()
                    && bytes[i + 1] == b'\r'
                    && bytes[i + 2] == b'\n'
                {
                    i += 3;
                } else if i + 1 < bytes.len() && bytes[i + 1] == b'\r' {
                    i += 2;
                } else if i + 2 < bytes.len() {
                    let hex = &value[i + 1..i + 3];
                    let byte = u8::from_str_radix(hex, 16).map_err(|_| {
                        EncodingError::QuotedPrintableInvalidHex(hex.to_string())
                    })?;
                    out.push(byte);
                    i += 3;
                } else {
                    return Err(EncodingError::QuotedPrintableInvalidHex(
                        value[i..].to_string(),
                    ));
                }
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }

    match String::from_utf8(out.clone()) {
        Ok(s) => Ok(s),
        Err(_) => Ok(out.into_iter().map(|b| b as char).collect()),
    }
}

/// Encode `value` as Quoted-Printable, inserting `=\r\n` soft breaks so
/// no physical line exceeds 76 octets.
pub fn quoted_printable_encode(value: &str) -> String {
    const LINE_LIMIT: usize = 76;
    let mut out = String::new();
    let mut col = 0;

    let mut push = |out: &mut String, col: &mut usize, s: &str| {
        if *col + s.len() > LINE_LIMIT {
            out.push_str("=\r\n");
            *col = 0;
        }
        out.push_str(s);
        *col += s.len();
    };

    for byte in value.bytes() {
        let printable = matches!(byte, 0x20..=0x7E if byte != b'=');
        if printable {
            push(&mut out, &mut col, &(byte as char).to_string());
        } else {
            push(&mut out, &mut col, &format!("={:02X}", byte));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_roundtrip() {
        for s in [
            "plain",
            "a,b;c\\d",
            "line1\nline2",
            "line1\r\nline2",
            "",
            "\\n literal backslash-n",
        ] {
            assert_eq!(unescape(&escape(s)), s.replace("\r\n", "\n"));
        }
    }

    #[test]
    fn unescape_unknown_sequence_is_literal() {
        assert_eq!(unescape("a\\xb"), "a\\xb");
    }

    #[test]
    fn split_value_preserves_empties() {
        assert_eq!(
            split_value("Doe;John;;;", ';'),
            vec!["Doe", "John", "", "", ""]
        );
    }

    #[test]
    fn split_value_respects_escaped_delimiter() {
        assert_eq!(split_value("a\\;b;c", ';'), vec!["a\\;b", "c"]);
        assert_eq!(split_value_unescaped("a\\;b;c", ';'), vec!["a;b", "c"]);
    }

    #[test]
    fn join_values_roundtrip() {
        let values = vec!["Doe".to_string(), "J,ohn".to_string(), "".to_string()];
        let joined = join_values(&values, ';');
        assert_eq!(split_value_unescaped(&joined, ';'), values);
    }

    #[test]
    fn qp_decode_soft_break() {
        assert_eq!(
            quoted_printable_decode("123 Main=0D=0ASt").unwrap(),
            "123 Main\r\nSt"
        );
        assert_eq!(quoted_printable_decode("abc=\r\ndef").unwrap(), "abcdef");
    }

    #[test]
    fn qp_roundtrip() {
        let value = "Hello=World, control chars \x07 too";
        let encoded = quoted_printable_encode(value);
        assert_eq!(quoted_printable_decode(&encoded).unwrap(), value);
    }

    #[test]
    fn qp_invalid_hex_is_error() {
        assert!(quoted_printable_decode("=ZZ").is_err());
    }
}
