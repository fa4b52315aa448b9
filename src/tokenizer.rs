//! Content-line tokenizer: splits one unfolded logical line into its
//! group, name, parameters and raw value.
//!
//! Deliberately hand-rolled rather than built on a lexer generator: the
//! property name set is open (any `X-` token must tokenize the same as a
//! known one), so a fixed-alternative lexer cannot express it.

use tracing::trace;

use crate::error::{ParseError, SourceLocation};
use crate::parameters::Parameters;

/// One tokenized content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// The `group.` prefix, if present, in its original casing.
    pub group: Option<String>,
    /// The property name, uppercased for dispatch.
    pub name: String,
    /// The property name exactly as it appeared in the source.
    pub original_name: String,
    /// The parsed parameters.
    pub params: Parameters,
    /// The value substring (after the separating `:`), not yet
    /// escape-decoded.
    pub raw_value: String,
}

/// Tokenize one unfolded logical line (never empty, never containing a
/// newline).
pub fn tokenize(line: &str, location_line: usize) -> Result<ContentLine, ParseError> {
    let colon_index = find_unquoted(line, ':')
        .ok_or_else(|| ParseError::MissingColon(SourceLocation::new(location_line, line)))?;
    let (head, value) = line.split_at(colon_index);
    let value = &value[1..];

    let segments = split_unquoted(head, ';');
    let mut segments = segments.into_iter();
    let name_segment = segments
        .next()
        .ok_or_else(|| ParseError::EmptyPropertyName(SourceLocation::new(location_line, line)))?;

    let (group, original_name) = match name_segment.split_once('.') {
        Some((g, n)) if !g.is_empty() => (Some(g.to_string()), n.to_string()),
        _ => (None, name_segment.to_string()),
    };
    if original_name.is_empty() {
        return Err(ParseError::EmptyPropertyName(SourceLocation::new(
            location_line,
            line,
        )));
    }
    let name = original_name.to_uppercase();

    let mut params = Parameters::new();
    for segment in segments {
        parse_parameter_segment(&segment, &mut params);
    }

    trace!(line = location_line, property = %name, "tokenized content line");

    Ok(ContentLine {
        group,
        name,
        original_name,
        params,
        raw_value: value.to_string(),
    })
}

fn parse_parameter_segment(segment: &str, params: &mut Parameters) {
    match segment.split_once('=') {
        Some((name, values)) => {
            for value in split_unquoted(values, ',') {
                params.insert(name, strip_quotes(&value));
            }
        }
        None => params.push_bare(segment),
    }
}

fn strip_quotes(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// The index of the first occurrence of `needle` not inside a `"…"`
/// quoted span.
fn find_unquoted(s: &str, needle: char) -> Option<usize> {
    let mut in_quotes = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c == needle && !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

/// Split `s` on every unquoted occurrence of `delim`, keeping quoted
/// spans intact (their quotes are stripped later by the caller as
/// appropriate).
fn split_unquoted(s: &str, delim: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in s.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            c if c == delim && !in_quotes => {
                parts.push(std::mem::take(&mut current));
            }
            c => current.push(c),
        }
    }
    parts.push(current);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_property() {
        let line = tokenize("FN:John Doe", 1).unwrap();
        assert_eq!(line.name, "FN");
        assert_eq!(line.raw_value, "John Doe");
        assert!(line.group.is_none());
    }

    #[test]
    fn grouped_property() {
        let line = tokenize("item1.TEL;TYPE=cell:+1-555-0100", 1).unwrap();
        assert_eq!(line.group.as_deref(), Some("item1"));
        assert_eq!(line.name, "TEL");
        assert_eq!(line.params.get("TYPE"), Some("cell"));
    }

    #[test]
    fn bare_v21_type_token() {
        let line = tokenize("TEL;WORK;VOICE:+1-555-0100", 1).unwrap();
        assert_eq!(line.params.bare_tokens(), &["WORK".to_string(), "VOICE".to_string()]);
    }

    #[test]
    fn quoted_parameter_value_with_colon() {
        let line = tokenize(r#"TEL;TYPE=work;LABEL="work: main office":+1-555-0100"#, 1).unwrap();
        assert_eq!(line.params.get("LABEL"), Some("work: main office"));
        assert_eq!(line.raw_value, "+1-555-0100");
    }

    #[test]
    fn multi_valued_parameter() {
        let line = tokenize("TEL;TYPE=work,voice:+1-555-0100", 1).unwrap();
        assert_eq!(line.params.get_all("TYPE"), &["work".to_string(), "voice".to_string()]);
    }

    #[test]
    fn extension_property_name_tokenizes_generically() {
        let line = tokenize("X-CUSTOM-FIELD:value", 1).unwrap();
        assert_eq!(line.name, "X-CUSTOM-FIELD");
    }

    #[test]
    fn missing_colon_errors() {
        assert!(matches!(tokenize("FN John Doe", 1), Err(ParseError::MissingColon(_))));
    }

    #[test]
    fn empty_name_errors() {
        assert!(matches!(tokenize(":value", 1), Err(ParseError::EmptyPropertyName(_))));
    }
}
