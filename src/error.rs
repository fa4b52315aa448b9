//! Error taxonomy for the vCard codec.
//!
//! One enum per fallible boundary rather than a single crate-wide error:
//! textual parsing, textual generation, and jCard/xCard format conversion
//! each fail in shape-specific ways and callers generally only handle one
//! boundary at a time.

use thiserror::Error;

/// Where in the source text a [`ParseError`] occurred.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 1-based physical line number.
    pub line: usize,
    /// A short excerpt of the offending line, for diagnostics.
    pub snippet: String,
}

impl SourceLocation {
    pub(crate) fn new(line: usize, snippet: impl Into<String>) -> Self {
        let mut snippet = snippet.into();
        if snippet.len() > 120 {
            snippet.truncate(120);
            snippet.push('\u{2026}');
        }
        Self { line, snippet }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.snippet)
    }
}

/// Errors produced while parsing vCard text.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input contained no content at all.
    #[error("input is empty")]
    EmptyInput,

    /// A content line had no unquoted `:` separator.
    #[error("missing colon in content line ({0})")]
    MissingColon(SourceLocation),

    /// A content line's property name was empty (e.g. a bare `:value`).
    #[error("empty property name ({0})")]
    EmptyPropertyName(SourceLocation),

    /// A binary property's value was not valid base64 (strict mode only;
    /// lenient mode recovers by storing the value as a URI).
    #[error("malformed base64 in property value ({0})")]
    MalformedBase64(SourceLocation),

    /// A `BEGIN:VCARD` was never matched by an `END:VCARD` (strict mode
    /// only; lenient mode emits the partial vCard).
    #[error("missing END:VCARD ({0})")]
    MissingEnd(SourceLocation),

    /// The `VERSION` property held a value that is not 2.1, 3.0 or 4.0
    /// (strict mode only).
    #[error("unknown VERSION {0:?} ({1})")]
    UnknownVersion(String, SourceLocation),

    /// `parse_single` was called but the input held zero or more than
    /// one vCard.
    #[error("expected exactly one vCard, found {0}")]
    NotSingleVcard(usize),
}

/// Errors produced while generating vCard text.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The vCard's formatted name (`FN`) is empty; `FN` is mandatory
    /// on every serialized vCard.
    #[error("formatted name (FN) is required")]
    FnRequired,

    /// A `MEMBER` property is present but `KIND` is not `group`.
    #[error("MEMBER requires KIND=group")]
    MemberRequiresGroupKind,
}

/// Errors produced while converting to or from jCard/xCard.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The top-level JSON/XML value was not a vCard object/array.
    #[error("value is not a vcard")]
    NotVCard,

    /// A vCard was missing its mandatory property array/children.
    #[error("vcard is missing its properties")]
    MissingProperties,

    /// A property entry was not shaped like `[name, params, type, value]`.
    #[error("malformed jCard property array: {0}")]
    InvalidArray(String),

    /// XML content could not be parsed at all.
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    /// JSON content could not be parsed at all.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A property value failed to decode (wraps the lower-level codec
    /// error for the embedded text/uri/date value).
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// A malformed URI value.
    #[error(transparent)]
    Uri(#[from] uriparse::URIError),

    /// Emitting required a valid vCard but validation failed.
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// Errors produced by the escape/Quoted-Printable codec and other
/// scalar value decoders (dates, URIs, base64).
#[derive(Debug, Error)]
pub enum EncodingError {
    /// A `=XX` Quoted-Printable escape held a non-hex digit pair.
    #[error("invalid quoted-printable hex escape {0:?}")]
    QuotedPrintableInvalidHex(String),

    /// A base64 payload failed to decode.
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),

    /// A date/time/timestamp value did not match any accepted pattern.
    #[error("invalid date or time value {0:?}")]
    InvalidDateTime(String),

    /// A URI value failed to parse.
    #[error(transparent)]
    Uri(#[from] uriparse::URIError),

    /// A language tag failed to parse.
    #[error(transparent)]
    LanguageTag(#[from] language_tags::ParseError),

    /// A MIME media type failed to parse.
    #[error("invalid media type {0:?}")]
    InvalidMediaType(String),
}
