#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! Version-aware vCard codec: parses vCard 2.1/3.0/4.0 text, jCard JSON
//! and xCard XML into one uniform contact model, and serializes that
//! model back out to any of the three.
//!
//! ```
//! use vcard_codec::{Parser, Generator};
//!
//! let text = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\nEND:VCARD\r\n";
//! let card = Parser::new().parse_single(text).unwrap();
//! assert_eq!(card.formatted_name, "Jane Doe");
//!
//! let rendered = Generator::new().generate(&card).unwrap();
//! assert!(rendered.contains("FN:Jane Doe"));
//! ```
//!
//! Serde support for the in-memory model can be enabled with the
//! `serde` feature.

mod dispatcher;
mod error;
mod escape;
mod jcard;
mod line_framer;
mod model;
mod parameters;
mod text_emitter;
mod tokenizer;
mod version;
mod xcard;

pub use dispatcher::Parser;
pub use error::{EncodingError, FormatError, GenerateError, ParseError, SourceLocation};
pub use jcard::JCardFormatter;
pub use model::{
    Address, BinaryData, BinaryEntry, DateOrDateTime, Email, ExtendedProperty, Gender,
    GeoLocation, Impp, Kind, LanguagePref, Organization, RawProperty, Related, Sex,
    StructuredAddress, StructuredName, Telephone, UriEntry, Url, VCard,
};
pub use parameters::Parameters;
pub use text_emitter::Generator;
pub use version::Version;
pub use xcard::XCardFormatter;

pub use base64;
pub use language_tags;
pub use time;

/// Errors that can occur at any of the codec's fallible boundaries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failure while tokenizing or dispatching vCard text.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Failure while validating a [`VCard`] for output.
    #[error(transparent)]
    Generate(#[from] GenerateError),
    /// Failure while converting to or from jCard/xCard.
    #[error(transparent)]
    Format(#[from] FormatError),
    /// Failure while encoding or decoding a property value.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// Parse a vCard text stream into a collection of [`VCard`] values, using
/// [`Parser`]'s lenient defaults.
pub fn parse<S: AsRef<str>>(input: S) -> Result<Vec<VCard>, ParseError> {
    Parser::new().parse(input.as_ref())
}

/// Serialize every card in `cards` to vCard text.
pub fn generate(cards: &[VCard]) -> Result<String, GenerateError> {
    Generator::new().generate_all(cards)
}
