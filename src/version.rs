//! The vCard version a card was parsed from or should be generated for.

use std::fmt;

/// vCard version, as conveyed by the `VERSION` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Version {
    /// vCard 2.1 (no RFC; bare type parameters, Quoted-Printable).
    V21,
    /// vCard 3.0 (RFC 2426).
    V30,
    /// vCard 4.0 (RFC 6350). The default.
    #[default]
    V40,
}

impl Version {
    /// The literal text that follows `VERSION:` for this version.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V21 => "2.1",
            Self::V30 => "3.0",
            Self::V40 => "4.0",
        }
    }

    /// Parse the text that follows `VERSION:`, tolerating surrounding
    /// whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "2.1" => Some(Self::V21),
            "3.0" => Some(Self::V30),
            "4.0" => Some(Self::V40),
            _ => None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
