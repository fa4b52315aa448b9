//! The `N` (structured name) property value.

use crate::escape::{escape, join_values, split_value, unescape};

/// The `N` property: either decomposed into its five RFC 6350 §6.2.2
/// components, or carried verbatim when the source producer emitted an
/// unstructured value (no `;` separators at all).
///
/// Exactly one shape is ever populated; this is naturally a sum type
/// rather than a struct with five nullable fields plus a flag, which
/// would let "both populated" or "neither populated" compile.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StructuredName {
    /// Decomposed into family/given/additional/prefixes/suffixes.
    Structured {
        /// Family name(s) (surname).
        family: Vec<String>,
        /// Given name(s) (forename).
        given: Vec<String>,
        /// Additional/middle name(s).
        additional: Vec<String>,
        /// Honorific prefixes (e.g. "Dr.").
        prefixes: Vec<String>,
        /// Honorific suffixes (e.g. "Jr.").
        suffixes: Vec<String>,
    },
    /// A single opaque string, used when the value had no `;`
    /// separators at all.
    Raw(String),
}

impl StructuredName {
    /// Parse an `N` value: 5 semicolon-separated components (each
    /// itself a comma-separated list), or [`StructuredName::Raw`] if the
    /// value contains no unescaped `;` at all.
    pub fn parse(value: &str) -> Self {
        // Split on unescaped `;` first, without unescaping, so a `\,`
        // inside a component is not confused with the `,` multi-value
        // separator split next; only the final leaves are unescaped.
        let components = split_value(value, ';');
        if components.len() <= 1 {
            return Self::Raw(value.to_string());
        }
        let mut components = components.into_iter();
        let mut next = |c: &mut std::vec::IntoIter<String>| -> Vec<String> {
            c.next()
                .map(|s| {
                    split_value(&s, ',')
                        .into_iter()
                        .map(|p| unescape(&p))
                        .filter(|p| !p.is_empty())
                        .collect()
                })
                .unwrap_or_default()
        };
        Self::Structured {
            family: next(&mut components),
            given: next(&mut components),
            additional: next(&mut components),
            prefixes: next(&mut components),
            suffixes: next(&mut components),
        }
    }

    /// `true` if this is the [`StructuredName::Raw`] shape.
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// `true` if this is the [`StructuredName::Structured`] shape.
    pub fn is_structured(&self) -> bool {
        !self.is_raw()
    }

    /// Best-effort structuring of a raw value: splits on whitespace,
    /// treating the last word as the family name and everything before
    /// it as given/additional names. Producers that need precise control
    /// should construct [`StructuredName::Structured`] directly.
    pub fn to_structured(&self) -> StructuredName {
        match self {
            Self::Structured { .. } => self.clone(),
            Self::Raw(raw) => {
                let words: Vec<&str> = raw.split_whitespace().collect();
                match words.split_last() {
                    Some((family, rest)) if !rest.is_empty() => Self::Structured {
                        family: vec![family.to_string()],
                        given: vec![rest[0].to_string()],
                        additional: rest[1..].iter().map(|s| s.to_string()).collect(),
                        prefixes: Vec::new(),
                        suffixes: Vec::new(),
                    },
                    Some((only, _)) => Self::Structured {
                        family: vec![only.to_string()],
                        given: Vec::new(),
                        additional: Vec::new(),
                        prefixes: Vec::new(),
                        suffixes: Vec::new(),
                    },
                    None => Self::Structured {
                        family: Vec::new(),
                        given: Vec::new(),
                        additional: Vec::new(),
                        prefixes: Vec::new(),
                        suffixes: Vec::new(),
                    },
                }
            }
        }
    }

    /// Render back to the `N` value text: the raw string when in raw
    /// shape, otherwise the five components joined by `;` with empty
    /// trailing components preserved (e.g. `Doe;John;;;`).
    pub fn to_value(&self) -> String {
        match self {
            Self::Raw(s) => escape(s),
            Self::Structured {
                family,
                given,
                additional,
                prefixes,
                suffixes,
            } => [family, given, additional, prefixes, suffixes]
                .iter()
                .map(|component| join_values(component, ','))
                .collect::<Vec<_>>()
                .join(";"),
        }
    }
}
