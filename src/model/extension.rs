//! Extension (`X-`) and raw fidelity-buffer property records.

use crate::parameters::Parameters;

/// An unrecognized `X-`-prefixed property, preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtendedProperty {
    /// The property name, in its original casing (including the `X-` or
    /// vendor-extension prefix).
    pub name: String,
    /// The property's parameters.
    pub params: Parameters,
    /// The raw (unescaped-per-format, but not value-decoded) value text.
    pub value: String,
}

/// A single entry in the optional raw fidelity buffer: every property as
/// parsed, before any per-property interpretation. Populated only when
/// the parser's `preserve_raw` option is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawProperty {
    /// The property's group label (`group.NAME:value`), if any.
    pub group: Option<String>,
    /// The property name, in its original casing.
    pub name: String,
    /// The property's parameters.
    pub params: Parameters,
    /// The raw value text.
    pub value: String,
}
