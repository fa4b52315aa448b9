//! The `ORG` (organization) property value.

use crate::escape::{escape, join_values, split_value, unescape};

/// The `ORG` property: either a name plus organizational units, or
/// carried verbatim when the source had no `;` separators.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Organization {
    /// Decomposed into the organization name and its unit hierarchy.
    Structured {
        /// Organization name.
        name: String,
        /// Organizational unit names, outermost first.
        units: Vec<String>,
    },
    /// A single opaque string, used when the value had no `;`
    /// separators at all.
    Raw(String),
}

impl Organization {
    /// Parse an `ORG` value: the first `;`-separated component is the
    /// name, the rest are units.
    pub fn parse(value: &str) -> Self {
        let components = split_value(value, ';');
        if components.len() <= 1 {
            return Self::Raw(value.to_string());
        }
        let mut components = components.into_iter();
        let name = components.next().map(|s| unescape(&s)).unwrap_or_default();
        let units = components.map(|s| unescape(&s)).collect();
        Self::Structured { name, units }
    }

    /// `true` if this is the [`Organization::Raw`] shape.
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// `true` if this is the [`Organization::Structured`] shape.
    pub fn is_structured(&self) -> bool {
        !self.is_raw()
    }

    /// Render back to the `ORG` value text.
    pub fn to_value(&self) -> String {
        match self {
            Self::Raw(s) => escape(s),
            Self::Structured { name, units } => {
                let mut all = vec![name.clone()];
                all.extend(units.iter().cloned());
                join_values(&all, ';')
            }
        }
    }
}
