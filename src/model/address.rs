//! The `ADR` (delivery address) property value.

use crate::escape::{escape, join_values, split_value, unescape};
use crate::parameters::Parameters;

/// The `ADR` property: either decomposed into its seven RFC 6350
/// §6.3.1 components, or carried verbatim when the source had no `;`
/// separators.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StructuredAddress {
    /// Decomposed components, in RFC order.
    Structured {
        /// Post office box.
        po_box: Vec<String>,
        /// Extended address (apartment/suite).
        extended: Vec<String>,
        /// Street address.
        street: Vec<String>,
        /// City/locality.
        city: Vec<String>,
        /// State/region.
        region: Vec<String>,
        /// Postal/zip code.
        postal_code: Vec<String>,
        /// Country.
        country: Vec<String>,
    },
    /// A single opaque string, used when the value had no `;`
    /// separators at all.
    Raw(String),
}

impl StructuredAddress {
    /// Parse an `ADR` value.
    pub fn parse(value: &str) -> Self {
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
            po_box: next(&mut components),
            extended: next(&mut components),
            street: next(&mut components),
            city: next(&mut components),
            region: next(&mut components),
            postal_code: next(&mut components),
            country: next(&mut components),
        }
    }

    /// `true` if this is the [`StructuredAddress::Raw`] shape.
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// `true` if this is the [`StructuredAddress::Structured`] shape.
    pub fn is_structured(&self) -> bool {
        !self.is_raw()
    }

    /// Render back to the `ADR` value text.
    pub fn to_value(&self) -> String {
        match self {
            Self::Raw(s) => escape(s),
            Self::Structured {
                po_box,
                extended,
                street,
                city,
                region,
                postal_code,
                country,
            } => [po_box, extended, street, city, region, postal_code, country]
                .iter()
                .map(|component| join_values(component, ','))
                .collect::<Vec<_>>()
                .join(";"),
        }
    }
}

/// A single `ADR` entry: the address value plus its parameters
/// (type tokens, PREF, and the `GEO=`/`TZ=` child parameters carried on
/// vCard 4.0 addresses).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Address {
    /// The address value.
    pub value: StructuredAddress,
    /// Type tokens (e.g. `work`, `home`).
    pub types: Vec<String>,
    /// The `PREF=` preference order, if set.
    pub pref: Option<u8>,
    /// The `GEO=` parameter (vCard 4.0), a `geo:` URI string.
    pub geo: Option<String>,
    /// The `TZ=` parameter (vCard 4.0).
    pub tz: Option<String>,
    /// The `LABEL=` parameter (vCard 3.0) or a lifted `LABEL` property.
    pub label: Option<String>,
}

impl Address {
    /// Build an `Address` from a parsed value and its parameters.
    pub fn from_parts(value: StructuredAddress, params: &Parameters) -> Self {
        Self {
            value,
            types: params.type_values(),
            pref: params.pref(),
            geo: params.geo().map(str::to_string),
            tz: params.tz().map(str::to_string),
            label: params.label().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_seven_components() {
        let value = StructuredAddress::parse(";;123 Main St;Anytown;CA;12345;USA");
        if let StructuredAddress::Structured {
            street,
            city,
            region,
            postal_code,
            country,
            ..
        } = &value
        {
            assert_eq!(street, &vec!["123 Main St".to_string()]);
            assert_eq!(city, &vec!["Anytown".to_string()]);
            assert_eq!(region, &vec!["CA".to_string()]);
            assert_eq!(postal_code, &vec!["12345".to_string()]);
            assert_eq!(country, &vec!["USA".to_string()]);
        } else {
            panic!("expected structured");
        }
        assert_eq!(value.to_value(), ";;123 Main St;Anytown;CA;12345;USA");
    }

    #[test]
    fn raw_address_preserved() {
        let value = StructuredAddress::parse("123 Main St, Anytown");
        assert!(value.is_raw());
        assert_eq!(value.to_value(), "123 Main St, Anytown");
    }
}
