//! Typed entry wrappers: a value plus the type/pref/language parameters
//! that travel with it on `TEL`, `EMAIL`, `IMPP`, `URL`, `LANG`, `RELATED`
//! and the binary properties.

use crate::model::binary::BinaryData;
use crate::parameters::Parameters;

/// A `TEL` entry. `tel:` scheme and `;ext=` extension are split out of the
/// raw value per the dispatcher table; everything else is carried as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Telephone {
    /// The phone number text (scheme stripped if present).
    pub number: String,
    /// The `;ext=` extension, if the value carried one.
    pub ext: Option<String>,
    /// Type tokens (`work`, `cell`, `fax`, …).
    pub types: Vec<String>,
    /// `PREF=` preference order.
    pub pref: Option<u8>,
}

impl Telephone {
    /// Build a `Telephone` from a raw `TEL` value and its parameters.
    pub fn from_parts(value: &str, params: &Parameters) -> Self {
        let body = value.strip_prefix("tel:").unwrap_or(value);
        let (number, ext) = match body.split_once(";ext=") {
            Some((n, e)) => (n.to_string(), Some(e.to_string())),
            None => (body.to_string(), None),
        };
        Self {
            number,
            ext,
            types: params.type_values(),
            pref: params.pref(),
        }
    }

    /// Render back to the `tel:` URI form used by vCard 4.0.
    pub fn to_uri(&self) -> String {
        match &self.ext {
            Some(ext) => format!("tel:{};ext={}", self.number, ext),
            None => format!("tel:{}", self.number),
        }
    }
}

/// An `EMAIL` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Email {
    /// The address text (`mailto:` scheme stripped if present).
    pub address: String,
    /// Type tokens.
    pub types: Vec<String>,
    /// `PREF=` preference order.
    pub pref: Option<u8>,
}

impl Email {
    /// Build an `Email` from a raw `EMAIL` value and its parameters.
    pub fn from_parts(value: &str, params: &Parameters) -> Self {
        Self {
            address: value.strip_prefix("mailto:").unwrap_or(value).to_string(),
            types: params.type_values(),
            pref: params.pref(),
        }
    }
}

/// An `IMPP` (instant-messaging/presence protocol) entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Impp {
    /// The full URI, scheme retained (e.g. `xmpp:alice@example.com`).
    pub uri: String,
    /// Type tokens.
    pub types: Vec<String>,
    /// `PREF=` preference order.
    pub pref: Option<u8>,
}

impl Impp {
    /// Build an `Impp` from a raw `IMPP` value and its parameters.
    pub fn from_parts(value: &str, params: &Parameters) -> Self {
        Self {
            uri: value.to_string(),
            types: params.type_values(),
            pref: params.pref(),
        }
    }
}

/// A `URL` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Url {
    /// The URI text.
    pub uri: String,
    /// Type tokens.
    pub types: Vec<String>,
    /// `PREF=` preference order.
    pub pref: Option<u8>,
}

impl Url {
    /// Build a `Url` from a raw `URL` value and its parameters.
    pub fn from_parts(value: &str, params: &Parameters) -> Self {
        Self {
            uri: value.to_string(),
            types: params.type_values(),
            pref: params.pref(),
        }
    }
}

/// A `LANG` (language preference) entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LanguagePref {
    /// The BCP 47 language tag text.
    pub tag: String,
    /// Type tokens (e.g. `work`, `home`).
    pub types: Vec<String>,
    /// `PREF=` preference order.
    pub pref: Option<u8>,
}

impl LanguagePref {
    /// Build a `LanguagePref` from a raw `LANG` value and its parameters.
    pub fn from_parts(value: &str, params: &Parameters) -> Self {
        Self {
            tag: value.to_string(),
            types: params.type_values(),
            pref: params.pref(),
        }
    }
}

/// A `RELATED` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Related {
    /// The related entity's URI or free text.
    pub value: String,
    /// The first `TYPE=` value (e.g. `spouse`, `friend`), if any.
    pub relation_type: Option<String>,
    /// `PREF=` preference order.
    pub pref: Option<u8>,
}

impl Related {
    /// Build a `Related` from a raw `RELATED` value and its parameters.
    pub fn from_parts(value: &str, params: &Parameters) -> Self {
        Self {
            value: value.to_string(),
            relation_type: params.type_values().into_iter().next(),
            pref: params.pref(),
        }
    }
}

/// A typed binary entry (`PHOTO`, `KEY`): the decoded data plus the
/// preference order. `PHOTO`/`KEY` carry no `TYPE=` type tokens in
/// practice, so only `pref` is tracked alongside the payload.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryEntry {
    /// The binary payload.
    pub data: BinaryData,
    /// `PREF=` preference order.
    pub pref: Option<u8>,
}

/// A bare URI-valued list entry (`MEMBER`, `SOURCE`, `XML`, `FBURL`,
/// `CALURI`, `CALADRURI`): a raw value plus preference order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UriEntry {
    /// The raw URI/value text.
    pub uri: String,
    /// `PREF=` preference order.
    pub pref: Option<u8>,
}

impl UriEntry {
    /// Build a `UriEntry` from a raw value and its parameters.
    pub fn from_parts(value: &str, params: &Parameters) -> Self {
        Self {
            uri: value.to_string(),
            pref: params.pref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telephone_strips_scheme_and_ext() {
        let params = Parameters::new();
        let tel = Telephone::from_parts("tel:+1-555-555-0100;ext=101", &params);
        assert_eq!(tel.number, "+1-555-555-0100");
        assert_eq!(tel.ext.as_deref(), Some("101"));
        assert_eq!(tel.to_uri(), "tel:+1-555-555-0100;ext=101");
    }

    #[test]
    fn email_strips_mailto() {
        let params = Parameters::new();
        let email = Email::from_parts("mailto:jane@example.com", &params);
        assert_eq!(email.address, "jane@example.com");
    }

    #[test]
    fn related_captures_first_type() {
        let mut params = Parameters::new();
        params.insert("TYPE", "spouse");
        let related = Related::from_parts("urn:uuid:abc", &params);
        assert_eq!(related.relation_type.as_deref(), Some("spouse"));
    }
}
