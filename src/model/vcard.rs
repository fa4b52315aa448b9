//! The `VCard` aggregate: the parsed, in-memory form of a single vCard.

use crate::error::GenerateError;
use crate::model::{
    Address, BinaryData, BinaryEntry, DateOrDateTime, Email, ExtendedProperty, Gender,
    GeoLocation, Impp, Kind, LanguagePref, Organization, RawProperty, Related, StructuredName,
    Telephone, Url, UriEntry,
};
use crate::version::Version;

/// A single vCard: every property this crate understands, plus fidelity
/// buffers for what it does not. Fields are mutated freely; serialization
/// (see [`crate::text_emitter`], [`crate::jcard`], [`crate::xcard`]) is a
/// pure read with no hidden state.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VCard {
    /// The vCard version this instance was parsed from, or will be
    /// serialized as.
    pub version: Version,
    /// `FN`. Must be non-empty when serialized.
    pub formatted_name: String,
    /// `N`.
    pub name: Option<StructuredName>,
    /// `NICKNAME` values.
    pub nicknames: Vec<String>,
    /// `PHOTO` entries.
    pub photos: Vec<BinaryEntry>,
    /// `BDAY`.
    pub birthday: Option<DateOrDateTime>,
    /// `ANNIVERSARY`.
    pub anniversary: Option<DateOrDateTime>,
    /// `REV`.
    pub revision: Option<DateOrDateTime>,
    /// `GENDER`.
    pub gender: Option<Gender>,
    /// `ADR` entries.
    pub addresses: Vec<Address>,
    /// `TEL` entries.
    pub telephones: Vec<Telephone>,
    /// `EMAIL` entries.
    pub emails: Vec<Email>,
    /// `IMPP` entries.
    pub impps: Vec<Impp>,
    /// `URL` entries.
    pub urls: Vec<Url>,
    /// `LANG` entries.
    pub languages: Vec<LanguagePref>,
    /// `KEY` entries.
    pub keys: Vec<BinaryEntry>,
    /// `RELATED` entries.
    pub related: Vec<Related>,
    /// `MEMBER` entries (only meaningful when `kind == Group`).
    pub members: Vec<UriEntry>,
    /// `XML` entries.
    pub xml: Vec<UriEntry>,
    /// `SOURCE` entries.
    pub sources: Vec<UriEntry>,
    /// `FBURL` entries.
    pub free_busy_urls: Vec<UriEntry>,
    /// `CALURI` entries.
    pub calendar_urls: Vec<UriEntry>,
    /// `CALADRURI` entries.
    pub calendar_address_urls: Vec<UriEntry>,
    /// `CATEGORIES` values (comma-split, empties dropped).
    pub categories: Vec<String>,
    /// `TZ`, as free text (`geo`-style `TZ=` child parameters on `ADR`
    /// are tracked on [`Address`] instead).
    pub timezone: Option<String>,
    /// `TITLE`.
    pub title: Option<String>,
    /// `ROLE`.
    pub role: Option<String>,
    /// `NOTE`.
    pub note: Option<String>,
    /// `PRODID`.
    pub product_id: Option<String>,
    /// `UID`.
    pub uid: Option<String>,
    /// `GEO`.
    pub geo: Option<GeoLocation>,
    /// `ORG`.
    pub organization: Option<Organization>,
    /// `LOGO`.
    pub logo: Option<BinaryData>,
    /// `SOUND`.
    pub sound: Option<BinaryData>,
    /// `KIND`.
    pub kind: Option<Kind>,
    /// `CLIENTPIDMAP` entries: (pid digit, source URI).
    pub client_pid_map: Vec<(u32, String)>,
    /// Unrecognized `X-`-prefixed properties, preserved verbatim.
    pub extended_properties: Vec<ExtendedProperty>,
    /// Every property as parsed, unset unless the parser's
    /// `preserve_raw` option was enabled.
    pub raw_properties: Option<Vec<RawProperty>>,
}

impl VCard {
    /// A new, empty vCard at the default version (4.0), with no
    /// `formatted_name` set yet. Callers must set `formatted_name` before
    /// serializing — see [`VCard::validate`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the invariants the text/jCard/xCard emitters rely on:
    /// `formatted_name` is non-empty, and `MEMBER` entries only appear on
    /// a vCard whose `KIND` is `Group`.
    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.formatted_name.trim().is_empty() {
            return Err(GenerateError::FnRequired);
        }
        if !self.members.is_empty() && self.kind != Some(Kind::Group) {
            return Err(GenerateError::MemberRequiresGroupKind);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fn_fails_validation() {
        let card = VCard::new();
        assert!(matches!(card.validate(), Err(GenerateError::FnRequired)));
    }

    #[test]
    fn member_without_group_kind_fails_validation() {
        let mut card = VCard::new();
        card.formatted_name = "Family List".to_string();
        card.members.push(UriEntry {
            uri: "urn:uuid:abc".to_string(),
            pref: None,
        });
        assert!(matches!(
            card.validate(),
            Err(GenerateError::MemberRequiresGroupKind)
        ));
        card.kind = Some(Kind::Group);
        assert!(card.validate().is_ok());
    }
}
