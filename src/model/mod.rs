//! The in-memory vCard data model: the common representation every
//! format (vCard text, jCard, xCard) parses into and serializes from.

mod address;
mod binary;
mod date_time;
mod entries;
mod extension;
mod gender;
mod geo;
mod kind;
mod organization;
mod structured_name;
mod vcard;

pub use address::{Address, StructuredAddress};
pub use binary::BinaryData;
pub use date_time::DateOrDateTime;
pub use entries::{
    BinaryEntry, Email, Impp, LanguagePref, Related, Telephone, Url, UriEntry,
};
pub use extension::{ExtendedProperty, RawProperty};
pub use gender::{Gender, Sex};
pub use geo::GeoLocation;
pub use kind::Kind;
pub use organization::Organization;
pub use structured_name::StructuredName;
pub use vcard::VCard;
