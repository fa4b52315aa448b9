//! Property dispatcher: turns a stream of tokenized content lines into
//! [`VCard`] values.

use tracing::{debug, warn};

use crate::error::{ParseError, SourceLocation};
use crate::escape::{quoted_printable_decode, split_value, unescape};
use crate::line_framer::unfold_lines;
use crate::model::{
    Address, BinaryData, BinaryEntry, DateOrDateTime, Email, ExtendedProperty, Gender,
    GeoLocation, Impp, Kind, LanguagePref, Organization, RawProperty, Related, StructuredAddress,
    StructuredName, Telephone, Url, UriEntry, VCard,
};
use crate::parameters::Parameters;
use crate::tokenizer::{tokenize, ContentLine};
use crate::version::Version;

/// Parses vCard text into [`VCard`] values.
///
/// Lenient by default (RFC producers in the wild routinely violate their
/// own grammar): a truncated stream still yields the partial card, a
/// malformed binary value degrades to a URI, and an unparsable date is
/// simply left unset. Call [`Parser::strict`] to instead fail loudly.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    strict: bool,
    preserve_raw: bool,
}

impl Parser {
    /// A new parser in the default lenient mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on malformed input instead of recovering from it.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Populate [`VCard::raw_properties`] with every parsed content line,
    /// verbatim, for round-trip fidelity of properties this crate does
    /// not otherwise interpret specially.
    pub fn preserve_raw(mut self, preserve: bool) -> Self {
        self.preserve_raw = preserve;
        self
    }

    /// Parse `input`, which may contain any number of `BEGIN:VCARD …
    /// END:VCARD` blocks.
    pub fn parse(&self, input: &str) -> Result<Vec<VCard>, ParseError> {
        if input.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let lines = unfold_lines(input);
        let mut cards = Vec::new();
        let mut current: Option<Vec<ContentLine>> = None;

        for (i, line) in lines.iter().enumerate() {
            let line_no = i + 1;
            if line.trim().is_empty() {
                continue;
            }
            let upper = line.to_uppercase();
            if upper == "BEGIN:VCARD" {
                if current.is_some() && self.strict {
                    return Err(ParseError::MissingEnd(SourceLocation::new(line_no, line)));
                }
                debug!(line = line_no, "vcard envelope opened");
                current = Some(Vec::new());
                continue;
            }
            if upper == "END:VCARD" {
                if let Some(properties) = current.take() {
                    debug!(line = line_no, "vcard envelope closed");
                    cards.push(self.build_card(properties)?);
                } else if self.strict {
                    return Err(ParseError::MissingColon(SourceLocation::new(line_no, line)));
                }
                continue;
            }

            match &mut current {
                Some(properties) => {
                    let token = tokenize(line, line_no)?;
                    properties.push(token);
                }
                None if self.strict => {
                    return Err(ParseError::MissingEnd(SourceLocation::new(line_no, line)));
                }
                None => {}
            }
        }

        if let Some(properties) = current {
            if self.strict {
                return Err(ParseError::MissingEnd(SourceLocation::new(lines.len(), "")));
            }
            warn!("truncated stream missing END:VCARD, emitting partial vcard leniently");
            cards.push(self.build_card(properties)?);
        }

        Ok(cards)
    }

    /// Parse `input`, requiring it to contain exactly one vCard.
    pub fn parse_single(&self, input: &str) -> Result<VCard, ParseError> {
        let mut cards = self.parse(input)?;
        if cards.len() != 1 {
            return Err(ParseError::NotSingleVcard(cards.len()));
        }
        Ok(cards.remove(0))
    }

    fn build_card(&self, lines: Vec<ContentLine>) -> Result<VCard, ParseError> {
        let version = lines
            .iter()
            .find(|l| l.name == "VERSION")
            .and_then(|l| Version::parse(&l.raw_value))
            .unwrap_or_default();

        let mut card = VCard {
            version,
            ..VCard::default()
        };
        if self.preserve_raw {
            card.raw_properties = Some(Vec::new());
        }

        for line in &lines {
            if line.name == "VERSION" {
                continue;
            }

            if let Some(raw) = &mut card.raw_properties {
                raw.push(RawProperty {
                    group: line.group.clone(),
                    name: line.original_name.clone(),
                    params: line.params.clone(),
                    value: line.raw_value.clone(),
                });
            }

            let value = self.decode_value(line, version);
            self.dispatch(&mut card, line, &value);
        }

        Ok(card)
    }

    /// Apply QP decoding (2.1 only) and then escape-unescaping (3.0/4.0
    /// only — 2.1 has no backslash-escape grammar for most properties).
    fn decode_value(&self, line: &ContentLine, version: Version) -> String {
        let mut value = line.raw_value.clone();
        if line.params.encoding().as_deref() == Some("QUOTED-PRINTABLE") {
            value = match quoted_printable_decode(&value) {
                Ok(decoded) => decoded,
                Err(_) => {
                    warn!(property = %line.name, "malformed quoted-printable value, using raw bytes");
                    value
                }
            };
        }
        if version != Version::V21 {
            value = unescape(&value);
        }
        value
    }

    fn dispatch(&self, card: &mut VCard, line: &ContentLine, value: &str) {
        match line.name.as_str() {
            "FN" => card.formatted_name = value.to_string(),
            "N" => card.name = Some(parse_structured_name(value)),
            "NICKNAME" => card.nicknames.extend(split_csv(value)),
            "CATEGORIES" => card.categories.extend(split_csv(value)),
            "PHOTO" => card.photos.push(BinaryEntry {
                data: parse_binary(value, &line.params),
                pref: line.params.pref(),
            }),
            "BDAY" => card.birthday = parse_date_warning_on_failure(value, "BDAY"),
            "ANNIVERSARY" => card.anniversary = parse_date_warning_on_failure(value, "ANNIVERSARY"),
            "REV" => card.revision = parse_date_warning_on_failure(value, "REV"),
            "GENDER" => card.gender = Some(Gender::parse(value)),
            "ADR" => card.addresses.push(Address::from_parts(
                parse_structured_address(value),
                &line.params,
            )),
            "TEL" => card.telephones.push(Telephone::from_parts(value, &line.params)),
            "EMAIL" => card.emails.push(Email::from_parts(value, &line.params)),
            "IMPP" => card.impps.push(Impp::from_parts(value, &line.params)),
            "URL" => card.urls.push(Url::from_parts(value, &line.params)),
            "LANG" => card.languages.push(LanguagePref::from_parts(value, &line.params)),
            "KEY" => card.keys.push(BinaryEntry {
                data: parse_binary(value, &line.params),
                pref: line.params.pref(),
            }),
            "RELATED" => card.related.push(Related::from_parts(value, &line.params)),
            "MEMBER" => card.members.push(UriEntry::from_parts(value, &line.params)),
            "XML" => card.xml.push(UriEntry::from_parts(value, &line.params)),
            "SOURCE" => card.sources.push(UriEntry::from_parts(value, &line.params)),
            "FBURL" => card.free_busy_urls.push(UriEntry::from_parts(value, &line.params)),
            "CALURI" => card.calendar_urls.push(UriEntry::from_parts(value, &line.params)),
            "CALADRURI" => card
                .calendar_address_urls
                .push(UriEntry::from_parts(value, &line.params)),
            "TZ" => card.timezone = Some(value.to_string()),
            "TITLE" => card.title = Some(value.to_string()),
            "ROLE" => card.role = Some(value.to_string()),
            "NOTE" => card.note = Some(value.to_string()),
            "PRODID" => card.product_id = Some(value.to_string()),
            "UID" => card.uid = Some(value.to_string()),
            "GEO" => card.geo = GeoLocation::parse(value),
            "ORG" => card.organization = Some(Organization::parse(value)),
            "LOGO" => card.logo = Some(parse_binary(value, &line.params)),
            "SOUND" => card.sound = Some(parse_binary(value, &line.params)),
            "KIND" => card.kind = value.parse().ok(),
            "CLIENTPIDMAP" => {
                if let Some((pid, uri)) = value.split_once(';') {
                    if let Ok(pid) = pid.trim().parse() {
                        card.client_pid_map.push((pid, uri.trim().to_string()));
                    }
                }
            }
            name if name.starts_with("X-") => card.extended_properties.push(ExtendedProperty {
                name: line.original_name.clone(),
                params: line.params.clone(),
                value: value.to_string(),
            }),
            name => {
                warn!(property = name, "unrecognized property name, discarding value");
            }
        }
    }
}

fn parse_date_warning_on_failure(value: &str, property: &str) -> Option<DateOrDateTime> {
    let parsed = DateOrDateTime::try_parse(value);
    if parsed.is_none() {
        warn!(property, value, "unparsable date/time, leaving unset");
    }
    parsed
}

fn split_csv(value: &str) -> Vec<String> {
    split_value(value, ',')
        .into_iter()
        .map(|s| unescape(s.trim()))
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_structured_name(value: &str) -> StructuredName {
    StructuredName::parse(value)
}

fn parse_structured_address(value: &str) -> StructuredAddress {
    StructuredAddress::parse(value)
}

/// Decode a `PHOTO`/`LOGO`/`SOUND`/`KEY` value per the dispatcher table:
/// a `data:` URI decodes directly; `ENCODING=BASE64`/`b` or
/// `VALUE=BINARY` means the raw value itself is base64; anything else is
/// a URI reference. Malformed base64 degrades to storing the value as a
/// URI (lenient recovery).
fn parse_binary(value: &str, params: &Parameters) -> BinaryData {
    if let Some(data) = BinaryData::from_data_uri(value) {
        return data;
    }
    if params.is_base64_encoded() {
        match BinaryData::from_base64(value, params.media_type().map(str::to_string)) {
            Ok(data) => return data,
            Err(_) => warn!("malformed base64 value, falling back to uri"),
        }
    }
    BinaryData::Uri {
        uri: value.to_string(),
        media_type: params.media_type().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\nEND:VCARD\r\n";

    #[test]
    fn parses_minimal_card() {
        let cards = Parser::new().parse(MINIMAL).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].formatted_name, "Jane Doe");
        assert_eq!(cards[0].version, Version::V40);
    }

    #[test]
    fn parses_structured_and_typed_properties() {
        let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\n\
             N:Doe;Jane;;;\r\n\
             TEL;TYPE=work,voice;PREF=1:tel:+1-555-0100\r\n\
             EMAIL;TYPE=home:jane@example.com\r\n\
             ADR;TYPE=work:;;123 Main St;Anytown;CA;12345;USA\r\n\
             END:VCARD\r\n";
        let card = Parser::new().parse_single(input).unwrap();
        assert!(card.name.unwrap().is_structured());
        assert_eq!(card.telephones[0].number, "+1-555-0100");
        assert_eq!(card.telephones[0].pref, Some(1));
        assert_eq!(card.emails[0].address, "jane@example.com");
        assert_eq!(card.addresses[0].types, vec!["work".to_string()]);
    }

    #[test]
    fn truncated_stream_is_recovered_leniently() {
        let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:No End\r\n";
        let cards = Parser::new().parse(input).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].formatted_name, "No End");
    }

    #[test]
    fn truncated_stream_fails_strict() {
        let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:No End\r\n";
        assert!(Parser::new().strict(true).parse(input).is_err());
    }

    #[test]
    fn extension_property_preserved() {
        let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\nX-CUSTOM:hello\r\nEND:VCARD\r\n";
        let card = Parser::new().parse_single(input).unwrap();
        assert_eq!(card.extended_properties[0].name, "X-CUSTOM");
        assert_eq!(card.extended_properties[0].value, "hello");
    }

    #[test]
    fn preserve_raw_collects_every_property() {
        let card = Parser::new()
            .preserve_raw(true)
            .parse_single(MINIMAL)
            .unwrap();
        assert_eq!(card.raw_properties.unwrap().len(), 1);
    }

    #[test]
    fn clientpidmap_parses() {
        let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\n\
             CLIENTPIDMAP:1;urn:uuid:abc\r\nEND:VCARD\r\n";
        let card = Parser::new().parse_single(input).unwrap();
        assert_eq!(card.client_pid_map, vec![(1, "urn:uuid:abc".to_string())]);
    }

    #[test]
    fn malformed_base64_degrades_to_uri() {
        let input = "BEGIN:VCARD\r\nVERSION:4.0\r\nFN:Jane Doe\r\n\
             PHOTO;ENCODING=BASE64;TYPE=JPEG:not valid base64!!!\r\nEND:VCARD\r\n";
        let card = Parser::new().parse_single(input).unwrap();
        assert!(card.photos[0].data.is_uri());
    }

    #[test]
    fn empty_input_errors() {
        assert!(matches!(Parser::new().parse(""), Err(ParseError::EmptyInput)));
    }

    #[test]
    fn not_single_vcard_errors() {
        let input = format!("{MINIMAL}{MINIMAL}");
        assert!(matches!(
            Parser::new().parse_single(&input),
            Err(ParseError::NotSingleVcard(2))
        ));
    }
}
