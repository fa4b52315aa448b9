//! vCard text emitter: serializes a [`VCard`] back to the canonical
//! `BEGIN:VCARD … END:VCARD` line-oriented form.

use tracing::debug;

use crate::error::GenerateError;
use crate::escape::{escape, join_values};
use crate::line_framer::fold;
use crate::model::{BinaryData, StructuredAddress, StructuredName, VCard};
use crate::version::Version;

/// Serializes [`VCard`] values to vCard text.
#[derive(Debug, Clone)]
pub struct Generator {
    fold_lines: bool,
}

impl Default for Generator {
    fn default() -> Self {
        Self { fold_lines: true }
    }
}

impl Generator {
    /// A new generator with line folding enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle line folding (on by default). Disabling it is mainly useful
    /// for producing diffable test fixtures.
    pub fn fold_lines(mut self, fold: bool) -> Self {
        self.fold_lines = fold;
        self
    }

    /// Serialize a single vCard.
    pub fn generate(&self, card: &VCard) -> Result<String, GenerateError> {
        debug!(version = %card.version, "generating vcard text");
        card.validate()?;

        let mut lines: Vec<String> = Vec::new();
        lines.push("BEGIN:VCARD".to_string());
        lines.push(format!("VERSION:{}", card.version));

        lines.push(format!("FN:{}", escape(&card.formatted_name)));

        if let Some(name) = &card.name {
            lines.push(property_line("N", &[], None, &structured_name_value(name)));
        }
        if !card.nicknames.is_empty() {
            lines.push(property_line("NICKNAME", &[], None, &join_values(&card.nicknames, ',')));
        }
        for photo in &card.photos {
            lines.push(self.binary_line("PHOTO", &photo.data, card.version, photo.pref));
        }
        if let Some(bday) = &card.birthday {
            lines.push(property_line("BDAY", &[], None, &bday.to_date_time_string()));
        }
        if let Some(anniversary) = &card.anniversary {
            lines.push(property_line(
                "ANNIVERSARY",
                &[],
                None,
                &anniversary.to_date_time_string(),
            ));
        }
        if let Some(rev) = &card.revision {
            lines.push(property_line("REV", &[], None, &rev.to_date_time_string()));
        }
        if let Some(gender) = &card.gender {
            lines.push(property_line("GENDER", &[], None, &gender.to_value()));
        }
        for addr in &card.addresses {
            let mut params: Vec<(String, String)> = Vec::new();
            if let Some(geo) = &addr.geo {
                params.push(("GEO".to_string(), geo.clone()));
            }
            if let Some(tz) = &addr.tz {
                params.push(("TZ".to_string(), tz.clone()));
            }
            if let Some(label) = &addr.label {
                params.push(("LABEL".to_string(), label.clone()));
            }
            lines.push(self.typed_line(
                "ADR",
                &addr.types,
                addr.pref,
                &params,
                &structured_address_value(&addr.value),
            ));
        }
        for tel in &card.telephones {
            let value = match card.version {
                Version::V40 => tel.to_uri(),
                _ => tel.number.clone(),
            };
            let mut params = Vec::new();
            if card.version == Version::V40 {
                params.push(("VALUE".to_string(), "uri".to_string()));
            }
            lines.push(self.typed_line("TEL", &tel.types, tel.pref, &params, &escape(&value)));
        }
        for email in &card.emails {
            lines.push(self.typed_line("EMAIL", &email.types, email.pref, &[], &escape(&email.address)));
        }
        for impp in &card.impps {
            lines.push(self.typed_line("IMPP", &impp.types, impp.pref, &[], &escape(&impp.uri)));
        }
        for url in &card.urls {
            lines.push(self.typed_line("URL", &url.types, url.pref, &[], &escape(&url.uri)));
        }
        for lang in &card.languages {
            lines.push(self.typed_line("LANG", &lang.types, lang.pref, &[], &lang.tag));
        }
        for key in &card.keys {
            lines.push(self.binary_line("KEY", &key.data, card.version, key.pref));
        }
        for related in &card.related {
            let types = related.relation_type.clone().into_iter().collect::<Vec<_>>();
            lines.push(self.typed_line("RELATED", &types, related.pref, &[], &escape(&related.value)));
        }
        for member in &card.members {
            lines.push(property_line("MEMBER", &[], member.pref, &escape(&member.uri)));
        }
        for xml in &card.xml {
            lines.push(property_line("XML", &[], xml.pref, &escape(&xml.uri)));
        }
        for source in &card.sources {
            lines.push(property_line("SOURCE", &[], source.pref, &escape(&source.uri)));
        }
        for url in &card.free_busy_urls {
            lines.push(property_line("FBURL", &[], url.pref, &escape(&url.uri)));
        }
        for url in &card.calendar_urls {
            lines.push(property_line("CALURI", &[], url.pref, &escape(&url.uri)));
        }
        for url in &card.calendar_address_urls {
            lines.push(property_line("CALADRURI", &[], url.pref, &escape(&url.uri)));
        }
        if !card.categories.is_empty() {
            lines.push(property_line("CATEGORIES", &[], None, &join_values(&card.categories, ',')));
        }
        if let Some(tz) = &card.timezone {
            lines.push(property_line("TZ", &[], None, &escape(tz)));
        }
        if let Some(title) = &card.title {
            lines.push(property_line("TITLE", &[], None, &escape(title)));
        }
        if let Some(role) = &card.role {
            lines.push(property_line("ROLE", &[], None, &escape(role)));
        }
        if let Some(note) = &card.note {
            lines.push(property_line("NOTE", &[], None, &escape(note)));
        }
        if let Some(prodid) = &card.product_id {
            lines.push(property_line("PRODID", &[], None, &escape(prodid)));
        }
        if let Some(uid) = &card.uid {
            lines.push(property_line("UID", &[], None, &escape(uid)));
        }
        if let Some(geo) = &card.geo {
            let value = if card.version == Version::V40 {
                geo.to_uri_string()
            } else {
                geo.to_legacy_string()
            };
            lines.push(property_line("GEO", &[], None, &value));
        }
        if let Some(org) = &card.organization {
            lines.push(property_line("ORG", &[], None, &organization_value(org)));
        }
        if let Some(logo) = &card.logo {
            lines.push(self.binary_line("LOGO", logo, card.version, None));
        }
        if let Some(sound) = &card.sound {
            lines.push(self.binary_line("SOUND", sound, card.version, None));
        }
        if let Some(kind) = &card.kind {
            lines.push(property_line("KIND", &[], None, &kind.to_string()));
        }
        for (pid, uri) in &card.client_pid_map {
            lines.push(property_line("CLIENTPIDMAP", &[], None, &format!("{};{}", pid, uri)));
        }
        for ext in &card.extended_properties {
            lines.push(format!(
                "{}{}:{}",
                ext.name,
                ext.params,
                escape(&ext.value)
            ));
        }

        lines.push("END:VCARD".to_string());

        let body = lines
            .into_iter()
            .map(|line| if self.fold_lines { fold(&line) } else { line })
            .collect::<Vec<_>>()
            .join("\r\n");
        Ok(format!("{body}\r\n"))
    }

    /// Serialize every card in `cards`, concatenated.
    pub fn generate_all(&self, cards: &[VCard]) -> Result<String, GenerateError> {
        let mut out = String::new();
        for card in cards {
            out.push_str(&self.generate(card)?);
        }
        Ok(out)
    }

    fn typed_line(
        &self,
        name: &str,
        types: &[String],
        pref: Option<u8>,
        extra_params: &[(String, String)],
        value: &str,
    ) -> String {
        let mut params = Vec::new();
        if !types.is_empty() {
            params.push(("TYPE".to_string(), types.join(",")));
        }
        if let Some(pref) = pref {
            params.push(("PREF".to_string(), pref.to_string()));
        }
        params.extend_from_slice(extra_params);
        property_line(name, &params, None, value)
    }

    fn binary_line(&self, name: &str, data: &BinaryData, version: Version, pref: Option<u8>) -> String {
        match (version, data) {
            (Version::V40, _) => {
                let value = data
                    .data_uri()
                    .unwrap_or_else(|| match data {
                        BinaryData::Uri { uri, .. } => uri.clone(),
                        BinaryData::Inline { .. } => String::new(),
                    });
                property_line(name, &[], pref, &value)
            }
            (_, BinaryData::Inline { bytes, media_type }) => {
                use base64::{engine::general_purpose::STANDARD, Engine};
                let mut params = vec![("ENCODING".to_string(), "BASE64".to_string())];
                if let Some(mt) = media_type {
                    params.push(("TYPE".to_string(), mt.clone()));
                }
                property_line(name, &params, pref, &STANDARD.encode(bytes))
            }
            (_, BinaryData::Uri { uri, .. }) => property_line(name, &[], pref, uri),
        }
    }
}

fn property_line(name: &str, params: &[(String, String)], pref: Option<u8>, value: &str) -> String {
    let mut out = name.to_string();
    for (key, val) in params {
        out.push(';');
        out.push_str(key);
        out.push('=');
        out.push_str(&quote_if_needed(val));
    }
    if let Some(pref) = pref {
        out.push_str(&format!(";PREF={}", pref));
    }
    out.push(':');
    out.push_str(value);
    out
}

fn quote_if_needed(value: &str) -> String {
    if value.chars().any(|c| ":;,\n".contains(c)) {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}

fn structured_name_value(name: &StructuredName) -> String {
    name.to_value()
}

fn structured_address_value(addr: &StructuredAddress) -> String {
    addr.to_value()
}

fn organization_value(org: &crate::model::Organization) -> String {
    org.to_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Parser;

    #[test]
    fn roundtrip_minimal_card() {
        let mut card = VCard::new();
        card.formatted_name = "Jane Doe".to_string();
        let text = Generator::new().generate(&card).unwrap();
        assert!(text.starts_with("BEGIN:VCARD\r\nVERSION:4.0\r\n"));
        assert!(text.contains("FN:Jane Doe"));
        assert!(text.ends_with("END:VCARD\r\n"));

        let reparsed = Parser::new().parse_single(&text).unwrap();
        assert_eq!(reparsed.formatted_name, "Jane Doe");
    }

    #[test]
    fn missing_fn_fails() {
        let card = VCard::new();
        assert!(matches!(
            Generator::new().generate(&card),
            Err(GenerateError::FnRequired)
        ));
    }

    #[test]
    fn tel_uses_uri_form_on_v40() {
        let mut card = VCard::new();
        card.formatted_name = "Jane Doe".to_string();
        card.telephones.push(crate::model::Telephone {
            number: "+1-555-0100".to_string(),
            ext: None,
            types: vec!["work".to_string()],
            pref: Some(1),
        });
        let text = Generator::new().generate(&card).unwrap();
        assert!(text.contains("VALUE=uri"));
        assert!(text.contains("tel:+1-555-0100"));
    }

    #[test]
    fn special_value_is_quoted() {
        let mut card = VCard::new();
        card.formatted_name = "Jane Doe".to_string();
        card.addresses.push(crate::model::Address {
            value: StructuredAddress::Raw("123 Main St; Suite 4".to_string()),
            types: vec![],
            pref: None,
            geo: None,
            tz: None,
            label: Some("123 Main St, Suite 4".to_string()),
        });
        let text = Generator::new().fold_lines(false).generate(&card).unwrap();
        assert!(text.contains(r#"LABEL="123 Main St, Suite 4""#));
    }
}
