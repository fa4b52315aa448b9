//! xCard (RFC 6351): the XML projection of a vCard.
//!
//! Emission builds the fixed, well-known element shape directly as
//! strings (the same approach the text emitter uses for its line-oriented
//! output); parsing uses `quick_xml`'s pull parser to build a small
//! in-memory element tree first, then walks that tree, since a
//! hand-rolled streaming scanner would have to reimplement most of what
//! the pull parser already does correctly (attribute/whitespace/entity
//! handling) for no benefit — xCard documents are not large relative to
//! a single contact.

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::error::FormatError;
use crate::model::{
    Address, BinaryData, BinaryEntry, DateOrDateTime, Email, Gender, GeoLocation, Impp,
    LanguagePref, Organization, Related, StructuredAddress, StructuredName, Telephone, Url,
    UriEntry, VCard,
};
use crate::version::Version;

const NAMESPACE: &str = "urn:ietf:params:xml:ns:vcard-4.0";

/// Converts [`VCard`] values to and from the xCard XML form.
#[derive(Debug, Clone, Default)]
pub struct XCardFormatter;

impl XCardFormatter {
    /// A new formatter.
    pub fn new() -> Self {
        Self
    }

    /// Serialize every card in `cards` under a single `<vcards>` root.
    pub fn to_xml(&self, cards: &[VCard]) -> Result<String, FormatError> {
        debug!(count = cards.len(), "converting vcards to xcard");
        let mut out = String::new();
        out.push_str(&format!(r#"<vcards xmlns="{NAMESPACE}">"#));
        for card in cards {
            out.push_str(&self.card_to_xml(card)?);
        }
        out.push_str("</vcards>");
        Ok(out)
    }

    fn card_to_xml(&self, card: &VCard) -> Result<String, FormatError> {
        card.validate()?;
        let mut out = String::from("<vcard>");
        out.push_str(&text_element("fn", "text", &card.formatted_name));

        if let Some(name) = &card.name {
            out.push_str(&structured_name_element(name));
        }
        for nickname in &card.nicknames {
            out.push_str(&text_element("nickname", "text", nickname));
        }
        for photo in &card.photos {
            out.push_str(&binary_element("photo", &photo.data, photo.pref));
        }
        if let Some(bday) = &card.birthday {
            out.push_str(&text_element("bday", "date-and-or-time", &bday.to_date_time_string()));
        }
        if let Some(anniversary) = &card.anniversary {
            out.push_str(&text_element(
                "anniversary",
                "date-and-or-time",
                &anniversary.to_date_time_string(),
            ));
        }
        if let Some(rev) = &card.revision {
            out.push_str(&text_element("rev", "timestamp", &rev.to_date_time_string()));
        }
        if let Some(gender) = &card.gender {
            out.push_str(&text_element("gender", "text", &gender.to_value()));
        }
        for addr in &card.addresses {
            out.push_str(&structured_address_element(addr));
        }
        for tel in &card.telephones {
            out.push_str(&typed_element("tel", "uri", &tel.to_uri(), &tel.types, tel.pref));
        }
        for email in &card.emails {
            out.push_str(&typed_element("email", "text", &email.address, &email.types, email.pref));
        }
        for impp in &card.impps {
            out.push_str(&typed_element("impp", "uri", &impp.uri, &impp.types, impp.pref));
        }
        for url in &card.urls {
            out.push_str(&typed_element("url", "uri", &url.uri, &url.types, url.pref));
        }
        for lang in &card.languages {
            out.push_str(&typed_element("lang", "language-tag", &lang.tag, &lang.types, lang.pref));
        }
        for key in &card.keys {
            out.push_str(&binary_element("key", &key.data, key.pref));
        }
        for related in &card.related {
            let types: Vec<String> = related.relation_type.clone().into_iter().collect();
            out.push_str(&typed_element("related", "uri", &related.value, &types, related.pref));
        }
        for member in &card.members {
            out.push_str(&uri_entry_element("member", member));
        }
        for xml in &card.xml {
            out.push_str(&uri_entry_element("xml", xml));
        }
        for source in &card.sources {
            out.push_str(&uri_entry_element("source", source));
        }
        for url in &card.free_busy_urls {
            out.push_str(&uri_entry_element("fburl", url));
        }
        for url in &card.calendar_urls {
            out.push_str(&uri_entry_element("caluri", url));
        }
        for url in &card.calendar_address_urls {
            out.push_str(&uri_entry_element("caladruri", url));
        }
        if !card.categories.is_empty() {
            let mut inner = String::new();
            for cat in &card.categories {
                inner.push_str(&format!("<text>{}</text>", xml_escape(cat)));
            }
            out.push_str(&format!("<categories>{inner}</categories>"));
        }
        if let Some(tz) = &card.timezone {
            out.push_str(&text_element("tz", "text", tz));
        }
        if let Some(title) = &card.title {
            out.push_str(&text_element("title", "text", title));
        }
        if let Some(role) = &card.role {
            out.push_str(&text_element("role", "text", role));
        }
        if let Some(note) = &card.note {
            out.push_str(&text_element("note", "text", note));
        }
        if let Some(prodid) = &card.product_id {
            out.push_str(&text_element("prodid", "text", prodid));
        }
        if let Some(uid) = &card.uid {
            out.push_str(&text_element("uid", "text", uid));
        }
        if let Some(geo) = &card.geo {
            out.push_str(&text_element("geo", "uri", &geo.to_uri_string()));
        }
        if let Some(org) = &card.organization {
            out.push_str(&organization_element(org));
        }
        if let Some(logo) = &card.logo {
            out.push_str(&binary_element("logo", logo, None));
        }
        if let Some(sound) = &card.sound {
            out.push_str(&binary_element("sound", sound, None));
        }
        if let Some(kind) = &card.kind {
            out.push_str(&text_element("kind", "text", &kind.to_string()));
        }
        for (pid, uri) in &card.client_pid_map {
            out.push_str(&format!(
                "<clientpidmap><text>{}</text><uri>{}</uri></clientpidmap>",
                xml_escape(&pid.to_string()),
                xml_escape(uri)
            ));
        }
        for ext in &card.extended_properties {
            out.push_str(&text_element(&ext.name.to_lowercase(), "unknown", &ext.value));
        }

        out.push_str("</vcard>");
        Ok(out)
    }

    /// Parse every `<vcard>` under the (outermost) `<vcards>` root, or a
    /// single bare `<vcard>` document.
    pub fn from_xml(&self, xml: &str) -> Result<Vec<VCard>, FormatError> {
        debug!("parsing xcard into vcards");
        let root = parse_tree(xml)?;
        let vcard_elements: Vec<&Element> = if root.name == "vcards" {
            root.children.iter().filter(|c| c.name == "vcard").collect()
        } else if root.name == "vcard" {
            vec![&root]
        } else {
            root.find_all("vcard")
        };
        if vcard_elements.is_empty() {
            return Err(FormatError::NotVCard);
        }
        Ok(vcard_elements.into_iter().map(element_to_card).collect())
    }
}

fn text_element(name: &str, value_type: &str, text: &str) -> String {
    format!("<{name}><{value_type}>{}</{value_type}></{name}>", xml_escape(text))
}

fn typed_element(name: &str, value_type: &str, text: &str, types: &[String], pref: Option<u8>) -> String {
    let params = params_element(types, pref);
    format!(
        "<{name}>{params}<{value_type}>{}</{value_type}></{name}>",
        xml_escape(text)
    )
}

fn uri_entry_element(name: &str, entry: &UriEntry) -> String {
    let params = params_element(&[], entry.pref);
    format!("<{name}>{params}<uri>{}</uri></{name}>", xml_escape(&entry.uri))
}

fn binary_element(name: &str, data: &BinaryData, pref: Option<u8>) -> String {
    let uri = data.data_uri().unwrap_or_else(|| match data {
        BinaryData::Uri { uri, .. } => uri.clone(),
        BinaryData::Inline { .. } => String::new(),
    });
    let params = params_element(&[], pref);
    format!("<{name}>{params}<uri>{}</uri></{name}>", xml_escape(&uri))
}

fn params_element(types: &[String], pref: Option<u8>) -> String {
    if types.is_empty() && pref.is_none() {
        return String::new();
    }
    let mut inner = String::new();
    if !types.is_empty() {
        let mut type_inner = String::new();
        for t in types {
            type_inner.push_str(&format!("<text>{}</text>", xml_escape(t)));
        }
        inner.push_str(&format!("<type>{type_inner}</type>"));
    }
    if let Some(pref) = pref {
        inner.push_str(&format!("<pref><integer>{pref}</integer></pref>"));
    }
    format!("<parameters>{inner}</parameters>")
}

fn structured_name_element(name: &StructuredName) -> String {
    match name {
        StructuredName::Raw(s) => text_element("n", "text", s),
        StructuredName::Structured {
            family,
            given,
            additional,
            prefixes,
            suffixes,
        } => {
            let mut inner = String::new();
            inner.push_str(&component_element("surname", family));
            inner.push_str(&component_element("given", given));
            inner.push_str(&component_element("additional", additional));
            inner.push_str(&component_element("prefix", prefixes));
            inner.push_str(&component_element("suffix", suffixes));
            format!("<n>{inner}</n>")
        }
    }
}

fn structured_address_element(addr: &Address) -> String {
    let params = params_element(&addr.types, addr.pref);
    let body = match &addr.value {
        StructuredAddress::Raw(s) => format!("<text>{}</text>", xml_escape(s)),
        StructuredAddress::Structured {
            po_box,
            extended,
            street,
            city,
            region,
            postal_code,
            country,
        } => {
            let mut inner = String::new();
            inner.push_str(&component_element("pobox", po_box));
            inner.push_str(&component_element("ext", extended));
            inner.push_str(&component_element("street", street));
            inner.push_str(&component_element("locality", city));
            inner.push_str(&component_element("region", region));
            inner.push_str(&component_element("code", postal_code));
            inner.push_str(&component_element("country", country));
            inner
        }
    };
    format!("<adr>{params}{body}</adr>")
}

fn organization_element(org: &Organization) -> String {
    match org {
        Organization::Raw(s) => text_element("org", "text", s),
        Organization::Structured { name, units } => {
            let mut inner = format!("<text>{}</text>", xml_escape(name));
            for unit in units {
                inner.push_str(&format!("<text>{}</text>", xml_escape(unit)));
            }
            format!("<org>{inner}</org>")
        }
    }
}

fn component_element(name: &str, values: &[String]) -> String {
    if values.is_empty() {
        return format!("<{name}/>");
    }
    let joined = values.join(",");
    format!("<{name}>{}</{name}>", xml_escape(&joined))
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// A minimal in-memory XML element tree: just enough structure (name,
/// direct text, children) to interpret the restricted xCard vocabulary.
#[derive(Debug, Clone, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn find_all(&self, name: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        for child in &self.children {
            if child.name == name {
                out.push(child);
            }
            out.extend(child.find_all(name));
        }
        out
    }

    /// The text of the first child that is not `<parameters>`, or this
    /// element's own direct text if it has no element children (the
    /// `<text>`/`<uri>`/… value-type wrapper).
    fn value_text(&self) -> String {
        if let Some(value_child) = self.children.iter().find(|c| c.name != "parameters") {
            if !value_child.children.is_empty() {
                // Nested once more, e.g. categories' repeated <text>.
                return value_child.children.first().map(|c| c.text.clone()).unwrap_or_default();
            }
            return value_child.text.clone();
        }
        self.text.clone()
    }

    fn all_value_texts(&self, value_type: &str) -> Vec<String> {
        self.children
            .iter()
            .filter(|c| c.name == value_type)
            .map(|c| c.text.clone())
            .collect()
    }

    fn types(&self) -> Vec<String> {
        self.child("parameters")
            .and_then(|p| p.child("type"))
            .map(|t| t.all_value_texts("text"))
            .unwrap_or_default()
    }

    fn pref(&self) -> Option<u8> {
        self.child("parameters")
            .and_then(|p| p.child("pref"))
            .and_then(|p| p.child("integer"))
            .and_then(|i| i.text.parse().ok())
    }
}

fn parse_tree(xml: &str) -> Result<Element, FormatError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = vec![Element {
        name: "#root".to_string(),
        ..Default::default()
    }];

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(e.name().as_ref());
                stack.push(Element {
                    name,
                    ..Default::default()
                });
            }
            Event::Empty(e) => {
                let name = local_name(e.name().as_ref());
                let element = Element {
                    name,
                    ..Default::default()
                };
                stack.last_mut().expect("root never popped").children.push(element);
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    let finished = stack.pop().expect("matched a Start");
                    stack.last_mut().expect("root never popped").children.push(finished);
                }
            }
            Event::Text(t) => {
                let text = t.unescape().unwrap_or_default().into_owned();
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let mut root = stack.pop().unwrap_or_default();
    if root.children.len() == 1 {
        Ok(root.children.remove(0))
    } else {
        Ok(root)
    }
}

fn local_name(qualified: &[u8]) -> String {
    let s = String::from_utf8_lossy(qualified);
    s.rsplit(':').next().unwrap_or(&s).to_lowercase()
}

fn element_to_card(element: &Element) -> VCard {
    let mut card = VCard::default();
    card.version = Version::V40;

    for prop in &element.children {
        let types = prop.types();
        let pref = prop.pref();
        let text = prop.value_text();

        match prop.name.as_str() {
            "fn" => card.formatted_name = text,
            "n" => card.name = Some(structured_name_from_element(prop)),
            "nickname" => card.nicknames.push(text),
            "photo" => card.photos.push(BinaryEntry {
                data: binary_from_text(&text),
                pref,
            }),
            "bday" => card.birthday = DateOrDateTime::try_parse(&text),
            "anniversary" => card.anniversary = DateOrDateTime::try_parse(&text),
            "rev" => card.revision = DateOrDateTime::try_parse(&text),
            "gender" => card.gender = Some(Gender::parse(&text)),
            "adr" => card.addresses.push(Address {
                value: structured_address_from_element(prop),
                types,
                pref,
                geo: None,
                tz: None,
                label: None,
            }),
            "tel" => card.telephones.push(Telephone {
                number: text.strip_prefix("tel:").unwrap_or(&text).to_string(),
                ext: None,
                types,
                pref,
            }),
            "email" => card.emails.push(Email {
                address: text,
                types,
                pref,
            }),
            "impp" => card.impps.push(Impp {
                uri: text,
                types,
                pref,
            }),
            "url" => card.urls.push(Url {
                uri: text,
                types,
                pref,
            }),
            "lang" => card.languages.push(LanguagePref {
                tag: text,
                types,
                pref,
            }),
            "key" => card.keys.push(BinaryEntry {
                data: binary_from_text(&text),
                pref,
            }),
            "related" => card.related.push(Related {
                value: text,
                relation_type: types.into_iter().next(),
                pref,
            }),
            "member" => card.members.push(UriEntry { uri: text, pref }),
            "xml" => card.xml.push(UriEntry { uri: text, pref }),
            "source" => card.sources.push(UriEntry { uri: text, pref }),
            "fburl" => card.free_busy_urls.push(UriEntry { uri: text, pref }),
            "caluri" => card.calendar_urls.push(UriEntry { uri: text, pref }),
            "caladruri" => card.calendar_address_urls.push(UriEntry { uri: text, pref }),
            "categories" => card.categories.extend(
                prop.all_value_texts("text")
                    .into_iter()
                    .filter(|s| !s.is_empty()),
            ),
            "tz" => card.timezone = Some(text),
            "title" => card.title = Some(text),
            "role" => card.role = Some(text),
            "note" => card.note = Some(text),
            "prodid" => card.product_id = Some(text),
            "uid" => card.uid = Some(text),
            "geo" => card.geo = GeoLocation::parse(&text),
            "org" => card.organization = Some(organization_from_element(prop)),
            "logo" => card.logo = Some(binary_from_text(&text)),
            "sound" => card.sound = Some(binary_from_text(&text)),
            "kind" => card.kind = text.parse().ok(),
            "clientpidmap" => {
                let texts = prop.all_value_texts("text");
                let uris = prop.all_value_texts("uri");
                if let (Some(pid), Some(uri)) = (texts.first(), uris.first()) {
                    if let Ok(pid) = pid.parse() {
                        card.client_pid_map.push((pid, uri.clone()));
                    }
                }
            }
            name if !name.is_empty() => card.extended_properties.push(crate::model::ExtendedProperty {
                name: name.to_string(),
                params: crate::parameters::Parameters::new(),
                value: text,
            }),
            _ => {}
        }
    }

    card
}

fn binary_from_text(text: &str) -> BinaryData {
    BinaryData::from_data_uri(text).unwrap_or_else(|| BinaryData::Uri {
        uri: text.to_string(),
        media_type: None,
    })
}

fn structured_name_from_element(prop: &Element) -> StructuredName {
    let surname = prop.child("surname");
    let given = prop.child("given");
    if surname.is_none() && given.is_none() {
        if let Some(text_child) = prop.child("text") {
            return StructuredName::Raw(text_child.text.clone());
        }
    }
    StructuredName::Structured {
        family: comma_split(prop.child("surname")),
        given: comma_split(prop.child("given")),
        additional: comma_split(prop.child("additional")),
        prefixes: comma_split(prop.child("prefix")),
        suffixes: comma_split(prop.child("suffix")),
    }
}

fn structured_address_from_element(prop: &Element) -> StructuredAddress {
    if prop.children.iter().all(|c| c.name == "text" || c.name == "parameters") {
        if let Some(text_child) = prop.child("text") {
            return StructuredAddress::Raw(text_child.text.clone());
        }
    }
    StructuredAddress::Structured {
        po_box: comma_split(prop.child("pobox")),
        extended: comma_split(prop.child("ext")),
        street: comma_split(prop.child("street")),
        city: comma_split(prop.child("locality")),
        region: comma_split(prop.child("region")),
        postal_code: comma_split(prop.child("code")),
        country: comma_split(prop.child("country")),
    }
}

fn organization_from_element(prop: &Element) -> Organization {
    let texts = prop.all_value_texts("text");
    let mut iter = texts.into_iter();
    match iter.next() {
        Some(name) => Organization::Structured {
            name,
            units: iter.collect(),
        },
        None => Organization::Raw(String::new()),
    }
}

fn comma_split(element: Option<&Element>) -> Vec<String> {
    match element {
        Some(e) if !e.text.is_empty() => e.text.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}
