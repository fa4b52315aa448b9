//! jCard (RFC 7095): the JSON array projection of a vCard.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::FormatError;
use crate::model::{
    Address, BinaryData, BinaryEntry, DateOrDateTime, Email, ExtendedProperty, Gender,
    GeoLocation, Impp, Kind, LanguagePref, Organization, Related, StructuredAddress,
    StructuredName, Telephone, Url, UriEntry, VCard,
};
use crate::version::Version;

/// Converts [`VCard`] values to and from the jCard JSON array form.
#[derive(Debug, Clone, Default)]
pub struct JCardFormatter;

impl JCardFormatter {
    /// A new formatter.
    pub fn new() -> Self {
        Self
    }

    /// Serialize a single vCard to its jCard `["vcard", [...]]` form.
    pub fn to_json(&self, card: &VCard) -> Result<Value, FormatError> {
        debug!(version = %card.version, "converting vcard to jcard");
        card.validate()?;
        let mut properties: Vec<Value> = Vec::new();

        properties.push(prop("version", json!({}), "text", json!(card.version.as_str())));
        properties.push(prop("fn", json!({}), "text", json!(card.formatted_name)));

        if let Some(name) = &card.name {
            properties.push(prop("n", json!({}), "text", structured_name_json(name)));
        }
        for nickname in &card.nicknames {
            properties.push(prop("nickname", json!({}), "text", json!(nickname)));
        }
        for photo in &card.photos {
            properties.push(binary_prop("photo", &photo.data, photo.pref));
        }
        if let Some(bday) = &card.birthday {
            properties.push(prop("bday", json!({}), "date-and-or-time", json!(bday.to_date_time_string())));
        }
        if let Some(anniversary) = &card.anniversary {
            properties.push(prop(
                "anniversary",
                json!({}),
                "date-and-or-time",
                json!(anniversary.to_date_time_string()),
            ));
        }
        if let Some(rev) = &card.revision {
            properties.push(prop("rev", json!({}), "timestamp", json!(rev.to_date_time_string())));
        }
        if let Some(gender) = &card.gender {
            properties.push(prop("gender", json!({}), "text", json!(gender.to_value())));
        }
        for addr in &card.addresses {
            let mut params = Map::new();
            insert_types(&mut params, &addr.types);
            insert_pref(&mut params, addr.pref);
            if let Some(geo) = &addr.geo {
                params.insert("geo".to_string(), json!(geo));
            }
            if let Some(tz) = &addr.tz {
                params.insert("tz".to_string(), json!(tz));
            }
            if let Some(label) = &addr.label {
                params.insert("label".to_string(), json!(label));
            }
            properties.push(prop(
                "adr",
                Value::Object(params),
                "text",
                structured_address_json(&addr.value),
            ));
        }
        for tel in &card.telephones {
            let mut params = Map::new();
            insert_types(&mut params, &tel.types);
            insert_pref(&mut params, tel.pref);
            properties.push(prop("tel", Value::Object(params), "uri", json!(tel.to_uri())));
        }
        for email in &card.emails {
            let mut params = Map::new();
            insert_types(&mut params, &email.types);
            insert_pref(&mut params, email.pref);
            properties.push(prop("email", Value::Object(params), "text", json!(email.address)));
        }
        for impp in &card.impps {
            let mut params = Map::new();
            insert_types(&mut params, &impp.types);
            insert_pref(&mut params, impp.pref);
            properties.push(prop("impp", Value::Object(params), "uri", json!(impp.uri)));
        }
        for url in &card.urls {
            let mut params = Map::new();
            insert_types(&mut params, &url.types);
            insert_pref(&mut params, url.pref);
            properties.push(prop("url", Value::Object(params), "uri", json!(url.uri)));
        }
        for lang in &card.languages {
            let mut params = Map::new();
            insert_types(&mut params, &lang.types);
            insert_pref(&mut params, lang.pref);
            properties.push(prop(
                "lang",
                Value::Object(params),
                "language-tag",
                json!(lang.tag),
            ));
        }
        for key in &card.keys {
            properties.push(binary_prop("key", &key.data, key.pref));
        }
        for related in &card.related {
            let mut params = Map::new();
            if let Some(t) = &related.relation_type {
                params.insert("type".to_string(), json!(t));
            }
            insert_pref(&mut params, related.pref);
            properties.push(prop("related", Value::Object(params), "uri", json!(related.value)));
        }
        for member in &card.members {
            properties.push(uri_entry_prop("member", member));
        }
        for xml in &card.xml {
            properties.push(uri_entry_prop("xml", xml));
        }
        for source in &card.sources {
            properties.push(uri_entry_prop("source", source));
        }
        for url in &card.free_busy_urls {
            properties.push(uri_entry_prop("fburl", url));
        }
        for url in &card.calendar_urls {
            properties.push(uri_entry_prop("caluri", url));
        }
        for url in &card.calendar_address_urls {
            properties.push(uri_entry_prop("caladruri", url));
        }
        if !card.categories.is_empty() {
            let value = if card.categories.len() == 1 {
                json!(card.categories[0])
            } else {
                json!(card.categories)
            };
            properties.push(prop("categories", json!({}), "text", value));
        }
        if let Some(tz) = &card.timezone {
            properties.push(prop("tz", json!({}), "utc-offset", json!(tz)));
        }
        if let Some(title) = &card.title {
            properties.push(prop("title", json!({}), "text", json!(title)));
        }
        if let Some(role) = &card.role {
            properties.push(prop("role", json!({}), "text", json!(role)));
        }
        if let Some(note) = &card.note {
            properties.push(prop("note", json!({}), "text", json!(note)));
        }
        if let Some(prodid) = &card.product_id {
            properties.push(prop("prodid", json!({}), "text", json!(prodid)));
        }
        if let Some(uid) = &card.uid {
            properties.push(prop("uid", json!({}), "text", json!(uid)));
        }
        if let Some(geo) = &card.geo {
            properties.push(prop("geo", json!({}), "uri", json!(geo.to_uri_string())));
        }
        if let Some(org) = &card.organization {
            properties.push(prop("org", json!({}), "text", organization_json(org)));
        }
        if let Some(logo) = &card.logo {
            properties.push(binary_prop("logo", logo, None));
        }
        if let Some(sound) = &card.sound {
            properties.push(binary_prop("sound", sound, None));
        }
        if let Some(kind) = &card.kind {
            properties.push(prop("kind", json!({}), "text", json!(kind.to_string())));
        }
        for (pid, uri) in &card.client_pid_map {
            properties.push(prop("clientpidmap", json!({}), "text", json!([pid, uri])));
        }
        for ext in &card.extended_properties {
            properties.push(prop(
                &ext.name.to_lowercase(),
                params_to_json(ext),
                "unknown",
                json!(ext.value),
            ));
        }

        Ok(json!(["vcard", properties]))
    }

    /// Parse a single jCard `["vcard", [...]]` value.
    pub fn from_json(&self, value: &Value) -> Result<VCard, FormatError> {
        debug!("parsing jcard into vcard");
        let array = value.as_array().ok_or(FormatError::NotVCard)?;
        if array.len() != 2 || array[0].as_str() != Some("vcard") {
            return Err(FormatError::NotVCard);
        }
        let properties = array[1].as_array().ok_or(FormatError::MissingProperties)?;

        let mut card = VCard::default();
        for entry in properties {
            let parts = entry.as_array().ok_or_else(|| {
                FormatError::InvalidArray(entry.to_string())
            })?;
            if parts.len() < 4 {
                return Err(FormatError::InvalidArray(entry.to_string()));
            }
            let name = parts[0].as_str().unwrap_or_default().to_lowercase();
            let params = parts[1].as_object().cloned().unwrap_or_default();
            let value = &parts[3];

            self.dispatch(&mut card, &name, &params, value);
        }
        Ok(card)
    }

    fn dispatch(&self, card: &mut VCard, name: &str, params: &Map<String, Value>, value: &Value) {
        let text = value.as_str().map(str::to_string).unwrap_or_default();
        let types = param_types(params);
        let pref = param_pref(params);

        match name {
            "version" => card.version = Version::parse(&text).unwrap_or_default(),
            "fn" => card.formatted_name = text,
            "n" => card.name = Some(structured_name_from_json(value)),
            "nickname" => card.nicknames.push(text),
            "photo" => card.photos.push(BinaryEntry {
                data: binary_from_json(value),
                pref,
            }),
            "bday" => card.birthday = DateOrDateTime::try_parse(&text),
            "anniversary" => card.anniversary = DateOrDateTime::try_parse(&text),
            "rev" => card.revision = DateOrDateTime::try_parse(&text),
            "gender" => card.gender = Some(Gender::parse(&text)),
            "adr" => card.addresses.push(Address {
                value: structured_address_from_json(value),
                types,
                pref,
                geo: params.get("geo").and_then(|v| v.as_str()).map(str::to_string),
                tz: params.get("tz").and_then(|v| v.as_str()).map(str::to_string),
                label: params.get("label").and_then(|v| v.as_str()).map(str::to_string),
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
                data: binary_from_json(value),
                pref,
            }),
            "related" => card.related.push(Related {
                value: text,
                relation_type: params.get("type").and_then(|v| v.as_str()).map(str::to_string),
                pref,
            }),
            "member" => card.members.push(UriEntry { uri: text, pref }),
            "xml" => card.xml.push(UriEntry { uri: text, pref }),
            "source" => card.sources.push(UriEntry { uri: text, pref }),
            "fburl" => card.free_busy_urls.push(UriEntry { uri: text, pref }),
            "caluri" => card.calendar_urls.push(UriEntry { uri: text, pref }),
            "caladruri" => card.calendar_address_urls.push(UriEntry { uri: text, pref }),
            "categories" => {
                if let Some(arr) = value.as_array() {
                    card.categories
                        .extend(arr.iter().filter_map(|v| v.as_str().map(str::to_string)));
                } else if !text.is_empty() {
                    card.categories.push(text);
                }
            }
            "tz" => card.timezone = Some(text),
            "title" => card.title = Some(text),
            "role" => card.role = Some(text),
            "note" => card.note = Some(text),
            "prodid" => card.product_id = Some(text),
            "uid" => card.uid = Some(text),
            "geo" => card.geo = GeoLocation::parse(&text),
            "org" => card.organization = Some(organization_from_json(value)),
            "logo" => card.logo = Some(binary_from_json(value)),
            "sound" => card.sound = Some(binary_from_json(value)),
            "kind" => card.kind = text.parse().ok(),
            "clientpidmap" => {
                if let Some(arr) = value.as_array() {
                    if let (Some(pid), Some(uri)) = (
                        arr.first().and_then(|v| v.as_u64()),
                        arr.get(1).and_then(|v| v.as_str()),
                    ) {
                        card.client_pid_map.push((pid as u32, uri.to_string()));
                    }
                }
            }
            other if other.starts_with("x-") => card.extended_properties.push(ExtendedProperty {
                name: other.to_string(),
                params: crate::parameters::Parameters::new(),
                value: text,
            }),
            _ => {}
        }
    }
}

fn prop(name: &str, params: Value, value_type: &str, value: Value) -> Value {
    json!([name, params, value_type, value])
}

fn params_to_json(ext: &ExtendedProperty) -> Value {
    let mut map = Map::new();
    for (name, values) in ext.params.iter() {
        let key = name.to_lowercase();
        let value = if values.len() == 1 {
            json!(values[0])
        } else {
            json!(values)
        };
        map.insert(key, value);
    }
    Value::Object(map)
}

fn insert_types(params: &mut Map<String, Value>, types: &[String]) {
    if types.is_empty() {
        return;
    }
    let value = if types.len() == 1 {
        json!(types[0])
    } else {
        json!(types)
    };
    params.insert("type".to_string(), value);
}

fn insert_pref(params: &mut Map<String, Value>, pref: Option<u8>) {
    if let Some(pref) = pref {
        params.insert("pref".to_string(), json!(pref));
    }
}

fn param_types(params: &Map<String, Value>) -> Vec<String> {
    match params.get("type") {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(arr)) => arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect(),
        _ => Vec::new(),
    }
}

fn param_pref(params: &Map<String, Value>) -> Option<u8> {
    params.get("pref").and_then(|v| v.as_u64()).map(|n| n as u8)
}

fn uri_entry_prop(name: &str, entry: &UriEntry) -> Value {
    let mut params = Map::new();
    insert_pref(&mut params, entry.pref);
    prop(name, Value::Object(params), "uri", json!(entry.uri))
}

fn binary_prop(name: &str, data: &BinaryData, pref: Option<u8>) -> Value {
    let mut params = Map::new();
    insert_pref(&mut params, pref);
    let uri = data.data_uri().unwrap_or_else(|| match data {
        BinaryData::Uri { uri, .. } => uri.clone(),
        BinaryData::Inline { .. } => String::new(),
    });
    prop(name, Value::Object(params), "uri", json!(uri))
}

fn binary_from_json(value: &Value) -> BinaryData {
    let text = value.as_str().unwrap_or_default();
    BinaryData::from_data_uri(text).unwrap_or_else(|| BinaryData::Uri {
        uri: text.to_string(),
        media_type: None,
    })
}

fn structured_name_json(name: &StructuredName) -> Value {
    match name {
        StructuredName::Raw(s) => json!(s),
        StructuredName::Structured {
            family,
            given,
            additional,
            prefixes,
            suffixes,
        } => json!([
            join_or_empty(family),
            join_or_empty(given),
            join_or_empty(additional),
            join_or_empty(prefixes),
            join_or_empty(suffixes),
        ]),
    }
}

fn structured_name_from_json(value: &Value) -> StructuredName {
    match value {
        Value::String(s) => StructuredName::Raw(s.clone()),
        Value::Array(components) => StructuredName::Structured {
            family: component_list(components, 0),
            given: component_list(components, 1),
            additional: component_list(components, 2),
            prefixes: component_list(components, 3),
            suffixes: component_list(components, 4),
        },
        _ => StructuredName::Raw(String::new()),
    }
}

fn structured_address_json(addr: &StructuredAddress) -> Value {
    match addr {
        StructuredAddress::Raw(s) => json!(s),
        StructuredAddress::Structured {
            po_box,
            extended,
            street,
            city,
            region,
            postal_code,
            country,
        } => json!([
            join_or_empty(po_box),
            join_or_empty(extended),
            join_or_empty(street),
            join_or_empty(city),
            join_or_empty(region),
            join_or_empty(postal_code),
            join_or_empty(country),
        ]),
    }
}

fn structured_address_from_json(value: &Value) -> StructuredAddress {
    match value {
        Value::String(s) => StructuredAddress::Raw(s.clone()),
        Value::Array(components) => StructuredAddress::Structured {
            po_box: component_list(components, 0),
            extended: component_list(components, 1),
            street: component_list(components, 2),
            city: component_list(components, 3),
            region: component_list(components, 4),
            postal_code: component_list(components, 5),
            country: component_list(components, 6),
        },
        _ => StructuredAddress::Raw(String::new()),
    }
}

fn organization_json(org: &Organization) -> Value {
    match org {
        Organization::Raw(s) => json!(s),
        Organization::Structured { name, units } => {
            let mut values = vec![json!(name)];
            values.extend(units.iter().map(|u| json!(u)));
            Value::Array(values)
        }
    }
}

fn organization_from_json(value: &Value) -> Organization {
    match value {
        Value::String(s) => Organization::Raw(s.clone()),
        Value::Array(components) => {
            let mut iter = components.iter();
            let name = iter.next().and_then(|v| v.as_str()).unwrap_or_default().to_string();
            let units = iter.filter_map(|v| v.as_str().map(str::to_string)).collect();
            Organization::Structured { name, units }
        }
        _ => Organization::Raw(String::new()),
    }
}

fn join_or_empty(values: &[String]) -> Value {
    if values.len() == 1 {
        json!(values[0])
    } else if values.is_empty() {
        json!("")
    } else {
        json!(values.join(","))
    }
}

fn component_list(components: &[Value], index: usize) -> Vec<String> {
    match components.get(index) {
        Some(Value::String(s)) if !s.is_empty() => s.split(',').map(str::to_string).collect(),
        Some(Value::Array(arr)) => arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect(),
        _ => Vec::new(),
    }
}
