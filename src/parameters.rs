//! Parameter model: an ordered, case-insensitive multimap of content-line
//! parameters plus the list of vCard 2.1 "bare" type tokens, with typed
//! convenience accessors layered on top.

use std::fmt;

/// Parameter names recognized as `TYPE`-equivalent when they appear as a
/// bare (non-`NAME=`) token on a vCard 2.1 property, per §4.D.
const BARE_TYPE_WHITELIST: &[&str] = &[
    "WORK", "HOME", "CELL", "VOICE", "FAX", "PAGER", "TEXTPHONE", "TEXT", "MSG", "POSTAL",
    "PARCEL", "DOM", "INTL", "PREF", "INTERNET", "X400", "BBS", "MODEM", "CAR", "ISDN", "PCS",
    "VIDEO",
];

/// Ordered, case-insensitive multimap of a content line's parameters.
///
/// Insertion order of distinct parameter names is preserved so a
/// round-tripped vCard's parameter order matches its source; values
/// within a parameter preserve the comma-split order from the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters {
    entries: Vec<(String, Vec<String>)>,
    /// vCard 2.1 bare type tokens (e.g. `WORK` in `TEL;WORK:...`), stored
    /// in their original casing.
    bare: Vec<String>,
}

impl Parameters {
    /// An empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this parameter set carries nothing at all (no named
    /// parameters and no bare tokens).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.bare.is_empty()
    }

    /// Append `value` under `name` (case-folded to uppercase for
    /// storage), creating the entry if this is the first value seen for
    /// that name.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let key = name.to_uppercase();
        if let Some((_, values)) = self.entries.iter_mut().find(|(n, _)| n == &key) {
            values.push(value.into());
        } else {
            self.entries.push((key, vec![value.into()]));
        }
    }

    /// Append several values under `name` in one call (e.g. a
    /// comma-split `TYPE=a,b`).
    pub fn insert_many(&mut self, name: &str, values: impl IntoIterator<Item = String>) {
        for value in values {
            self.insert(name, value);
        }
    }

    /// Record a vCard 2.1 bare type token.
    pub fn push_bare(&mut self, token: impl Into<String>) {
        self.bare.push(token.into());
    }

    /// All values recorded under `name` (case-insensitive), in
    /// insertion order, or an empty slice if absent.
    pub fn get_all(&self, name: &str) -> &[String] {
        let key = name.to_uppercase();
        self.entries
            .iter()
            .find(|(n, _)| n == &key)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    /// The first value recorded under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name).first().map(String::as_str)
    }

    /// Iterate every (name, values) pair in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// The bare (non-`NAME=`) tokens recorded for this property.
    pub fn bare_tokens(&self) -> &[String] {
        &self.bare
    }

    /// Concatenation of `TYPE=` values and lowercased bare tokens drawn
    /// from the vCard 2.1 type whitelist, per §4.D. This is the
    /// canonical "what types does this entry carry" accessor used by
    /// emitters and by [`Parameters::is_preferred`].
    pub fn type_values(&self) -> Vec<String> {
        let mut values: Vec<String> = self
            .get_all("TYPE")
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        for token in &self.bare {
            if BARE_TYPE_WHITELIST.contains(&token.to_uppercase().as_str()) {
                values.push(token.to_lowercase());
            }
        }
        values
    }

    /// The integer value of `PREF=`, if present and well-formed.
    pub fn pref(&self) -> Option<u8> {
        self.get("PREF").and_then(|v| v.parse().ok())
    }

    /// `true` iff `PREF` is 1 or unset-but-a-`pref`-type-token is
    /// present (vCard 2.1's informal preference marker), per §4.D.
    pub fn is_preferred(&self) -> bool {
        match self.pref() {
            Some(p) => p <= 1,
            None => self
                .type_values()
                .iter()
                .any(|t| t.eq_ignore_ascii_case("pref")),
        }
    }

    /// The `VALUE=` parameter, uppercased.
    pub fn value_type(&self) -> Option<String> {
        self.get("VALUE").map(|s| s.to_uppercase())
    }

    /// The `ENCODING=` parameter, uppercased.
    pub fn encoding(&self) -> Option<String> {
        self.get("ENCODING").map(|s| s.to_uppercase())
    }

    /// `true` iff `ENCODING` denotes base64 (`BASE64` on 3.0/4.0 or the
    /// single-letter `b` used by 2.1), or `VALUE=BINARY` is set.
    pub fn is_base64_encoded(&self) -> bool {
        matches!(self.encoding().as_deref(), Some("BASE64") | Some("B"))
            || self.value_type().as_deref() == Some("BINARY")
    }

    /// The `CHARSET=` parameter (vCard 2.1 only).
    pub fn charset(&self) -> Option<&str> {
        self.get("CHARSET")
    }

    /// The `LANGUAGE=` parameter.
    pub fn language(&self) -> Option<&str> {
        self.get("LANGUAGE")
    }

    /// The `MEDIATYPE=` parameter (4.0) or, failing that, a `TYPE=`
    /// value that parses as a MIME type (2.1/3.0 convention for binary
    /// properties).
    pub fn media_type(&self) -> Option<&str> {
        self.get("MEDIATYPE").or_else(|| {
            self.get_all("TYPE")
                .iter()
                .map(String::as_str)
                .find(|t| t.contains('/'))
        })
    }

    /// The `ALTID=` parameter.
    pub fn alt_id(&self) -> Option<&str> {
        self.get("ALTID")
    }

    /// The `SORT-AS=` parameter values (comma-split).
    pub fn sort_as(&self) -> &[String] {
        self.get_all("SORT-AS")
    }

    /// The `GEO=` parameter, as used on `ADR` to attach a coordinate.
    pub fn geo(&self) -> Option<&str> {
        self.get("GEO")
    }

    /// The `TZ=` parameter, as used on `ADR` to attach a timezone.
    pub fn tz(&self) -> Option<&str> {
        self.get("TZ")
    }

    /// The `LABEL=` parameter (vCard 3.0 address label; 4.0 uses a
    /// standalone `LABEL` property instead, see §9 open questions).
    pub fn label(&self) -> Option<&str> {
        self.get("LABEL")
    }

    /// The `PID=` parameter values.
    pub fn pid(&self) -> &[String] {
        self.get_all("PID")
    }

    /// The `CALSCALE=` parameter.
    pub fn calscale(&self) -> Option<&str> {
        self.get("CALSCALE")
    }
}

impl fmt::Display for Parameters {
    /// Render as a `;`-prefixed run of `NAME=value[,value…]` segments,
    /// suitable for appending directly after a property name in V30/V40
    /// text. V21 bare-form rendering is handled separately by the text
    /// emitter since it depends on the target version.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, values) in &self.entries {
            write!(f, ";{}=", name)?;
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                if value.chars().any(|c| ":;,\n".contains(c)) {
                    write!(f, "\"{}\"", value)?;
                } else {
                    write!(f, "{}", value)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_values_merges_bare_and_named() {
        let mut p = Parameters::new();
        p.insert("TYPE", "work");
        p.push_bare("VOICE");
        p.push_bare("UNKNOWNX");
        let values = p.type_values();
        assert_eq!(values, vec!["work".to_string(), "voice".to_string()]);
    }

    #[test]
    fn pref_threshold() {
        let mut p = Parameters::new();
        assert!(!p.is_preferred());
        p.insert("PREF", "1");
        assert!(p.is_preferred());

        let mut p2 = Parameters::new();
        p2.push_bare("PREF");
        assert!(p2.is_preferred());
    }

    #[test]
    fn display_quotes_special_values() {
        let mut p = Parameters::new();
        p.insert("LABEL", "a;b");
        assert_eq!(p.to_string(), r#";LABEL="a;b""#);
    }

    #[test]
    fn media_type_falls_back_to_type_mime() {
        let mut p = Parameters::new();
        p.insert("TYPE", "image/png");
        assert_eq!(p.media_type(), Some("image/png"));
    }
}
