//! The `GENDER` property value (RFC 6350 §6.2.7).

use std::fmt;

/// The `GENDER` sex component: a fixed letter, or unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sex {
    Male,
    Female,
    Other,
    None,
    Unknown,
}

impl Sex {
    fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'M' => Some(Self::Male),
            'F' => Some(Self::Female),
            'O' => Some(Self::Other),
            'N' => Some(Self::None),
            'U' => Some(Self::Unknown),
            _ => None,
        }
    }

    fn as_letter(&self) -> char {
        match self {
            Self::Male => 'M',
            Self::Female => 'F',
            Self::Other => 'O',
            Self::None => 'N',
            Self::Unknown => 'U',
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_letter())
    }
}

/// `GENDER:<sex>;<identity>` — a fixed sex letter plus an optional
/// free-form gender identity text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gender {
    /// The sex component, if the first part parsed as a known letter.
    pub sex: Option<Sex>,
    /// The free-form identity text after the first `;`, if any.
    pub identity: Option<String>,
}

impl Gender {
    /// Parse a `GENDER` value: split on the first `;` into the sex letter
    /// and the free-form identity.
    pub fn parse(value: &str) -> Self {
        let (sex_part, identity) = match value.split_once(';') {
            Some((s, i)) => (s, Some(i.to_string())),
            None => (value, None),
        };
        let sex = sex_part.chars().next().and_then(Sex::from_letter);
        let identity = identity.filter(|s| !s.is_empty());
        Self { sex, identity }
    }

    /// Render back to the `GENDER` value text.
    pub fn to_value(&self) -> String {
        let sex = self.sex.map(|s| s.as_letter().to_string()).unwrap_or_default();
        match &self.identity {
            Some(identity) => format!("{};{}", sex, identity),
            None => sex,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sex_only() {
        let g = Gender::parse("F");
        assert_eq!(g.sex, Some(Sex::Female));
        assert_eq!(g.identity, None);
        assert_eq!(g.to_value(), "F");
    }

    #[test]
    fn parses_sex_and_identity() {
        let g = Gender::parse("O;intersex");
        assert_eq!(g.sex, Some(Sex::Other));
        assert_eq!(g.identity.as_deref(), Some("intersex"));
        assert_eq!(g.to_value(), "O;intersex");
    }

    #[test]
    fn identity_only() {
        let g = Gender::parse(";nonbinary");
        assert_eq!(g.sex, None);
        assert_eq!(g.identity.as_deref(), Some("nonbinary"));
    }
}
