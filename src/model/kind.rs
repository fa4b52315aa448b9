//! The `KIND` property value (RFC 6350 §6.1.4).

use std::fmt;
use std::str::FromStr;

/// What sort of entity a vCard describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Kind {
    #[default]
    Individual,
    Group,
    Organization,
    Location,
}

impl FromStr for Kind {
    type Err = ();

    /// `org` and `organization` both map to [`Kind::Organization`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "individual" => Ok(Self::Individual),
            "group" => Ok(Self::Group),
            "org" | "organization" => Ok(Self::Organization),
            "location" => Ok(Self::Location),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Individual => "individual",
            Self::Group => "group",
            Self::Organization => "organization",
            Self::Location => "location",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn org_and_organization_both_parse() {
        assert_eq!("org".parse::<Kind>().unwrap(), Kind::Organization);
        assert_eq!("organization".parse::<Kind>().unwrap(), Kind::Organization);
    }

    #[test]
    fn case_insensitive() {
        assert_eq!("Group".parse::<Kind>().unwrap(), Kind::Group);
    }

    #[test]
    fn unknown_rejected() {
        assert!("robot".parse::<Kind>().is_err());
    }

    #[test]
    fn display_roundtrip() {
        assert_eq!(Kind::Location.to_string(), "location");
    }
}
