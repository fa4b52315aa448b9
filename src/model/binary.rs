//! Binary-valued properties (`PHOTO`, `LOGO`, `SOUND`, `KEY`): either
//! embedded base64 bytes or a URI reference.

use base64::{engine::general_purpose::STANDARD, Engine};

/// A binary property value. Exactly one of the two shapes is ever
/// populated — mixing both tends to accumulate partial state during
/// parsing, so the inline bytes and the URI reference are kept as
/// distinct variants rather than two optional fields on one struct.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryData {
    /// Bytes embedded directly in the vCard, with an optional media
    /// type (MIME type, e.g. `image/png`).
    Inline {
        /// The decoded payload.
        bytes: Vec<u8>,
        /// The media type, if known.
        media_type: Option<String>,
    },
    /// A reference to externally-hosted content.
    Uri {
        /// The URI text.
        uri: String,
        /// The media type, if known (from `MEDIATYPE=` or a `TYPE=`
        /// MIME-shaped value).
        media_type: Option<String>,
    },
}

const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

impl BinaryData {
    /// `true` if this holds inline bytes.
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }

    /// `true` if this holds a URI reference.
    pub fn is_uri(&self) -> bool {
        matches!(self, Self::Uri { .. })
    }

    /// The media type, defaulting to `application/octet-stream` when
    /// unset, mirroring [`BinaryData::data_uri`]'s default.
    pub fn media_type(&self) -> &str {
        match self {
            Self::Inline { media_type, .. } | Self::Uri { media_type, .. } => {
                media_type.as_deref().unwrap_or(DEFAULT_MEDIA_TYPE)
            }
        }
    }

    /// Render as a `data:` URI. Only defined for the inline shape.
    pub fn data_uri(&self) -> Option<String> {
        match self {
            Self::Inline { bytes, .. } => {
                Some(format!("data:{};base64,{}", self.media_type(), STANDARD.encode(bytes)))
            }
            Self::Uri { .. } => None,
        }
    }

    /// Parse a `data:<media>;base64,<payload>` URI into an inline
    /// [`BinaryData`]. Returns `None` if `uri` is not a `data:` URI or
    /// is not base64-encoded.
    pub fn from_data_uri(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix("data:")?;
        let (header, payload) = rest.split_once(',')?;
        let media_type = header.strip_suffix(";base64")?;
        let bytes = STANDARD.decode(payload).ok()?;
        Some(Self::Inline {
            bytes,
            media_type: if media_type.is_empty() {
                None
            } else {
                Some(media_type.to_string())
            },
        })
    }

    /// Decode raw base64 text (whitespace stripped) into inline bytes
    /// with the given media type hint.
    pub fn from_base64(value: &str, media_type: Option<String>) -> Result<Self, base64::DecodeError> {
        let cleaned: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD.decode(cleaned)?;
        Ok(Self::Inline { bytes, media_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_roundtrip() {
        let original = BinaryData::Inline {
            bytes: vec![1, 2, 3, 4, 5],
            media_type: Some("image/png".to_string()),
        };
        let uri = original.data_uri().unwrap();
        let decoded = BinaryData::from_data_uri(&uri).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn default_media_type() {
        let data = BinaryData::Inline {
            bytes: vec![0],
            media_type: None,
        };
        assert_eq!(data.media_type(), "application/octet-stream");
    }

    #[test]
    fn whitespace_tolerant_base64() {
        let value = "aGVs\r\n bG8=";
        let data = BinaryData::from_base64(value, None).unwrap();
        if let BinaryData::Inline { bytes, .. } = data {
            assert_eq!(bytes, b"hello");
        } else {
            panic!("expected inline");
        }
    }

    #[test]
    fn uri_shape_has_no_data_uri() {
        let data = BinaryData::Uri {
            uri: "https://example.com/p.png".to_string(),
            media_type: None,
        };
        assert!(data.data_uri().is_none());
    }
}
