//! The `GEO` property value.

use std::fmt;

/// A geographic coordinate: decimal-degree latitude/longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoLocation {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl GeoLocation {
    /// Parse either the vCard 4.0 `geo:lat,lon` URI form or the legacy
    /// (2.1/3.0) bare `lat;lon` form.
    pub fn parse(value: &str) -> Option<Self> {
        let body = value.strip_prefix("geo:").unwrap_or(value);
        let (lat, lon) = if body.contains(',') {
            body.split_once(',')?
        } else {
            body.split_once(';')?
        };
        // A `geo:` URI may carry a third altitude component and
        // uncertainty parameters after `;`; only lat/lon are modeled.
        let lon = lon.split(&[',', ';'][..]).next()?;
        Some(Self {
            latitude: lat.trim().parse().ok()?,
            longitude: lon.trim().parse().ok()?,
        })
    }

    /// Render as a `geo:lat,lon` URI (vCard 4.0 form).
    pub fn to_uri_string(&self) -> String {
        format!("geo:{},{}", self.latitude, self.longitude)
    }

    /// Render as the legacy `lat;lon` form (vCard 2.1/3.0).
    pub fn to_legacy_string(&self) -> String {
        format!("{};{}", self.latitude, self.longitude)
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uri_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_geo_uri() {
        let geo = GeoLocation::parse("geo:37.386013,-122.082932").unwrap();
        assert_eq!(geo.latitude, 37.386013);
        assert_eq!(geo.longitude, -122.082932);
    }

    #[test]
    fn parses_legacy_form() {
        let geo = GeoLocation::parse("37.386013;-122.082932").unwrap();
        assert_eq!(geo.latitude, 37.386013);
        assert_eq!(geo.longitude, -122.082932);
    }

    #[test]
    fn rejects_garbage() {
        assert!(GeoLocation::parse("not a geo value").is_none());
    }
}
