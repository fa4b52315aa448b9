//! `DateOrDateTime`: the value type behind `BDAY`, `ANNIVERSARY` and `REV`.
//!
//! vCard 4.0 allows dates with the year, the month, or the day omitted
//! (`--1201` for "December 1st, year unknown"), which the `time` crate's
//! `Date` cannot represent. Components are therefore stored as independent
//! optional fields rather than wrapped around `time::Date`.

use std::fmt;

/// A calendar date/time with every component independently optional, plus
/// an optional UTC offset in minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateOrDateTime {
    /// Four-digit year.
    pub year: Option<i32>,
    /// Month, 1–12.
    pub month: Option<u8>,
    /// Day of month, 1–31.
    pub day: Option<u8>,
    /// Hour, 0–23.
    pub hour: Option<u8>,
    /// Minute, 0–59.
    pub minute: Option<u8>,
    /// Second, 0–60 (60 to allow a leap second).
    pub second: Option<u8>,
    /// UTC offset in minutes, e.g. `-300` for `-05:00`. `Some(0)` is `Z`.
    pub utc_offset_minutes: Option<i32>,
}

impl DateOrDateTime {
    /// `true` if any time component is set.
    pub fn has_time(&self) -> bool {
        self.hour.is_some() || self.minute.is_some() || self.second.is_some()
    }

    /// Parse a vCard date/date-time/timestamp value (RFC 6350 §4.3.1/§4.3.4).
    /// Accepts full `YYYYMMDD`, partial `--MMDD`/`---DD`/`YYYY-MM`, and a
    /// `THHMMSS[Z|±HHMM]` time suffix. Returns `None` if nothing recognizable
    /// is found — callers treat that as a lenient "store nothing" case.
    pub fn try_parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let (date_part, time_part) = match value.split_once('T') {
            Some((d, t)) => (d, Some(t)),
            None => (value, None),
        };

        let mut result = Self::default();
        if !date_part.is_empty() {
            parse_date_part(date_part, &mut result)?;
        }
        if let Some(time_part) = time_part {
            parse_time_part(time_part, &mut result)?;
        }
        if result == Self::default() || !result.is_plausible() {
            return None;
        }
        Some(result)
    }

    /// Cheap range sanity check (not full calendar validation, e.g. leap
    /// years and per-month day counts are not checked) used to reject
    /// obviously malformed input such as a month of `99`.
    fn is_plausible(&self) -> bool {
        self.month.map_or(true, |m| (1..=12).contains(&m))
            && self.day.map_or(true, |d| (1..=31).contains(&d))
            && self.hour.map_or(true, |h| h <= 23)
            && self.minute.map_or(true, |m| m <= 59)
            && self.second.map_or(true, |s| s <= 60)
    }

    /// Render the date components: `YYYYMMDD`, `--MMDD` (year omitted),
    /// `---DD` (year and month omitted), or `YYYY-MM` (day omitted, which
    /// requires the dash since `YYYYMM` would be ambiguous with `YYYYMMDD`
    /// minus one digit).
    pub fn to_date_string(&self) -> String {
        match (self.year, self.month, self.day) {
            (Some(y), Some(m), Some(d)) => format!("{:04}{:02}{:02}", y, m, d),
            (Some(y), Some(m), None) => format!("{:04}-{:02}", y, m),
            (None, Some(m), Some(d)) => format!("--{:02}{:02}", m, d),
            (None, None, Some(d)) => format!("---{:02}", d),
            (None, Some(m), None) => format!("--{:02}", m),
            (Some(y), None, None) => format!("{:04}", y),
            (None, None, None) => String::new(),
        }
    }

    /// Render the full date-time string: the date component, `T`, the
    /// zero-padded time component, and a timezone suffix (`Z` for a zero
    /// offset, `+HHMM`/`-HHMM` otherwise, nothing if no offset is known).
    pub fn to_date_time_string(&self) -> String {
        let mut out = self.to_date_string();
        if self.has_time() {
            out.push('T');
            out.push_str(&format!(
                "{:02}{:02}{:02}",
                self.hour.unwrap_or(0),
                self.minute.unwrap_or(0),
                self.second.unwrap_or(0)
            ));
            match self.utc_offset_minutes {
                Some(0) => out.push('Z'),
                Some(offset) => {
                    let sign = if offset < 0 { '-' } else { '+' };
                    let offset = offset.abs();
                    out.push_str(&format!("{}{:02}{:02}", sign, offset / 60, offset % 60));
                }
                None => {}
            }
        }
        out
    }
}

impl fmt::Display for DateOrDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_time() {
            write!(f, "{}", self.to_date_time_string())
        } else {
            write!(f, "{}", self.to_date_string())
        }
    }
}

fn parse_date_part(part: &str, out: &mut DateOrDateTime) -> Option<()> {
    let digits = part.replace('-', "");
    let dash_count = part.chars().take_while(|c| *c == '-').count();

    if let Some(rest) = part.strip_prefix("---") {
        out.day = Some(parse_u8(rest, 0, 2)?);
        return Some(());
    }
    if let Some(rest) = part.strip_prefix("--") {
        if rest.len() == 4 {
            out.month = Some(parse_u8(rest, 0, 2)?);
            out.day = Some(parse_u8(rest, 2, 2)?);
        } else {
            out.month = Some(parse_u8(rest, 0, 2)?);
        }
        return Some(());
    }
    if dash_count == 0 {
        match digits.len() {
            8 => {
                out.year = Some(digits[0..4].parse().ok()?);
                out.month = Some(parse_u8(&digits, 4, 2)?);
                out.day = Some(parse_u8(&digits, 6, 2)?);
            }
            6 => {
                out.year = Some(digits[0..4].parse().ok()?);
                out.month = Some(parse_u8(&digits, 4, 2)?);
            }
            4 => {
                out.year = Some(digits.parse().ok()?);
            }
            _ => return None,
        }
        return Some(());
    }
    // `YYYY-MM` form (day omitted, explicit dash required).
    let (y, m) = part.split_once('-')?;
    out.year = Some(y.parse().ok()?);
    out.month = Some(m.parse().ok()?);
    Some(())
}

fn parse_time_part(part: &str, out: &mut DateOrDateTime) -> Option<()> {
    let (time, offset) = split_offset(part);
    let digits = time.replace(':', "");
    match digits.len() {
        len if len >= 2 => {
            out.hour = Some(parse_u8(&digits, 0, 2)?);
            if len >= 4 {
                out.minute = Some(parse_u8(&digits, 2, 2)?);
            }
            if len >= 6 {
                out.second = Some(parse_u8(&digits, 4, 2)?);
            }
        }
        _ => return None,
    }
    out.utc_offset_minutes = offset;
    Some(())
}

fn split_offset(part: &str) -> (&str, Option<i32>) {
    if let Some(time) = part.strip_suffix('Z') {
        return (time, Some(0));
    }
    // Skip the leading time digits (and any leading '-' from a BCE year,
    // which never occurs here) before looking for a sign character.
    if let Some(pos) = part.char_indices().skip(1).find_map(|(i, c)| {
        if c == '+' || c == '-' {
            Some(i)
        } else {
            None
        }
    }) {
        let (time, offset_str) = part.split_at(pos);
        let sign = if offset_str.starts_with('-') { -1 } else { 1 };
        let offset_digits = offset_str[1..].replace(':', "");
        let hours: i32 = offset_digits.get(0..2).and_then(|s| s.parse().ok()).unwrap_or(0);
        let minutes: i32 = offset_digits.get(2..4).and_then(|s| s.parse().ok()).unwrap_or(0);
        return (time, Some(sign * (hours * 60 + minutes)));
    }
    (part, None)
}

fn parse_u8(s: &str, start: usize, len: usize) -> Option<u8> {
    s.get(start..start + len)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_date() {
        let d = DateOrDateTime::try_parse("19960415").unwrap();
        assert_eq!(d.year, Some(1996));
        assert_eq!(d.month, Some(4));
        assert_eq!(d.day, Some(15));
        assert_eq!(d.to_date_string(), "19960415");
    }

    #[test]
    fn year_omitted() {
        let d = DateOrDateTime::try_parse("--1201").unwrap();
        assert_eq!(d.year, None);
        assert_eq!(d.month, Some(12));
        assert_eq!(d.day, Some(1));
        assert_eq!(d.to_date_string(), "--1201");
    }

    #[test]
    fn year_and_month_omitted() {
        let d = DateOrDateTime::try_parse("---20").unwrap();
        assert_eq!(d.day, Some(20));
        assert_eq!(d.to_date_string(), "---20");
    }

    #[test]
    fn timestamp_with_offset() {
        let d = DateOrDateTime::try_parse("19531015T231000-0500").unwrap();
        assert_eq!(d.year, Some(1953));
        assert_eq!(d.hour, Some(23));
        assert_eq!(d.utc_offset_minutes, Some(-300));
        assert_eq!(d.to_date_time_string(), "19531015T231000-0500");
    }

    #[test]
    fn utc_timestamp() {
        let d = DateOrDateTime::try_parse("20251231T235959Z").unwrap();
        assert_eq!(d.utc_offset_minutes, Some(0));
        assert_eq!(d.to_date_time_string(), "20251231T235959Z");
    }

    #[test]
    fn day_omitted_requires_dash() {
        let d = DateOrDateTime::try_parse("1996-04").unwrap();
        assert_eq!(d.year, Some(1996));
        assert_eq!(d.month, Some(4));
        assert_eq!(d.day, None);
        assert_eq!(d.to_date_string(), "1996-04");
    }

    #[test]
    fn garbage_returns_none() {
        assert!(DateOrDateTime::try_parse("").is_none());
        assert!(DateOrDateTime::try_parse("not-a-date").is_none());
    }
}
