//! Timestamp codec for the backend's `YYYY-MM-DD HH:MM:SS` strings.
//!
//! Reading also accepts the `T`-separated forms a `datetime-local` input
//! produces (with or without seconds) and RFC 3339.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

pub const WIRE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// The shape used when a timestamp is put back into a form field. Keeps the
/// seconds so an untouched field goes back to the server unchanged.
pub const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const ACCEPTED: &[&str] = &[
    WIRE_FORMAT,
    INPUT_FORMAT,
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ACCEPTED
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
}

pub fn format(ts: &NaiveDateTime) -> String {
    ts.format(WIRE_FORMAT).to_string()
}

pub fn format_input(ts: &NaiveDateTime) -> String {
    ts.format(INPUT_FORMAT).to_string()
}

pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format(ts))
}

pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(d)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(ts: &Option<NaiveDateTime>, s: S) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => super::serialize(ts, s),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(d)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .unwrap()
    }

    #[test]
    fn parses_backend_and_form_shapes() {
        assert_eq!(parse("2025-03-14 08:30:15"), Some(at(8, 30, 15)));
        assert_eq!(parse("2025-03-14T08:30:15"), Some(at(8, 30, 15)));
        assert_eq!(parse("2025-03-14T08:30"), Some(at(8, 30, 0)));
        assert_eq!(parse("2025-03-14T08:30:15Z"), Some(at(8, 30, 15)));
        assert_eq!(parse("14/03/2025"), None);
    }

    #[test]
    fn formats_for_wire_and_input() {
        assert_eq!(format(&at(8, 30, 15)), "2025-03-14 08:30:15");
        assert_eq!(format_input(&at(8, 30, 15)), "2025-03-14T08:30:15");
    }

    #[test]
    fn input_shape_reads_back_to_the_same_instant() {
        let ts = at(7, 0, 45);
        assert_eq!(parse(&format_input(&ts)), Some(ts));
    }
}
