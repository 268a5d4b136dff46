use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

pub const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Formats an event timestamp for display in the local zone.
///
/// Never fails: input that cannot be parsed is returned as-is, and an absent
/// timestamp renders as an empty string.
pub fn format_timestamp(raw: Option<&str>) -> String {
    format_timestamp_in(raw, &Local)
}

pub fn format_timestamp_in<Tz>(raw: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(raw) = raw else {
        return String::new();
    };

    match parse_instant(raw, tz) {
        Some(instant) => instant.with_timezone(tz).format(DISPLAY_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// `T`-separated values are absolute (zoneless ones are read in `tz`).
/// Space-separated values carry no zone and are read as UTC.
fn parse_instant<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.contains('T') {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(parsed.with_timezone(&Utc));
        }
        if let Some(parsed) = OFFSET_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(trimmed, format).ok())
        {
            return Some(parsed.with_timezone(&Utc));
        }
        let naive = parse_naive(trimmed)?;
        return tz
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc));
    }

    let naive = parse_naive(&trimmed.replacen(' ', "T", 1))?;
    Some(Utc.from_utc_datetime(&naive))
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}
