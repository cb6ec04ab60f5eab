//! Time utilities: store-local timestamps in, store-local date/time strings out.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Error, Result};

pub fn parse_tz(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| Error::InvalidTimezone(tz.to_string()))
}

/// Parse a ledger timestamp. RFC 3339 strings carry their own offset; naive
/// strings like "2026-02-20 23:59" or "2026-02-20 23:59:10" are read in `tz`.
pub fn parse_timestamp(raw: &str, tz: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    let tz = parse_tz(tz)?;
    let ndt = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_err(|_| Error::InvalidTimestamp(raw.to_string()))?;

    let local_dt = tz
        .from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| Error::AmbiguousLocalTime(format!("{raw} {tz}")))?;

    Ok(local_dt.with_timezone(&Utc))
}

/// Render a UTC instant in `tz` with a strftime pattern.
pub fn format_local(dt: DateTime<Utc>, tz: Tz, pattern: &str) -> String {
    dt.with_timezone(&tz).format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_naive_in_mauritius() {
        // Indian/Mauritius is UTC+4, no DST
        let utc = parse_timestamp("2026-02-20 23:59", "Indian/Mauritius").unwrap();
        assert_eq!(utc.to_rfc3339(), "2026-02-20T19:59:00+00:00");
    }

    #[test]
    fn test_parse_rfc3339_ignores_tz() {
        let utc = parse_timestamp("2026-02-20T10:00:00+02:00", "Indian/Mauritius").unwrap();
        assert_eq!(utc.to_rfc3339(), "2026-02-20T08:00:00+00:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_timestamp("yesterday", "UTC"),
            Err(Error::InvalidTimestamp(_))
        ));
        assert!(matches!(
            parse_timestamp("2026-02-20 10:00", "Mars/Olympus"),
            Err(Error::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_format_local() {
        let utc = parse_timestamp("2026-02-20T20:30:00Z", "UTC").unwrap();
        let tz = parse_tz("Indian/Mauritius").unwrap();
        assert_eq!(format_local(utc, tz, "%d/%m/%Y"), "21/02/2026");
        assert_eq!(format_local(utc, tz, "%H:%M"), "00:30");
    }
}
