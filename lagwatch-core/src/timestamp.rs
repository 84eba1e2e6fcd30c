//! Timestamp normalization
//!
//! Isolates the timestamp embedded in a pipeline's display position and
//! resolves it to an instant. Two pieces of deployment configuration drive
//! this and are injected rather than assumed:
//!
//! - a [`ZoneTable`] mapping timezone abbreviations to fixed UTC offsets, since
//!   abbreviations such as `IST` are ambiguous and not resolvable from the
//!   IANA database alone;
//! - a default IANA zone attached to timestamps that carry no zone at all.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::HashMap;

use crate::domain::pipeline::PositionReport;
use crate::error::{MonitorError, Result};

/// Naive layouts accepted for the timestamp text, tried in order
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Abbreviation → offset table used when a timestamp names its zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneTable {
    offsets: HashMap<String, FixedOffset>,
}

impl ZoneTable {
    /// Creates an empty table
    pub fn empty() -> Self {
        Self {
            offsets: HashMap::new(),
        }
    }

    /// Adds or replaces an abbreviation (stored upper-case)
    pub fn insert(&mut self, abbreviation: &str, offset: FixedOffset) {
        self.offsets
            .insert(abbreviation.trim().to_ascii_uppercase(), offset);
    }

    /// Case-insensitive lookup
    pub fn lookup(&self, abbreviation: &str) -> Option<FixedOffset> {
        self.offsets
            .get(&abbreviation.to_ascii_uppercase())
            .copied()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Parses a table from `ABBR=±HH:MM` pairs separated by commas
    ///
    /// # Example
    /// ```
    /// use lagwatch_core::timestamp::ZoneTable;
    ///
    /// let table = ZoneTable::parse("EDT=-04:00, IST=+01:00").unwrap();
    /// assert_eq!(table.lookup("ist").unwrap().local_minus_utc(), 3600);
    /// ```
    pub fn parse(pairs: &str) -> std::result::Result<Self, String> {
        let mut table = Self::empty();

        for pair in pairs.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (abbr, offset) = pair
                .split_once('=')
                .ok_or_else(|| format!("invalid zone entry '{}': expected ABBR=+HH:MM", pair))?;

            let abbr = abbr.trim();
            if abbr.is_empty() || !abbr.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(format!("invalid zone abbreviation '{}'", abbr));
            }

            let offset = parse_offset(offset.trim())
                .ok_or_else(|| format!("invalid offset '{}' for zone {}", offset.trim(), abbr))?;

            table.insert(abbr, offset);
        }

        Ok(table)
    }
}

impl Default for ZoneTable {
    /// North American, Indian and Australian abbreviations seen in deployments
    ///
    /// `IST` maps to India Standard Time; deployments in Ireland or Israel
    /// must override it.
    fn default() -> Self {
        const HOUR: i32 = 3600;
        let entries: &[(&str, i32)] = &[
            ("UTC", 0),
            ("GMT", 0),
            ("Z", 0),
            ("EST", -5 * HOUR),
            ("EDT", -4 * HOUR),
            ("CST", -6 * HOUR),
            ("CDT", -5 * HOUR),
            ("PST", -8 * HOUR),
            ("PDT", -7 * HOUR),
            ("IST", 5 * HOUR + 30 * 60),
            ("AEST", 10 * HOUR),
            ("AEDT", 11 * HOUR),
        ];

        let mut table = Self::empty();
        for (abbr, secs) in entries {
            if let Some(offset) = FixedOffset::east_opt(*secs) {
                table.insert(abbr, offset);
            }
        }
        table
    }
}

/// Parses `+05:30`, `-0400`, `+5` or `-04` into a fixed offset
pub fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };

    if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit() || c == ':') {
        return None;
    }

    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None if rest.len() > 2 => rest.split_at(rest.len() - 2),
        None => (rest, "0"),
    };

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Timestamp isolated from a display position and the instant it denotes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTimestamp {
    pub cleaned: String,
    pub instant: DateTime<Utc>,
}

/// Turns raw display positions into instants
#[derive(Debug, Clone)]
pub struct TimestampNormalizer {
    marker: String,
    zones: ZoneTable,
    default_zone: Tz,
}

impl TimestampNormalizer {
    /// Creates a normalizer
    ///
    /// # Arguments
    /// * `marker` - Token the timestamp is cut at (first occurrence), e.g. `", Seq No"`
    /// * `zones` - Abbreviation table for zone-bearing timestamps
    /// * `default_zone` - Zone attached to timestamps without one
    pub fn new(marker: impl Into<String>, zones: ZoneTable, default_zone: Tz) -> Self {
        Self {
            marker: marker.into(),
            zones,
            default_zone,
        }
    }

    /// Normalizes a position report into its timestamp text and instant
    pub fn normalize(&self, report: &PositionReport) -> Result<NormalizedTimestamp> {
        let cleaned = self.clean(&report.display_position)?;
        let instant = self.parse(cleaned)?;

        Ok(NormalizedTimestamp {
            cleaned: cleaned.to_string(),
            instant,
        })
    }

    /// Cuts the raw text at the first occurrence of the marker
    pub fn clean<'a>(&self, raw: &'a str) -> Result<&'a str> {
        let head = if self.marker.is_empty() {
            raw
        } else {
            let idx = raw.find(&self.marker).ok_or_else(|| {
                MonitorError::parse(format!(
                    "marker '{}' not found in display position '{}'",
                    self.marker, raw
                ))
            })?;
            &raw[..idx]
        };

        let cleaned = head.trim();
        if cleaned.is_empty() {
            return Err(MonitorError::parse(format!(
                "no timestamp before marker in display position '{}'",
                raw
            )));
        }

        Ok(cleaned)
    }

    /// Parses isolated timestamp text into an instant
    pub fn parse(&self, text: &str) -> Result<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(dt.with_timezone(&Utc));
        }

        if let Some((head, tail)) = text.rsplit_once(char::is_whitespace) {
            let head = head.trim_end();

            if tail.chars().all(|c| c.is_ascii_alphabetic()) {
                let offset = self.zones.lookup(tail).ok_or_else(|| {
                    MonitorError::parse(format!("unrecognized timezone abbreviation '{}'", tail))
                })?;
                return attach_offset(parse_naive(head)?, offset);
            }

            if let Some(offset) = parse_offset(tail) {
                return attach_offset(parse_naive(head)?, offset);
            }
        }

        let naive = parse_naive(text)?;
        self.default_zone
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| {
                MonitorError::parse(format!(
                    "local time '{}' does not exist in {}",
                    text, self.default_zone
                ))
            })
    }
}

fn parse_naive(text: &str) -> Result<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .ok_or_else(|| MonitorError::parse(format!("unrecognized timestamp '{}'", text)))
}

fn attach_offset(naive: NaiveDateTime, offset: FixedOffset) -> Result<DateTime<Utc>> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| MonitorError::parse(format!("cannot apply offset {} to '{}'", offset, naive)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pipeline::PipelineId;
    use crate::error::ErrorKind;

    fn report(raw: &str) -> PositionReport {
        PositionReport::new(PipelineId::from(683u64), raw)
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn seq_normalizer(zone: Tz) -> TimestampNormalizer {
        TimestampNormalizer::new(", Seq No", ZoneTable::default(), zone)
    }

    #[test]
    fn test_abbreviations_resolve_to_same_instant() {
        let normalizer = seq_normalizer(chrono_tz::America::New_York);

        let edt = normalizer
            .normalize(&report("2024-06-01 10:00:00 EDT, Seq No 1"))
            .unwrap();
        let utc_report = normalizer
            .normalize(&report("2024-06-01 14:00:00 UTC, Seq No 1"))
            .unwrap();

        assert_eq!(edt.instant, utc_report.instant);
        assert_eq!(edt.cleaned, "2024-06-01 10:00:00 EDT");

        let reformatted = DateTime::parse_from_rfc3339(&edt.instant.to_rfc3339()).unwrap();
        assert_eq!(reformatted.with_timezone(&Utc), utc_report.instant);
    }

    #[test]
    fn test_abbreviation_lookup_is_case_insensitive() {
        let normalizer = seq_normalizer(chrono_tz::UTC);
        let ts = normalizer
            .normalize(&report("2024-06-01 09:00:00 ist, Seq No 12"))
            .unwrap();
        assert_eq!(ts.instant, utc("2024-06-01T03:30:00Z"));
    }

    #[test]
    fn test_marker_cutting_zone_uses_default_zone() {
        let normalizer =
            TimestampNormalizer::new("IST,", ZoneTable::default(), chrono_tz::Asia::Kolkata);

        let ts = normalizer
            .normalize(&report("2024-06-01 09:00:00 IST, Seq No 12"))
            .unwrap();

        assert_eq!(ts.cleaned, "2024-06-01 09:00:00");
        assert_eq!(ts.instant, utc("2024-06-01T03:30:00Z"));
    }

    #[test]
    fn test_cut_happens_at_first_marker() {
        let normalizer = seq_normalizer(chrono_tz::UTC);
        let cleaned = normalizer
            .clean("2024-06-01 09:00:00, Seq No 1, Seq No 2")
            .unwrap();
        assert_eq!(cleaned, "2024-06-01 09:00:00");
    }

    #[test]
    fn test_missing_marker_is_parse_error() {
        let normalizer = seq_normalizer(chrono_tz::UTC);
        let err = normalizer
            .normalize(&report("2024-06-01 09:00:00 IST"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_empty_timestamp_before_marker_is_parse_error() {
        let normalizer = seq_normalizer(chrono_tz::UTC);
        let err = normalizer.normalize(&report(", Seq No 4")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_unknown_abbreviation_is_parse_error() {
        let normalizer = seq_normalizer(chrono_tz::UTC);
        let err = normalizer
            .normalize(&report("2024-06-01 09:00:00 XYZ, Seq No 1"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.detail().contains("XYZ"));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let normalizer = seq_normalizer(chrono_tz::UTC);
        let err = normalizer
            .normalize(&report("binlog.000042/1337, Seq No 9"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_numeric_offset_and_rfc3339() {
        let normalizer = seq_normalizer(chrono_tz::UTC);
        assert_eq!(
            normalizer.parse("2024-06-01 09:00:00 +05:30").unwrap(),
            utc("2024-06-01T03:30:00Z")
        );
        assert_eq!(
            normalizer.parse("2024-06-01 09:00:00 -0400").unwrap(),
            utc("2024-06-01T13:00:00Z")
        );
        assert_eq!(
            normalizer.parse("2024-06-01T09:00:00+02:00").unwrap(),
            utc("2024-06-01T07:00:00Z")
        );
    }

    #[test]
    fn test_default_zone_follows_daylight_saving() {
        let normalizer = seq_normalizer(chrono_tz::America::New_York);
        assert_eq!(
            normalizer.parse("2024-01-15 08:00:00").unwrap(),
            utc("2024-01-15T13:00:00Z")
        );
        assert_eq!(
            normalizer.parse("2024-07-15 08:00:00").unwrap(),
            utc("2024-07-15T12:00:00Z")
        );
    }

    #[test]
    fn test_ambiguous_local_time_takes_earliest() {
        let normalizer = seq_normalizer(chrono_tz::America::New_York);
        assert_eq!(
            normalizer.parse("2024-11-03 01:30:00").unwrap(),
            utc("2024-11-03T05:30:00Z")
        );
    }

    #[test]
    fn test_nonexistent_local_time_is_parse_error() {
        let normalizer = seq_normalizer(chrono_tz::America::New_York);
        let err = normalizer.parse("2024-03-10 02:30:00").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_zone_table_parse() {
        let table = ZoneTable::parse("EDT=-04:00, IST=+01:00,AEST=+10").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.lookup("edt").unwrap().local_minus_utc(), -4 * 3600);
        assert_eq!(table.lookup("IST").unwrap().local_minus_utc(), 3600);
        assert_eq!(table.lookup("AEST").unwrap().local_minus_utc(), 10 * 3600);

        assert!(ZoneTable::parse("EDT").is_err());
        assert!(ZoneTable::parse("EDT=4").is_err());
        assert!(ZoneTable::parse("E1=+01:00").is_err());
    }

    #[test]
    fn test_overridden_table_changes_resolution() {
        let irish = ZoneTable::parse("IST=+01:00").unwrap();
        let normalizer = TimestampNormalizer::new(", Seq No", irish, chrono_tz::Europe::Dublin);
        let ts = normalizer
            .normalize(&report("2024-06-01 09:00:00 IST, Seq No 12"))
            .unwrap();
        assert_eq!(ts.instant, utc("2024-06-01T08:00:00Z"));
    }

    #[test]
    fn test_parse_offset_forms() {
        assert_eq!(parse_offset("+05:30").unwrap().local_minus_utc(), 19800);
        assert_eq!(parse_offset("-0400").unwrap().local_minus_utc(), -14400);
        assert_eq!(parse_offset("+5").unwrap().local_minus_utc(), 18000);
        assert!(parse_offset("05:30").is_none());
        assert!(parse_offset("+25:00").is_none());
        assert!(parse_offset("+ab").is_none());
    }
}
