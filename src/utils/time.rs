//! Conversions between BSON and chrono timestamps, and query-string date parsing.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use mongodb::bson;

pub fn to_chrono(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}

pub fn from_chrono(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

/// Which end of a range a bare calendar date stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    /// Midnight at the start of the day.
    Start,
    /// Last millisecond of the day.
    End,
}

fn parse_rfc3339(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
        // A '+' offset sent without percent-encoding decodes to a space.
        let (stamp, offset) = raw.rsplit_once(' ')?;
        DateTime::parse_from_rfc3339(&format!("{}+{}", stamp, offset)).ok()
    })
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date.
pub fn parse_date_bound(raw: &str, bound: DateBound) -> Option<bson::DateTime> {
    if let Some(dt) = parse_rfc3339(raw) {
        return Some(from_chrono(dt.with_timezone(&Utc)));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let time = match bound {
        DateBound::Start => NaiveTime::from_hms_opt(0, 0, 0)?,
        DateBound::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999)?,
    };
    Some(from_chrono(date.and_time(time).and_utc()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bare_dates_cover_whole_day() {
        let start = parse_date_bound("2024-03-10", DateBound::Start).unwrap();
        let end = parse_date_bound("2024-03-10", DateBound::End).unwrap();
        let midnight = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        assert_eq!(to_chrono(start), midnight);
        assert_eq!(
            end.timestamp_millis() - start.timestamp_millis(),
            24 * 3600 * 1000 - 1
        );
    }

    #[test]
    fn test_rfc3339_with_offset_is_normalized() {
        let parsed = parse_date_bound("2024-03-10T12:00:00+02:00", DateBound::Start).unwrap();
        assert_eq!(
            to_chrono(parsed),
            Utc.with_ymd_and_hms(2024, 3, 10, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_offset_plus_decoded_as_space_is_accepted() {
        let parsed = parse_date_bound("2024-03-10T12:00:00 02:00", DateBound::Start).unwrap();
        assert_eq!(
            to_chrono(parsed),
            Utc.with_ymd_and_hms(2024, 3, 10, 10, 0, 0).unwrap()
        );
        assert!(parse_date_bound("2024-03-10 12:00", DateBound::Start).is_none());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(parse_date_bound("10/03/2024", DateBound::Start).is_none());
        assert!(parse_date_bound("2024-02-30", DateBound::End).is_none());
        assert!(parse_date_bound("now", DateBound::End).is_none());
    }
}
