//! Month-by-segment timeline — truncates timestamps to calendar months and
//! counts players per segment in each month.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use playervalue_core::{PlayerValueError, PlayerValueResult, Record};
use playervalue_segmentation::{classify, Segment, SegmentCounts};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A calendar month. Orders chronologically and renders as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket {
    year: i32,
    month: u32,
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

impl MonthBucket {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The following calendar month.
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Truncate a timestamp to its calendar month. RFC 3339 offsets are
    /// ignored: the month is the one written in the timestamp.
    pub fn parse(timestamp: &str) -> Option<Self> {
        let ts = timestamp.trim();
        if ts.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
            return Some(Self::from_date(dt.naive_local().date()));
        }
        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(ts, format) {
                return Some(Self::from_date(dt.date()));
            }
        }
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(ts, format) {
                return Some(Self::from_date(date));
            }
        }
        // Bare year-month: "2024-03" or "2024/03".
        let with_day = format!("{}-01", ts.replace('/', "-"));
        NaiveDate::parse_from_str(&with_day, "%Y-%m-%d")
            .ok()
            .map(Self::from_date)
    }

    fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Truncate a timestamp to its `YYYY-MM` bucket key.
pub fn month_bucket(timestamp: &str) -> PlayerValueResult<String> {
    MonthBucket::parse(timestamp)
        .map(|bucket| bucket.to_string())
        .ok_or_else(|| unparseable_month(timestamp, None))
}

/// One month's segment breakdown. Serializes as
/// `{"month": "2024-03", "low": n, ..., "svip": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedRow {
    pub month: String,
    #[serde(flatten)]
    pub counts: SegmentCounts,
}

impl AggregatedRow {
    pub fn count(&self, segment: Segment) -> u64 {
        self.counts.get(segment)
    }

    pub fn total(&self) -> u64 {
        self.counts.total()
    }
}

/// Count records per (month, segment).
///
/// Returns one row per distinct month, ascending, each holding all six
/// segments. Fails on the first record whose value is not finite or whose
/// timestamp is not a recognizable date; no partial result is returned.
pub fn aggregate(records: &[Record]) -> PlayerValueResult<Vec<AggregatedRow>> {
    let mut buckets: BTreeMap<MonthBucket, SegmentCounts> = BTreeMap::new();

    for (row, record) in records.iter().enumerate() {
        if !record.player_value.is_finite() {
            return Err(PlayerValueError::invalid_input(
                "player_value",
                Some(row),
                format!("not a finite number: {}", record.player_value),
            ));
        }
        let bucket =
            MonthBucket::parse(&record.month).ok_or_else(|| unparseable_month(&record.month, Some(row)))?;
        buckets
            .entry(bucket)
            .or_default()
            .increment(classify(record.player_value));
    }

    debug!(records = records.len(), months = buckets.len(), "Aggregated timeline");

    Ok(buckets
        .into_iter()
        .map(|(bucket, counts)| AggregatedRow {
            month: bucket.to_string(),
            counts,
        })
        .collect())
}

/// Segment totals across every month.
pub fn totals(rows: &[AggregatedRow]) -> SegmentCounts {
    let mut totals = SegmentCounts::new();
    for row in rows {
        totals.merge(&row.counts);
    }
    totals
}

/// Rebuild bucket-granularity records from aggregated rows: one record per
/// counted player, valued at its segment's lower bound.
pub fn expand_rows(rows: &[AggregatedRow]) -> Vec<Record> {
    let mut records = Vec::new();
    for row in rows {
        for (segment, n) in row.counts.iter() {
            records.extend((0..n).map(|i| {
                Record::new(
                    format!("{}-{}-{}", row.month, segment, i),
                    segment.representative_value(),
                    row.month.clone(),
                )
            }));
        }
    }
    records
}

fn unparseable_month(timestamp: &str, row: Option<usize>) -> PlayerValueError {
    PlayerValueError::invalid_input(
        "month",
        row,
        format!("cannot parse {timestamp:?} as a calendar month"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(value: f64, month: &str) -> Record {
        Record::new("u", value, month)
    }

    #[test]
    fn test_month_bucket_formats() {
        assert_eq!(month_bucket("2024-03").unwrap(), "2024-03");
        assert_eq!(month_bucket("2024-03-31").unwrap(), "2024-03");
        assert_eq!(month_bucket("2024/03/01").unwrap(), "2024-03");
        assert_eq!(month_bucket(" 2024-03-15 23:59:59 ").unwrap(), "2024-03");
        assert_eq!(month_bucket("2024-03-15T08:00:00.250").unwrap(), "2024-03");
        assert_eq!(month_bucket("2024-03-31T23:30:00-05:00").unwrap(), "2024-03");
        assert_eq!(month_bucket("2024-12-01T00:00:00Z").unwrap(), "2024-12");
        assert_eq!(month_bucket("2024-03-15 10:30").unwrap(), "2024-03");
        assert_eq!(month_bucket("2024-03-15T10:30").unwrap(), "2024-03");
        assert_eq!(month_bucket("20240315").unwrap(), "2024-03");
    }

    #[test]
    fn test_month_bucket_rejects_garbage() {
        for bad in ["not-a-date", "", "2024-13", "2024-02-30", "March 2024", "20241301", "2024-03-15 25:00"] {
            let err = month_bucket(bad).unwrap_err();
            assert!(
                matches!(err, PlayerValueError::InvalidInput { ref field, .. } if field == "month"),
                "{bad:?} gave {err}"
            );
        }
    }

    #[test]
    fn test_bucket_ordering_and_succ() {
        let dec = MonthBucket::new(2023, 12).unwrap();
        let jan = dec.succ();
        assert_eq!(jan.to_string(), "2024-01");
        assert!(dec < jan);
        assert!(MonthBucket::new(2024, 0).is_none());
    }

    #[test]
    fn test_aggregate_zero_fills_and_sorts() {
        let records = vec![
            rec(20000.0, "2024-02-10"),
            rec(100.0, "2024-01-05"),
            rec(149.0, "2024-01-20"),
            rec(150.0, "2024-01-31"),
        ];
        let rows = aggregate(&records).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].month, "2024-01");
        assert_eq!(rows[0].count(Segment::Low), 2);
        assert_eq!(rows[0].count(Segment::Medium), 1);
        assert_eq!(rows[0].count(Segment::Svip), 0);
        assert_eq!(rows[0].total(), 3);
        assert_eq!(rows[1].month, "2024-02");
        assert_eq!(rows[1].count(Segment::Svip), 1);
        assert_eq!(rows[1].counts.iter().count(), 6);
    }

    #[test]
    fn test_aggregate_empty_input() {
        assert!(aggregate(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_aggregate_rejects_non_finite_value() {
        let records = vec![rec(10.0, "2024-01"), rec(f64::NAN, "2024-01")];
        let err = aggregate(&records).unwrap_err();
        assert!(matches!(
            err,
            PlayerValueError::InvalidInput { ref field, row: Some(1), .. } if field == "player_value"
        ));
    }

    #[test]
    fn test_aggregate_rejects_bad_timestamp() {
        let records = vec![rec(10.0, "2024-01"), rec(10.0, "not-a-date")];
        let err = aggregate(&records).unwrap_err();
        assert!(matches!(
            err,
            PlayerValueError::InvalidInput { ref field, row: Some(1), .. } if field == "month"
        ));
    }

    #[test]
    fn test_row_serializes_flat_in_canonical_order() {
        let rows = aggregate(&[rec(500.0, "2024-05")]).unwrap();
        let json = serde_json::to_string(&rows[0]).unwrap();
        assert_eq!(
            json,
            r#"{"month":"2024-05","low":0,"medium":1,"high":0,"pvip":0,"vip":0,"svip":0}"#
        );
    }

    #[test]
    fn test_totals_and_expand() {
        let records = vec![
            rec(1.0, "2024-01"),
            rec(12000.0, "2024-01"),
            rec(12000.0, "2024-02"),
        ];
        let rows = aggregate(&records).unwrap();
        let totals = totals(&rows);
        assert_eq!(totals.get(Segment::Vip), 2);
        assert_eq!(totals.total(), 3);

        let expanded = expand_rows(&rows);
        assert_eq!(expanded.len(), 3);
        assert_eq!(aggregate(&expanded).unwrap(), rows);
    }
}
