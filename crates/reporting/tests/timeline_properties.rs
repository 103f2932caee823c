//! Property tests for the month-by-segment timeline.

use std::collections::HashMap;

use playervalue_core::{PlayerValueError, Record};
use playervalue_reporting::timeline::{aggregate, expand_rows, month_bucket};
use proptest::prelude::*;

fn arb_record() -> impl Strategy<Value = Record> {
    (
        0u32..1000,
        -100.0f64..40_000.0,
        2019i32..2027,
        1u32..=12,
        1u32..=28,
        prop::bool::ANY,
    )
        .prop_map(|(id, value, year, month, day, with_day)| {
            let month_text = if with_day {
                format!("{year}-{month:02}-{day:02}")
            } else {
                format!("{year}-{month:02}")
            };
            Record::new(format!("user_{id}"), value, month_text)
        })
}

proptest! {
    #[test]
    fn buckets_strictly_ascending(records in prop::collection::vec(arb_record(), 0..200)) {
        let rows = aggregate(&records).unwrap();
        for pair in rows.windows(2) {
            prop_assert!(pair[0].month < pair[1].month);
        }
    }

    #[test]
    fn every_row_sums_to_its_bucket_population(records in prop::collection::vec(arb_record(), 0..200)) {
        let rows = aggregate(&records).unwrap();

        let mut expected: HashMap<String, u64> = HashMap::new();
        for record in &records {
            *expected.entry(month_bucket(&record.month).unwrap()).or_default() += 1;
        }

        prop_assert_eq!(rows.len(), expected.len());
        for row in &rows {
            prop_assert_eq!(row.counts.iter().count(), 6);
            prop_assert_eq!(row.total(), expected[&row.month]);
        }
    }

    #[test]
    fn row_order_does_not_matter(records in prop::collection::vec(arb_record(), 0..100)) {
        let mut reversed = records.clone();
        reversed.reverse();
        prop_assert_eq!(aggregate(&records).unwrap(), aggregate(&reversed).unwrap());
    }

    #[test]
    fn reaggregating_expanded_rows_is_stable(records in prop::collection::vec(arb_record(), 0..100)) {
        let rows = aggregate(&records).unwrap();
        prop_assert_eq!(aggregate(&expand_rows(&rows)).unwrap(), rows);
    }

    #[test]
    fn one_bad_timestamp_fails_everything(
        records in prop::collection::vec(arb_record(), 0..50),
        at in 0usize..50,
    ) {
        let mut records = records;
        let at = at.min(records.len());
        records.insert(at, Record::new("bad", 10.0, "not-a-date"));

        let err = aggregate(&records).unwrap_err();
        let rejected_at_bad_row = matches!(
            err,
            PlayerValueError::InvalidInput { ref field, row: Some(r), .. } if field == "month" && r == at
        );
        prop_assert!(rejected_at_bad_row, "unexpected error: {}", err);
    }
}

#[test]
fn empty_input_gives_empty_output() {
    assert!(aggregate(&[]).unwrap().is_empty());
}

#[test]
fn non_numeric_cell_is_rejected_by_loader() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "user_id,player_value,month\n1,N/A,2024-01").unwrap();
    let err = playervalue_reporting::CsvSource::new(file.path())
        .load()
        .unwrap_err();
    assert!(matches!(err, PlayerValueError::InvalidInput { ref field, row: Some(0), .. } if field == "player_value"));
}
