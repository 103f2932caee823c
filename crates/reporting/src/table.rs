//! Month-by-segment table export in CSV and JSON.

use playervalue_core::PlayerValueResult;
use playervalue_segmentation::Segment;
use serde::Serialize;

use crate::timeline::AggregatedRow;

/// The timeline as a table: one row per month, one column per segment.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentTable {
    pub columns: Vec<String>,
    pub rows: Vec<AggregatedRow>,
}

impl SegmentTable {
    pub fn from_rows(rows: &[AggregatedRow]) -> Self {
        let columns = std::iter::once("month")
            .chain(Segment::ALL.iter().map(|s| s.as_str()))
            .map(String::from)
            .collect();
        Self {
            columns,
            rows: rows.to_vec(),
        }
    }

    pub fn export_csv(&self) -> PlayerValueResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            let mut cells = Vec::with_capacity(self.columns.len());
            cells.push(row.month.clone());
            cells.extend(row.counts.iter().map(|(_, n)| n.to_string()));
            writer.write_record(&cells)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Array of row objects with keys in column order.
    pub fn export_json(&self) -> PlayerValueResult<String> {
        Ok(serde_json::to_string_pretty(&self.rows)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::aggregate;
    use playervalue_core::Record;

    fn sample() -> SegmentTable {
        let rows = aggregate(&[
            Record::new("a", 10.0, "2024-02-01"),
            Record::new("b", 11000.0, "2024-01-15"),
            Record::new("c", 11000.0, "2024-01-16"),
        ])
        .unwrap();
        SegmentTable::from_rows(&rows)
    }

    #[test]
    fn test_columns() {
        let table = sample();
        assert_eq!(
            table.columns,
            vec!["month", "low", "medium", "high", "pvip", "vip", "svip"]
        );
        assert_eq!(table.rows.len(), 2);
    }

    #[test]
    fn test_csv_export() {
        let csv = sample().export_csv().unwrap();
        assert_eq!(
            csv,
            "month,low,medium,high,pvip,vip,svip\n\
             2024-01,0,0,0,0,2,0\n\
             2024-02,1,0,0,0,0,0\n"
        );
    }

    #[test]
    fn test_json_export() {
        let json = sample().export_json().unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["month"], "2024-01");
        assert_eq!(parsed[0]["vip"], 2);
        assert_eq!(parsed[1]["low"], 1);
        assert!(json.find("\"low\"").unwrap() < json.find("\"svip\"").unwrap());
    }

    #[test]
    fn test_empty_table() {
        let table = SegmentTable::from_rows(&[]);
        assert_eq!(table.export_csv().unwrap(), "month,low,medium,high,pvip,vip,svip\n");
        assert_eq!(table.export_json().unwrap(), "[]");
    }
}
