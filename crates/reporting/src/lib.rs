//! Player value reporting — CSV ingest, the month-by-segment timeline,
//! exportable tables, chart documents, and clearly labelled synthetic flows.

pub mod chart;
pub mod source;
pub mod synthetic;
pub mod table;
pub mod timeline;

pub use chart::{AreaChart, FlowEdge, SankeyDiagram};
pub use source::CsvSource;
pub use table::SegmentTable;
pub use timeline::{aggregate, month_bucket, AggregatedRow, MonthBucket};
