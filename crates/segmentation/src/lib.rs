//! Player value segmentation — the fixed threshold ladder that buckets a
//! player value into one of six ordered segments, plus segment selections.

pub mod segment;
pub mod selection;

pub use segment::{classify, Segment, SegmentCounts};
pub use selection::SegmentSelection;
