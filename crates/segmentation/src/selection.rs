//! Segment selections used to filter flow diagrams.

use std::str::FromStr;

use playervalue_core::{PlayerValueError, PlayerValueResult};
use serde::Serialize;

use crate::segment::Segment;

/// A non-empty set of segments, kept in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentSelection {
    segments: Vec<Segment>,
}

impl SegmentSelection {
    pub fn all() -> Self {
        Self {
            segments: Segment::ALL.to_vec(),
        }
    }

    /// Build a selection from any segments. `which` names the selection in
    /// the error raised when nothing is selected.
    pub fn from_segments(
        which: &str,
        segments: impl IntoIterator<Item = Segment>,
    ) -> PlayerValueResult<Self> {
        let mut segments: Vec<Segment> = segments.into_iter().collect();
        segments.sort();
        segments.dedup();
        if segments.is_empty() {
            return Err(PlayerValueError::EmptySelection(which.to_string()));
        }
        Ok(Self { segments })
    }

    /// Parse a comma-separated list such as `"low, vip"`.
    pub fn parse(which: &str, list: &str) -> PlayerValueResult<Self> {
        let segments = list
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Segment::from_str)
            .collect::<PlayerValueResult<Vec<_>>>()?;
        Self::from_segments(which, segments)
    }

    pub fn contains(&self, segment: Segment) -> bool {
        self.segments.contains(&segment)
    }

    pub fn iter(&self) -> impl Iterator<Item = Segment> + '_ {
        self.segments.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl Default for SegmentSelection {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_orders_and_dedups() {
        let selection = SegmentSelection::parse("source", "vip, low,VIP").unwrap();
        let segments: Vec<_> = selection.iter().collect();
        assert_eq!(segments, vec![Segment::Low, Segment::Vip]);
        assert!(selection.contains(Segment::Vip));
        assert!(!selection.contains(Segment::High));
    }

    #[test]
    fn test_empty_selection_rejected() {
        let err = SegmentSelection::parse("target", " , ").unwrap_err();
        assert!(matches!(err, PlayerValueError::EmptySelection(which) if which == "target"));
    }

    #[test]
    fn test_unknown_segment_rejected() {
        let err = SegmentSelection::parse("source", "low,gold").unwrap_err();
        assert!(matches!(err, PlayerValueError::UnknownSegment(name) if name == "gold"));
    }

    #[test]
    fn test_from_segments_rejects_empty() {
        let err = SegmentSelection::from_segments("source", Vec::<Segment>::new()).unwrap_err();
        assert!(matches!(err, PlayerValueError::EmptySelection(which) if which == "source"));
    }

    #[test]
    fn test_all() {
        assert_eq!(SegmentSelection::all().len(), 6);
        assert_eq!(SegmentSelection::default(), SegmentSelection::all());
    }
}
