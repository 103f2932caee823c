//! Segment ladder and the dense per-segment counter.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use playervalue_core::PlayerValueError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Player value segment. Declaration order is the canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Low,
    Medium,
    High,
    Pvip,
    Vip,
    Svip,
}

/// Exclusive upper bounds, ascending. Anything at or above the last bound is
/// `Svip`.
const LADDER: [(f64, Segment); 5] = [
    (150.0, Segment::Low),
    (1000.0, Segment::Medium),
    (2500.0, Segment::High),
    (10000.0, Segment::Pvip),
    (15000.0, Segment::Vip),
];

/// Classify a player value into its segment.
///
/// The first bucket whose upper bound exceeds `value` wins. Negative values
/// land in `Low`; NaN fails every comparison and lands in `Svip`.
pub fn classify(value: f64) -> Segment {
    LADDER
        .iter()
        .find(|(upper, _)| value < *upper)
        .map(|(_, segment)| *segment)
        .unwrap_or(Segment::Svip)
}

impl Segment {
    pub const ALL: [Segment; 6] = [
        Segment::Low,
        Segment::Medium,
        Segment::High,
        Segment::Pvip,
        Segment::Vip,
        Segment::Svip,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::Low => "low",
            Segment::Medium => "medium",
            Segment::High => "high",
            Segment::Pvip => "pvip",
            Segment::Vip => "vip",
            Segment::Svip => "svip",
        }
    }

    /// Title-cased label used on retention flow nodes.
    pub fn display_name(&self) -> &'static str {
        match self {
            Segment::Low => "Low",
            Segment::Medium => "Medium",
            Segment::High => "High",
            Segment::Pvip => "PVIP",
            Segment::Vip => "VIP",
            Segment::Svip => "SVIP",
        }
    }

    /// Position in canonical order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Inclusive lower bound. `Low` is unbounded below.
    pub fn lower_bound(&self) -> Option<f64> {
        match self.index() {
            0 => None,
            i => Some(LADDER[i - 1].0),
        }
    }

    /// Exclusive upper bound. `Svip` is unbounded above.
    pub fn upper_bound(&self) -> Option<f64> {
        LADDER.get(self.index()).map(|(upper, _)| *upper)
    }

    /// A value guaranteed to classify into this segment.
    pub fn representative_value(&self) -> f64 {
        self.lower_bound().unwrap_or(0.0)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = PlayerValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Segment::ALL
            .into_iter()
            .find(|segment| segment.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| PlayerValueError::UnknownSegment(name.to_string()))
    }
}

/// Count per segment, always holding all six segments in canonical order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<Segment, u64>")]
pub struct SegmentCounts([u64; 6]);

impl SegmentCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, segment: Segment) {
        self.0[segment.index()] += 1;
    }

    pub fn add(&mut self, segment: Segment, n: u64) {
        self.0[segment.index()] += n;
    }

    pub fn get(&self, segment: Segment) -> u64 {
        self.0[segment.index()]
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// `(segment, count)` pairs in canonical order, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (Segment, u64)> + '_ {
        Segment::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    pub fn merge(&mut self, other: &SegmentCounts) {
        for (segment, n) in other.iter() {
            self.add(segment, n);
        }
    }
}

impl From<BTreeMap<Segment, u64>> for SegmentCounts {
    fn from(map: BTreeMap<Segment, u64>) -> Self {
        let mut counts = SegmentCounts::new();
        for (segment, n) in map {
            counts.add(segment, n);
        }
        counts
    }
}

impl Serialize for SegmentCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Segment::ALL.len()))?;
        for (segment, n) in self.iter() {
            map.serialize_entry(segment.as_str(), &n)?;
        }
        map.end()
    }
}
