//! Synthetic data generators.
//!
//! Nothing here is computed from real player data. Flow diagrams built from
//! these generators carry `synthetic: true` so a renderer can say so. Every
//! generator is seeded, so the same seed always yields the same output.

use playervalue_core::Record;
use playervalue_segmentation::{Segment, SegmentSelection};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::{transition_color, FlowEdge, SankeyDiagram, SankeyNode};
use crate::timeline::MonthBucket;

pub const DEFAULT_SEED: u64 = 42;

const MIN_SIMULATED_VALUE: f64 = 10.0;
const MAX_SIMULATED_VALUE: f64 = 30000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetentionStatus {
    Churned,
    Retained,
    Reactivated,
}

impl RetentionStatus {
    pub const ALL: [RetentionStatus; 3] = [
        RetentionStatus::Churned,
        RetentionStatus::Retained,
        RetentionStatus::Reactivated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RetentionStatus::Churned => "Churned",
            RetentionStatus::Retained => "Retained",
            RetentionStatus::Reactivated => "Reactivated",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RetentionStatus::Churned => "rgba(255, 99, 71, 0.6)",
            RetentionStatus::Retained => "rgba(34, 139, 34, 0.6)",
            RetentionStatus::Reactivated => "rgba(255, 215, 0, 0.6)",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == label)
    }
}

/// Segment → status flows: churned in 100..300, reactivated in 50..150,
/// retained in 200..500 per segment.
pub fn retention_flows(seed: u64) -> Vec<FlowEdge> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::with_capacity(Segment::ALL.len() * RetentionStatus::ALL.len());
    for segment in Segment::ALL {
        let churned = rng.gen_range(100..300);
        let retained = rng.gen_range(200..500);
        let reactivated = rng.gen_range(50..150);
        let name = segment.display_name();
        edges.push(FlowEdge::new(name, RetentionStatus::Churned.as_str(), churned));
        edges.push(FlowEdge::new(name, RetentionStatus::Reactivated.as_str(), reactivated));
        edges.push(FlowEdge::new(name, RetentionStatus::Retained.as_str(), retained));
    }
    edges
}

pub fn retention_sankey(seed: u64) -> SankeyDiagram {
    let nodes = Segment::ALL
        .into_iter()
        .map(|s| s.display_name())
        .chain(RetentionStatus::ALL.into_iter().map(|s| s.as_str()))
        .map(|label| SankeyNode::new(label, "lightblue"))
        .collect();

    let edges = retention_flows(seed);
    debug!(seed, edges = edges.len(), "Generated synthetic retention flows");

    SankeyDiagram::from_edges(
        "Player Retention-Churn-Reactivation Flow",
        nodes,
        &edges,
        |edge, _| {
            RetentionStatus::from_label(&edge.target)
                .map(|s| s.color())
                .unwrap_or("lightgray")
                .to_string()
        },
    )
    .labelled_synthetic()
}

/// A synthetic move of players from one segment to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: Segment,
    pub to: Segment,
    pub value: u64,
}

/// Every (from, to) segment pair with a value in 20..=100.
pub fn transition_flows(seed: u64) -> Vec<Transition> {
    let mut rng = StdRng::seed_from_u64(seed);
    Segment::ALL
        .into_iter()
        .flat_map(|from| Segment::ALL.into_iter().map(move |to| (from, to)))
        .map(|(from, to)| Transition {
            from,
            to,
            value: rng.gen_range(20..=100),
        })
        .collect()
}

fn before_label(segment: Segment) -> String {
    format!("{segment}_before")
}

fn after_label(segment: Segment) -> String {
    format!("{segment}_after")
}

/// Transition diagram restricted to the selected source and target
/// segments. Links take the colour of their source segment.
pub fn transition_sankey(
    seed: u64,
    sources: &SegmentSelection,
    targets: &SegmentSelection,
) -> SankeyDiagram {
    let nodes = sources
        .iter()
        .map(|s| SankeyNode::new(before_label(s), transition_color(s)))
        .chain(
            targets
                .iter()
                .map(|s| SankeyNode::new(after_label(s), transition_color(s))),
        )
        .collect();

    let edges: Vec<FlowEdge> = transition_flows(seed)
        .into_iter()
        .filter(|t| sources.contains(t.from) && targets.contains(t.to))
        .map(|t| FlowEdge::new(before_label(t.from), after_label(t.to), t.value))
        .collect();
    debug!(
        seed,
        sources = sources.len(),
        targets = targets.len(),
        edges = edges.len(),
        "Generated synthetic transition flows"
    );

    SankeyDiagram::from_edges("Player Group Transitions", nodes, &edges, |_, source| {
        source.color.clone()
    })
    .labelled_synthetic()
}

/// Simulated player value table: `players` users over `months` consecutive
/// months from `start`, each value a log-uniform draw in [10, 30000).
pub fn simulate_population(
    seed: u64,
    players: usize,
    months: u32,
    start: MonthBucket,
) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(seed);
    let span = (MAX_SIMULATED_VALUE / MIN_SIMULATED_VALUE).ln();

    let mut records = Vec::with_capacity(players.saturating_mul(months as usize));
    let mut month = start;
    for _ in 0..months {
        let label = month.to_string();
        for player in 0..players {
            let draw: f64 = rng.gen_range(0.0..1.0);
            let value = (MIN_SIMULATED_VALUE * (draw * span).exp() * 100.0).round() / 100.0;
            records.push(Record::new(
                format!("player_{player:05}"),
                value.min(MAX_SIMULATED_VALUE - 0.01),
                label.clone(),
            ));
        }
        month = month.succ();
    }

    debug!(seed, players, months, records = records.len(), "Simulated player values");
    records
}
