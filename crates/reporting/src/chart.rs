//! Chart documents handed to an external renderer: a per-segment area chart
//! of the timeline and generic Sankey diagrams.

use std::collections::HashMap;

use playervalue_segmentation::{Segment, SegmentCounts};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::timeline::{totals, AggregatedRow};

/// Area chart colour for a segment.
pub fn timeline_color(segment: Segment) -> &'static str {
    match segment {
        Segment::Low => "#D3D3D3",
        Segment::Medium => "#87CEFA",
        Segment::High => "#6495ED",
        Segment::Pvip => "#FFD700",
        Segment::Vip => "#FF8C00",
        Segment::Svip => "#FF4500",
    }
}

/// Transition diagram colour for a segment.
pub fn transition_color(segment: Segment) -> &'static str {
    match segment {
        Segment::Low => "#A6CEE3",
        Segment::Medium => "#1F78B4",
        Segment::High => "#33A02C",
        Segment::Pvip => "#FB9A99",
        Segment::Vip => "#E31A1C",
        Segment::Svip => "#FF7F00",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaSeries {
    pub segment: Segment,
    pub color: String,
    pub values: Vec<u64>,
}

/// One area series per segment over the month axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x: Vec<String>,
    pub series: Vec<AreaSeries>,
    /// Players per segment summed over every month.
    pub totals: SegmentCounts,
}

impl AreaChart {
    pub fn from_rows(rows: &[AggregatedRow]) -> Self {
        let series = Segment::ALL
            .into_iter()
            .map(|segment| AreaSeries {
                segment,
                color: timeline_color(segment).to_string(),
                values: rows.iter().map(|r| r.count(segment)).collect(),
            })
            .collect();

        Self {
            title: "Player Value Groups Evolution".into(),
            x_label: "Month".into(),
            y_label: "Players".into(),
            x: rows.iter().map(|r| r.month.clone()).collect(),
            series,
            totals: totals(rows),
        }
    }
}

/// A weighted directed edge between two labelled nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub source: String,
    pub target: String,
    pub value: u64,
}

impl FlowEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, value: u64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SankeyNode {
    pub label: String,
    pub color: String,
}

impl SankeyNode {
    pub fn new(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
        }
    }
}

/// Link between nodes, addressed by node index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SankeyLink {
    pub source: usize,
    pub target: usize,
    pub value: u64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SankeyDiagram {
    pub title: String,
    /// Set when the flows are generated rather than derived from data.
    pub synthetic: bool,
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
}

impl SankeyDiagram {
    /// Index edges against `nodes`. Edges naming a label that is not a node
    /// are dropped. `link_color` receives the edge and its source node.
    pub fn from_edges<F>(
        title: impl Into<String>,
        nodes: Vec<SankeyNode>,
        edges: &[FlowEdge],
        link_color: F,
    ) -> Self
    where
        F: Fn(&FlowEdge, &SankeyNode) -> String,
    {
        let index: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.label.as_str(), i))
            .collect();

        let mut links = Vec::with_capacity(edges.len());
        for edge in edges {
            match (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
                (Some(&source), Some(&target)) => links.push(SankeyLink {
                    source,
                    target,
                    value: edge.value,
                    color: link_color(edge, &nodes[source]),
                }),
                _ => debug!(source = %edge.source, target = %edge.target, "Skipping edge with unknown node"),
            }
        }

        Self {
            title: title.into(),
            synthetic: false,
            nodes,
            links,
        }
    }

    pub fn labelled_synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }

    pub fn total_flow(&self) -> u64 {
        self.links.iter().map(|l| l.value).sum()
    }
}
