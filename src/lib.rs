// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Shortest-path routing over street-segment networks.
//!
//! Street segments are converted into a weighted directed graph, where every segment
//! yields a forward edge and, depending on its [oneway](direction::Oneway) and
//! `oneway:bicycle` flags, a synthesized reverse edge. Routes are found with
//! Dijkstra's algorithm, weighted by segment length in meters.
//!
//! # Example
//!
//! ```no_run
//! let g = veinett::interchange::load_from_file(
//!     &veinett::interchange::Options::default(),
//!     "path/to/graph.json",
//! ).expect("failed to load graph");
//!
//! let start_node = g.find_nearest_node(59.9139, 10.7522).unwrap();
//! let end_node = g.find_nearest_node(59.9275, 10.7600).unwrap();
//! let route = veinett::find_route(&g, &start_node.id, &end_node.id)
//!     .expect("failed to find route");
//!
//! println!("Route: {:?}", route.summary());
//! ```

mod dijkstra;
pub mod direction;
mod distance;
mod error;
mod geometry;
mod graph;
pub mod interchange;
mod network;
#[cfg(feature = "sqlite")]
pub mod store;

use std::fmt;
use std::str::FromStr;

pub use dijkstra::{find_route, Pathfinder, Route, RouteSummary};
pub use distance::earth_distance;
pub use error::Error;
pub use geometry::Polyline;
pub use graph::Graph;
pub use network::{Edges, Network};
#[cfg(feature = "sqlite")]
pub use store::SqliteNetwork;

/// Represents a vertex of the [Graph] - a point on the street network.
///
/// Two nodes are considered equal if their ids are equal.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

/// Identifies an [Edge] within a [Graph].
///
/// `seq` is the position of the originating [EdgeRecord] in the build input,
/// and `reversed` marks edges synthesized in the opposite direction of that record.
/// Formatted as `"12"` for forward and `"12_r"` for reverse edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId {
    pub seq: usize,
    pub reversed: bool,
}

impl EdgeId {
    pub const fn forward(seq: usize) -> Self {
        Self {
            seq,
            reversed: false,
        }
    }

    pub const fn reverse(seq: usize) -> Self {
        Self {
            seq,
            reversed: true,
        }
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reversed {
            write!(f, "{}_r", self.seq)
        } else {
            write!(f, "{}", self.seq)
        }
    }
}

/// Error returned when parsing a malformed [EdgeId].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid edge id: {0:?}")]
pub struct ParseEdgeIdError(String);

impl FromStr for EdgeId {
    type Err = ParseEdgeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, reversed) = match s.strip_suffix("_r") {
            Some(digits) => (digits, true),
            None => (s, false),
        };
        digits
            .parse()
            .map(|seq| Self { seq, reversed })
            .map_err(|_| ParseEdgeIdError(s.to_string()))
    }
}

impl serde::Serialize for EdgeId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Represents a directed connection of the [Graph] from node `u` to node `v`.
///
/// `length` (in meters) is the routing weight. The flags and categories are carried
/// over from the originating [EdgeRecord]; a synthesized reverse edge shares
/// them with its forward counterpart, and has its geometry reversed.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    /// Identifier of the street segment in the source map data.
    pub source_id: String,
    pub u: String,
    pub v: String,
    pub length: f64,
    pub geometry: Polyline,
    pub oneway: Option<String>,
    pub oneway_bicycle: Option<String>,
    pub category: Option<String>,
    pub parent_category: Option<String>,
}

/// Raw node input for [Graph::build].
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub id: String,
    pub lon: f64,
    pub lat: f64,
}

/// Raw street segment input for [Graph::build].
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    /// Identifier of the segment in the source map data.
    pub id: String,
    pub u: String,
    pub v: String,
    pub length: f64,
    pub geometry: Polyline,
    pub oneway: Option<String>,
    pub oneway_bicycle: Option<String>,
    pub category: Option<String>,
    pub parent_category: Option<String>,
}
