// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use serde::Serialize;

use crate::{Edge, EdgeId};

/// Result of a shortest-path search: the ordered sequence of traversed [Edges](Edge).
///
/// An empty route means either that the start and end nodes are the same,
/// or that no route exists. [Route::is_found] distinguishes the two.
#[derive(Debug, Clone, PartialEq)]
pub struct Route<'a> {
    start: &'a str,
    end: &'a str,
    edges: Vec<&'a Edge>,
}

impl<'a> Route<'a> {
    pub(crate) fn new(start: &'a str, end: &'a str, edges: Vec<&'a Edge>) -> Self {
        debug_assert!(edges.first().map_or(true, |e| e.u == start));
        debug_assert!(edges.last().map_or(true, |e| e.v == end));
        Self { start, end, edges }
    }

    pub fn start(&self) -> &'a str {
        self.start
    }

    pub fn end(&self) -> &'a str {
        self.end
    }

    /// Returns true if the end node is reachable from the start node.
    pub fn is_found(&self) -> bool {
        !self.edges.is_empty() || self.start == self.end
    }

    /// Returns traversed edges, in order from start to end.
    pub fn edges(&self) -> &[&'a Edge] {
        &self.edges
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().map(|e| e.id)
    }

    /// Returns ids of the visited nodes, starting with the start node.
    /// Nothing is returned if the route wasn't found.
    pub fn node_ids(&self) -> impl Iterator<Item = &'a str> + '_ {
        let start = if self.is_found() {
            Some(self.start)
        } else {
            None
        };
        start
            .into_iter()
            .chain(self.edges.iter().map(|e| e.v.as_str()))
    }

    /// Returns the sum of all edge lengths, in meters.
    pub fn total_meters(&self) -> f64 {
        self.edges.iter().map(|e| e.length).sum()
    }

    /// Converts the route into the shape exposed to serving layers.
    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            edges: self.edge_ids().collect(),
            nodes: self.node_ids().map(str::to_string).collect(),
            total_meters: self.total_meters(),
        }
    }
}

/// Serializable description of a [Route]:
/// `{"edges": [...], "nodes": [...], "totalMeters": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub edges: Vec<EdgeId>,
    pub nodes: Vec<String>,
    pub total_meters: f64,
}
