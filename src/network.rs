// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::iter::FusedIterator;
use std::slice;

use crate::{Edge, EdgeId, Error, Graph, Node};

/// Read-only view of a street network, as needed by [find_route](crate::find_route).
///
/// Implemented by the in-memory [Graph] and, with the `sqlite` feature,
/// by [SqliteNetwork](crate::SqliteNetwork). Implementations must not change
/// while queries are running.
pub trait Network {
    /// Retrieves a [Node] with the provided id.
    fn get_node(&self, id: &str) -> Option<&Node>;

    /// Retrieves an [Edge] with the provided id.
    fn get_edge(&self, id: EdgeId) -> Option<&Edge>;

    /// Gets all outgoing [Edges](Edge) from a node with a given id.
    fn get_edges(&self, from_id: &str) -> Edges<'_>;

    /// Finds the closest [Node] to the given position.
    /// Ties are resolved in favor of the node inserted first.
    fn find_nearest_node(&self, lat: f64, lon: f64) -> Result<&Node, Error>;
}

impl Network for Graph {
    fn get_node(&self, id: &str) -> Option<&Node> {
        Graph::get_node(self, id)
    }

    fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        Graph::get_edge(self, id)
    }

    fn get_edges(&self, from_id: &str) -> Edges<'_> {
        Graph::get_edges(self, from_id)
    }

    fn find_nearest_node(&self, lat: f64, lon: f64) -> Result<&Node, Error> {
        Graph::find_nearest_node(self, lat, lon)
    }
}

/// Iterator over the outgoing [Edges](Edge) of a node, in creation order.
#[derive(Debug, Clone)]
pub struct Edges<'a> {
    arena: &'a [Edge],
    indices: slice::Iter<'a, usize>,
}

impl<'a> Edges<'a> {
    pub(crate) fn new(arena: &'a [Edge], indices: &'a [usize]) -> Self {
        Self {
            arena,
            indices: indices.iter(),
        }
    }
}

impl<'a> Iterator for Edges<'a> {
    type Item = &'a Edge;

    fn next(&mut self) -> Option<Self::Item> {
        self.indices.next().map(|&idx| &self.arena[idx])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl ExactSizeIterator for Edges<'_> {}

impl FusedIterator for Edges<'_> {}
