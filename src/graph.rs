// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::hash_map::{Entry, HashMap};
use std::collections::HashSet;

use crate::direction::has_reverse_edge;
use crate::{earth_distance, Edge, EdgeId, EdgeRecord, Error, Node, NodeRecord};

/// Represents a street network as a set of [Nodes](Node) and directed [Edges](Edge) between them.
///
/// Nodes and edges live in two arenas, kept in insertion order. Every node has an
/// adjacency list with indices of its outgoing edges, so parallel edges between
/// the same pair of nodes are kept apart.
///
/// A graph is immutable once built, and may be freely shared between threads.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    node_index: HashMap<String, usize>,
    edges: Vec<Edge>,
    edge_index: HashMap<EdgeId, usize>,
    adjacency: Vec<Vec<usize>>,
}

impl Graph {
    /// Builds a graph from node and street segment records.
    ///
    /// Every node record yields exactly one [Node]. Every edge record yields a forward [Edge]
    /// with [EdgeId::forward] of the record's position, and if
    /// [has_reverse_edge](crate::direction::has_reverse_edge) holds for its flags, a reverse
    /// edge with [EdgeId::reverse] of the same position.
    ///
    /// Fails if there are no nodes, node ids repeat, an edge references an unknown node
    /// or an edge length is negative.
    pub fn build<N, E>(nodes: N, edges: E) -> Result<Self, Error>
    where
        N: IntoIterator<Item = NodeRecord>,
        E: IntoIterator<Item = EdgeRecord>,
    {
        let mut g = Self {
            nodes: Vec::default(),
            node_index: HashMap::default(),
            edges: Vec::default(),
            edge_index: HashMap::default(),
            adjacency: Vec::default(),
        };

        for record in nodes {
            g.add_node(record)?;
        }

        if g.nodes.is_empty() {
            return Err(Error::EmptyGraph);
        }

        let mut reverse_edges = 0usize;
        for (seq, record) in edges.into_iter().enumerate() {
            if g.add_edges(seq, record)? {
                reverse_edges += 1;
            }
        }

        log::debug!("synthesized {} reverse edges", reverse_edges);
        log::info!(
            "built graph with {} nodes and {} edges",
            g.nodes.len(),
            g.edges.len()
        );
        Ok(g)
    }

    fn add_node(&mut self, record: NodeRecord) -> Result<(), Error> {
        match self.node_index.entry(record.id) {
            Entry::Occupied(e) => Err(Error::DuplicateNode(e.key().clone())),
            Entry::Vacant(e) => {
                let node = Node {
                    id: e.key().clone(),
                    lat: record.lat,
                    lon: record.lon,
                };
                e.insert(self.nodes.len());
                self.nodes.push(node);
                self.adjacency.push(Vec::default());
                Ok(())
            }
        }
    }

    /// Adds the forward edge of a record, and its reverse edge if applicable.
    /// Returns whether a reverse edge was created.
    fn add_edges(&mut self, seq: usize, record: EdgeRecord) -> Result<bool, Error> {
        let id = EdgeId::forward(seq);

        if !record.length.is_finite() || record.length < 0.0 {
            return Err(Error::InvalidLength {
                edge: id,
                length: record.length,
            });
        }

        let u_idx = self.node_idx(id, &record.u)?;
        let v_idx = self.node_idx(id, &record.v)?;

        let forward = Edge {
            id,
            source_id: record.id,
            u: record.u,
            v: record.v,
            length: record.length,
            geometry: record.geometry,
            oneway: record.oneway,
            oneway_bicycle: record.oneway_bicycle,
            category: record.category,
            parent_category: record.parent_category,
        };

        let reverse = if has_reverse_edge(forward.oneway.as_deref(), forward.oneway_bicycle.as_deref())
        {
            Some(Edge {
                id: EdgeId::reverse(seq),
                u: forward.v.clone(),
                v: forward.u.clone(),
                geometry: forward.geometry.reversed(),
                ..forward.clone()
            })
        } else {
            None
        };

        self.push_edge(u_idx, forward);
        let has_reverse = match reverse {
            Some(edge) => {
                self.push_edge(v_idx, edge);
                true
            }
            None => false,
        };
        Ok(has_reverse)
    }

    fn node_idx(&self, edge: EdgeId, node_id: &str) -> Result<usize, Error> {
        self.node_index
            .get(node_id)
            .copied()
            .ok_or_else(|| Error::MissingNode {
                edge,
                node: node_id.to_string(),
            })
    }

    fn push_edge(&mut self, from_idx: usize, edge: Edge) {
        let idx = self.edges.len();
        self.edge_index.insert(edge.id, idx);
        self.edges.push(edge);
        self.adjacency[from_idx].push(idx);
    }

    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of edges in the graph, including synthesized reverse edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns an iterator over all [Nodes](Node) in the graph, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Returns an iterator over all [Edges](Edge) in the graph, in creation order
    /// (every reverse edge directly follows its forward edge).
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Retrieves a [Node] with the provided id.
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Retrieves an [Edge] with the provided id.
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_index.get(&id).map(|&idx| &self.edges[idx])
    }

    /// Gets all outgoing [Edges](Edge) from a node with a given id.
    /// Unknown nodes have no outgoing edges.
    pub fn get_edges(&self, from_id: &str) -> crate::Edges<'_> {
        let indices = self
            .node_index
            .get(from_id)
            .map(|&idx| self.adjacency[idx].as_slice())
            .unwrap_or_default();
        crate::Edges::new(&self.edges, indices)
    }

    /// Finds the closest [Node] to the given position.
    ///
    /// This function computes the distance to every [Node] in the graph.
    /// If multiple nodes are equally close, the first one in insertion order is returned.
    pub fn find_nearest_node(&self, lat: f64, lon: f64) -> Result<&Node, Error> {
        let mut best: Option<(f64, &Node)> = None;
        for node in &self.nodes {
            let dist = earth_distance(lat, lon, node.lat, node.lon);
            match best {
                Some((best_dist, _)) if best_dist <= dist => {}
                _ => best = Some((dist, node)),
            }
        }
        best.map(|(_, node)| node).ok_or(Error::EmptyGraph)
    }

    /// Returns the ids of all nodes reachable from the provided node (including itself)
    /// by following outgoing edges.
    pub fn reachable_from(&self, start_id: &str) -> Result<HashSet<&str>, Error> {
        let start = self
            .node_index
            .get(start_id)
            .copied()
            .ok_or_else(|| Error::UnknownNode(start_id.to_string()))?;

        let visited = self.depth_first_search(start);
        Ok(self
            .nodes
            .iter()
            .zip(visited)
            .filter_map(|(node, seen)| if seen { Some(node.id.as_str()) } else { None })
            .collect())
    }

    fn depth_first_search(&self, start: usize) -> Vec<bool> {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![start];
        visited[start] = true;

        while let Some(idx) = stack.pop() {
            for &edge_idx in &self.adjacency[idx] {
                let Some(&to) = self.node_index.get(&self.edges[edge_idx].v) else {
                    continue;
                };
                if !visited[to] {
                    visited[to] = true;
                    stack.push(to);
                }
            }
        }

        visited
    }

    /// Checks if every node is reachable from the first node of the graph.
    ///
    /// As edges are directed, this checks reachability from one node,
    /// not undirected connectivity. The result is informational only -
    /// routing over a disconnected graph is allowed.
    pub fn is_connected(&self) -> bool {
        if self.nodes.is_empty() {
            return true;
        }

        let unreachable = self
            .depth_first_search(0)
            .into_iter()
            .filter(|&seen| !seen)
            .count();

        if unreachable > 0 {
            log::warn!(
                "{} of {} nodes are unreachable from node {}",
                unreachable,
                self.nodes.len(),
                self.nodes[0].id
            );
        }
        unreachable == 0
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::Polyline;

    pub(crate) fn node(id: &str, lat: f64, lon: f64) -> NodeRecord {
        NodeRecord {
            id: id.to_string(),
            lat,
            lon,
        }
    }

    pub(crate) fn edge(id: &str, u: &str, v: &str, length: f64, oneway: Option<&str>) -> EdgeRecord {
        EdgeRecord {
            id: id.to_string(),
            u: u.to_string(),
            v: v.to_string(),
            length,
            geometry: Polyline::default(),
            oneway: oneway.map(str::to_string),
            oneway_bicycle: None,
            category: Some("residential".to_string()),
            parent_category: Some("road".to_string()),
        }
    }

    pub(crate) fn bicycle_edge(
        id: &str,
        u: &str,
        v: &str,
        length: f64,
        oneway: Option<&str>,
        oneway_bicycle: Option<&str>,
    ) -> EdgeRecord {
        EdgeRecord {
            oneway_bicycle: oneway_bicycle.map(str::to_string),
            ..edge(id, u, v, length, oneway)
        }
    }

    fn targets<'a>(g: &'a Graph, from: &str) -> Vec<&'a str> {
        g.get_edges(from).map(|e| e.v.as_str()).collect()
    }

    fn two_nodes() -> Vec<NodeRecord> {
        vec![node("a", 59.90, 10.75), node("b", 59.91, 10.76)]
    }

    #[test]
    fn build_two_way_segment() {
        let g = Graph::build(two_nodes(), [edge("100", "a", "b", 12.5, None)]).unwrap();

        assert_eq!(g.len(), 2);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(targets(&g, "a"), ["b"]);
        assert_eq!(targets(&g, "b"), ["a"]);

        let reverse = g.get_edge(EdgeId::reverse(0)).unwrap();
        assert_eq!(reverse.source_id, "100");
        assert_eq!(reverse.u, "b");
        assert_eq!(reverse.v, "a");
        assert_eq!(reverse.length, 12.5);
        assert_eq!(reverse.category.as_deref(), Some("residential"));
        assert_eq!(reverse.parent_category.as_deref(), Some("road"));
    }

    #[test]
    fn build_reverse_only_segment() {
        let g = Graph::build(two_nodes(), [edge("100", "a", "b", 12.5, Some("-1"))]).unwrap();
        assert_eq!(targets(&g, "a"), ["b"]);
        assert_eq!(targets(&g, "b"), ["a"]);
    }

    #[test]
    fn build_oneway_segment() {
        let g = Graph::build(two_nodes(), [edge("100", "a", "b", 12.5, Some("yes"))]).unwrap();
        assert_eq!(g.edge_count(), 1);
        assert_eq!(targets(&g, "a"), ["b"]);
        assert!(targets(&g, "b").is_empty());
        assert!(g.get_edge(EdgeId::reverse(0)).is_none());
    }

    #[test]
    fn build_oneway_segment_with_bicycle_contraflow() {
        let g = Graph::build(
            two_nodes(),
            [
                bicycle_edge("100", "a", "b", 12.5, Some("yes"), Some("no")),
                bicycle_edge("101", "a", "b", 20.0, Some("yes"), Some("yes")),
            ],
        )
        .unwrap();

        assert_eq!(targets(&g, "a"), ["b", "b"]);
        assert_eq!(targets(&g, "b"), ["a"]);
        assert_eq!(
            g.get_edges("b").next().map(|e| e.id),
            Some(EdgeId::reverse(0))
        );
    }

    #[test]
    fn build_reverses_geometry() {
        let mut record = edge("100", "a", "b", 12.5, None);
        record.geometry = Polyline::from(vec![[10.75, 59.90], [10.755, 59.905], [10.76, 59.91]]);
        let g = Graph::build(two_nodes(), [record]).unwrap();

        let forward = g.get_edge(EdgeId::forward(0)).unwrap();
        let reverse = g.get_edge(EdgeId::reverse(0)).unwrap();
        assert_eq!(reverse.geometry, forward.geometry.reversed());
    }

    #[test]
    fn build_missing_node() {
        let err = Graph::build(two_nodes(), [edge("100", "a", "x", 1.0, None)]).unwrap_err();
        match err {
            Error::MissingNode { edge, node } => {
                assert_eq!(edge, EdgeId::forward(0));
                assert_eq!(node, "x");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = Graph::build(two_nodes(), [edge("100", "x", "a", 1.0, None)]).unwrap_err();
        assert!(matches!(err, Error::MissingNode { .. }));
    }

    #[test]
    fn build_empty() {
        let err = Graph::build(Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyGraph));
    }

    #[test]
    fn build_duplicate_node() {
        let err = Graph::build(
            [node("a", 59.0, 10.0), node("a", 59.1, 10.1)],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateNode(id) if id == "a"));
    }

    #[test]
    fn build_invalid_length() {
        let err = Graph::build(two_nodes(), [edge("100", "a", "b", -1.0, None)]).unwrap_err();
        assert!(matches!(err, Error::InvalidLength { .. }));

        let err = Graph::build(two_nodes(), [edge("100", "a", "b", f64::NAN, None)]).unwrap_err();
        assert!(matches!(err, Error::InvalidLength { .. }));
    }

    #[test]
    fn find_nearest_node() {
        let g = Graph::build(
            [
                node("1", 0.01, 0.01),
                node("2", 0.01, 0.05),
                node("3", 0.03, 0.09),
                node("4", 0.04, 0.03),
                node("5", 0.04, 0.07),
                node("6", 0.07, 0.03),
                node("7", 0.07, 0.01),
                node("8", 0.08, 0.05),
                node("9", 0.08, 0.09),
            ],
            Vec::new(),
        )
        .unwrap();

        assert_eq!(g.find_nearest_node(0.02, 0.02).unwrap().id, "1");
        assert_eq!(g.find_nearest_node(0.05, 0.03).unwrap().id, "4");
        assert_eq!(g.find_nearest_node(0.05, 0.08).unwrap().id, "5");
        assert_eq!(g.find_nearest_node(0.09, 0.06).unwrap().id, "8");

        for n in g.iter() {
            assert_eq!(g.find_nearest_node(n.lat, n.lon).unwrap(), n);
        }
    }

    #[test]
    fn find_nearest_node_tie_break() {
        let g = Graph::build(
            [
                node("west", 0.0, -0.01),
                node("east", 0.0, 0.01),
                node("west-again", 0.0, -0.01),
            ],
            Vec::new(),
        )
        .unwrap();

        assert_eq!(g.find_nearest_node(0.0, 0.0).unwrap().id, "west");
        assert_eq!(g.find_nearest_node(0.0, -0.01).unwrap().id, "west");
    }

    #[test]
    fn is_connected() {
        let nodes = || {
            vec![
                node("a", 59.90, 10.75),
                node("b", 59.91, 10.76),
                node("c", 59.92, 10.77),
            ]
        };
        let cycle = || {
            vec![
                edge("1", "a", "b", 1.0, Some("yes")),
                edge("2", "b", "c", 1.0, Some("yes")),
                edge("3", "c", "a", 1.0, Some("yes")),
            ]
        };

        let g = Graph::build(nodes(), cycle()).unwrap();
        assert!(g.is_connected());

        let mut with_isolated = nodes();
        with_isolated.push(node("d", 59.93, 10.78));
        let g = Graph::build(with_isolated, cycle()).unwrap();
        assert!(!g.is_connected());
    }

    #[test]
    fn is_connected_is_directed() {
        // a -> b -> c, only reachable from a
        let g = Graph::build(
            [
                node("b", 59.91, 10.76),
                node("a", 59.90, 10.75),
                node("c", 59.92, 10.77),
            ],
            [
                edge("1", "a", "b", 1.0, Some("yes")),
                edge("2", "b", "c", 1.0, Some("yes")),
            ],
        )
        .unwrap();

        assert!(!g.is_connected());
        assert_eq!(
            g.reachable_from("a").unwrap(),
            HashSet::from(["a", "b", "c"])
        );
        assert_eq!(g.reachable_from("b").unwrap(), HashSet::from(["b", "c"]));
        assert!(matches!(
            g.reachable_from("x"),
            Err(Error::UnknownNode(id)) if id == "x"
        ));
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        const N: usize = 200_000;
        let nodes = (0..N).map(|i| node(&i.to_string(), 0.0, i as f64 * 1e-5));
        let edges = (1..N).map(|i| edge(&i.to_string(), &(i - 1).to_string(), &i.to_string(), 1.0, None));
        let g = Graph::build(nodes, edges).unwrap();
        assert!(g.is_connected());
    }

    #[test]
    fn graph_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Graph>();
    }
}
