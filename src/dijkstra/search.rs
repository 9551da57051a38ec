// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap};

use super::Route;
use crate::{Edge, Error, Network};

#[derive(Debug, Clone, Copy)]
struct QueueItem<'a> {
    at: &'a str,
    cost: f64,
}

impl PartialEq for QueueItem<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cost.total_cmp(&other.cost).is_eq()
    }
}

impl Eq for QueueItem<'_> {}

impl PartialOrd for QueueItem<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem<'_> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NOTE: We revert the order of comparison,
        // as lower costs are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        other.cost.total_cmp(&self.cost)
    }
}

/// Walks the recorded edges back from `to` to `from`.
/// Returns an empty vector if `to` was never reached.
fn reconstruct_path<'a>(came_from: &HashMap<&'a str, &'a Edge>, from: &str, to: &'a str) -> Vec<&'a Edge> {
    let mut path = Vec::default();
    let mut at = to;

    while at != from {
        match came_from.get(at) {
            Some(&edge) => {
                path.push(edge);
                at = edge.u.as_str();
            }
            None => return Vec::default(),
        }
    }

    path.reverse();
    path
}

/// Uses [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)
/// to find the shortest route between two nodes of the provided network,
/// using [Edge::length] as the weight.
///
/// The returned [Route] is empty if there is no route between the two nodes, or if
/// both nodes are the same; use [Route::is_found] to tell these cases apart.
/// Fails with [Error::UnknownNode] if either node doesn't exist.
///
/// All search state is owned by this call, so multiple routes may be searched
/// concurrently over the same network.
pub fn find_route<'a, N: Network + ?Sized>(
    g: &'a N,
    from_id: &str,
    to_id: &str,
) -> Result<Route<'a>, Error> {
    let from_node = g
        .get_node(from_id)
        .ok_or_else(|| Error::UnknownNode(from_id.to_string()))?;
    let to_node = g
        .get_node(to_id)
        .ok_or_else(|| Error::UnknownNode(to_id.to_string()))?;

    let from = from_node.id.as_str();
    let to = to_node.id.as_str();

    let mut queue: BinaryHeap<QueueItem<'a>> = BinaryHeap::default();
    let mut came_from: HashMap<&'a str, &'a Edge> = HashMap::default();
    let mut known_costs: HashMap<&'a str, f64> = HashMap::default();
    let mut steps: usize = 0;

    queue.push(QueueItem { at: from, cost: 0.0 });
    known_costs.insert(from, 0.0);

    while let Some(item) = queue.pop() {
        if item.at == to {
            break;
        }

        // Nodes may be queued multiple times - skip entries superseded by a cheaper one.
        if item.cost > known_costs.get(item.at).copied().unwrap_or(f64::INFINITY) {
            continue;
        }

        steps += 1;

        for edge in g.get_edges(item.at) {
            let neighbor = edge.v.as_str();
            let neighbor_cost = item.cost + edge.length;

            if neighbor_cost < known_costs.get(neighbor).copied().unwrap_or(f64::INFINITY) {
                came_from.insert(neighbor, edge);
                known_costs.insert(neighbor, neighbor_cost);
                queue.push(QueueItem {
                    at: neighbor,
                    cost: neighbor_cost,
                });
            }
        }
    }

    let edges = reconstruct_path(&came_from, from, to);
    log::debug!(
        "route {} -> {}: expanded {} nodes, {} edges",
        from,
        to,
        steps,
        edges.len()
    );
    Ok(Route::new(from, to, edges))
}
