// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::{find_route, Route};
use crate::{Error, Network};

/// Answers routing queries over a shared [Network].
///
/// A pathfinder only borrows its network and keeps no state between queries;
/// it is cheap to copy and may be used from many threads at once.
#[derive(Debug)]
pub struct Pathfinder<'a, N: Network + ?Sized> {
    network: &'a N,
}

impl<N: Network + ?Sized> Clone for Pathfinder<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: Network + ?Sized> Copy for Pathfinder<'_, N> {}

impl<'a, N: Network + ?Sized> Pathfinder<'a, N> {
    pub fn new(network: &'a N) -> Self {
        Self { network }
    }

    pub fn network(&self) -> &'a N {
        self.network
    }

    /// Finds the shortest route between two nodes, see [find_route].
    pub fn shortest_path(&self, from_id: &str, to_id: &str) -> Result<Route<'a>, Error> {
        find_route(self.network, from_id, to_id)
    }

    /// Snaps both positions to their nearest nodes, and finds
    /// the shortest route between them.
    pub fn route_between(
        &self,
        start_lat: f64,
        start_lon: f64,
        end_lat: f64,
        end_lon: f64,
    ) -> Result<Route<'a>, Error> {
        let start = self.network.find_nearest_node(start_lat, start_lon)?;
        let end = self.network.find_nearest_node(end_lat, end_lon)?;
        log::debug!(
            "snapped ({}, {}) to {} and ({}, {}) to {}",
            start_lat,
            start_lon,
            start.id,
            end_lat,
            end_lon,
            end.id
        );
        self.shortest_path(&start.id, &end.id)
    }
}
