// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// Ordered sequence of `[lon, lat]` positions describing the shape of an [Edge](crate::Edge).
///
/// The geometry is opaque to routing: edge lengths are taken from the input records,
/// never recomputed from the polyline.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline(pub Vec<[f64; 2]>);

impl Polyline {
    /// Returns the number of positions in the polyline.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the positions as `[lon, lat]` pairs.
    pub fn coordinates(&self) -> &[[f64; 2]] {
        &self.0
    }

    /// Returns the first position, as a `(lat, lon)` tuple.
    pub fn start(&self) -> Option<(f64, f64)> {
        self.0.first().map(|&[lon, lat]| (lat, lon))
    }

    /// Returns the last position, as a `(lat, lon)` tuple.
    pub fn end(&self) -> Option<(f64, f64)> {
        self.0.last().map(|&[lon, lat]| (lat, lon))
    }

    /// Returns the same polyline walked in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().copied().collect())
    }
}

impl From<Vec<[f64; 2]>> for Polyline {
    fn from(coordinates: Vec<[f64; 2]>) -> Self {
        Self(coordinates)
    }
}
