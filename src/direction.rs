// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Interpretation of a raw [oneway](https://wiki.openstreetmap.org/wiki/Key:oneway)
/// flag of a street segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Oneway {
    /// No flag present - the segment is traversable both ways.
    Unset,

    /// `oneway=yes` - traversable only from `u` to `v`.
    Forward,

    /// `oneway=-1` - general traffic flows from `v` to `u`.
    Reverse,

    /// Any other value.
    Other,
}

impl Oneway {
    pub fn parse(flag: Option<&str>) -> Self {
        match flag {
            None => Self::Unset,
            Some("yes") => Self::Forward,
            Some("-1") => Self::Reverse,
            Some(_) => Self::Other,
        }
    }
}

/// Checks whether a segment with the provided `oneway` and `oneway:bicycle` flags
/// gets a synthesized reverse (`v` to `u`) edge in addition to its forward edge.
///
/// A reverse edge is created when:
/// - the `oneway` flag is absent or equal to `-1`, or
/// - `oneway=yes` with `oneway:bicycle=no`, where general traffic is one-way
///   but bicycles may ride both directions.
///
/// Every other combination (including `oneway=no`) yields only the forward edge.
pub fn has_reverse_edge(oneway: Option<&str>, oneway_bicycle: Option<&str>) -> bool {
    match Oneway::parse(oneway) {
        Oneway::Unset | Oneway::Reverse => true,
        Oneway::Forward => oneway_bicycle == Some("no"),
        Oneway::Other => false,
    }
}
