// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Edge, EdgeRecord, Node, NodeRecord, Polyline};

/// Top-level interchange document, with a collection of nodes and a collection of edges.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub nodes: Vec<NodeFeature>,

    #[serde(default)]
    pub edges: Vec<EdgeFeature>,
}

/// `{"properties": {"id": ..., "lon": ..., "lat": ...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeFeature {
    pub properties: NodeProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeProperties {
    #[serde(deserialize_with = "id_from_scalar")]
    pub id: String,
    pub lon: f64,
    pub lat: f64,
}

/// `{"properties": {...}, "geometry": {"coordinates": [[lon, lat], ...]}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeFeature {
    pub properties: EdgeProperties,

    #[serde(default)]
    pub geometry: LineGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeProperties {
    /// Identifier of the segment in the source map data.
    #[serde(deserialize_with = "id_from_scalar")]
    pub id: String,

    #[serde(deserialize_with = "id_from_scalar")]
    pub u: String,

    #[serde(deserialize_with = "id_from_scalar")]
    pub v: String,

    pub length: f64,

    #[serde(default)]
    pub oneway: Option<String>,

    #[serde(rename = "onewayBicycle", alias = "oneway:bicycle", default)]
    pub oneway_bicycle: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(rename = "parent", default)]
    pub parent_category: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineGeometry {
    #[serde(default)]
    pub coordinates: Polyline,
}

/// Identifiers may be written either as strings or as integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScalarId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

fn id_from_scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match ScalarId::deserialize(deserializer)? {
        ScalarId::Text(s) => s,
        ScalarId::Signed(i) => i.to_string(),
        ScalarId::Unsigned(u) => u.to_string(),
    })
}

impl From<NodeFeature> for NodeRecord {
    fn from(f: NodeFeature) -> Self {
        Self {
            id: f.properties.id,
            lon: f.properties.lon,
            lat: f.properties.lat,
        }
    }
}

impl From<&Node> for NodeFeature {
    fn from(n: &Node) -> Self {
        Self {
            properties: NodeProperties {
                id: n.id.clone(),
                lon: n.lon,
                lat: n.lat,
            },
        }
    }
}

impl From<EdgeFeature> for EdgeRecord {
    fn from(f: EdgeFeature) -> Self {
        let p = f.properties;
        Self {
            id: p.id,
            u: p.u,
            v: p.v,
            length: p.length,
            geometry: f.geometry.coordinates,
            oneway: p.oneway,
            oneway_bicycle: p.oneway_bicycle,
            category: p.category,
            parent_category: p.parent_category,
        }
    }
}

impl From<&Edge> for EdgeFeature {
    fn from(e: &Edge) -> Self {
        Self {
            properties: EdgeProperties {
                id: e.source_id.clone(),
                u: e.u.clone(),
                v: e.v.clone(),
                length: e.length,
                oneway: e.oneway.clone(),
                oneway_bicycle: e.oneway_bicycle.clone(),
                category: e.category.clone(),
                parent_category: e.parent_category.clone(),
            },
            geometry: LineGeometry {
                coordinates: e.geometry.clone(),
            },
        }
    }
}
