// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Reading street networks from an SQLite table pair (feature `sqlite`).
//!
//! The expected schema is:
//!
//! ```sql
//! CREATE TABLE nodes (id, lon REAL, lat REAL);
//! CREATE TABLE edges (id, u, v, length REAL, geometry TEXT, oneway TEXT,
//!                     oneway_bicycle TEXT, category TEXT, parent TEXT);
//! ```
//!
//! Ids may be stored as integers or text. `geometry` holds a JSON array of `[lon, lat]`
//! pairs, or NULL. Rows are read in `rowid` order, which is the insertion order of the graph.

use std::path::{Path, PathBuf};

use rusqlite::functions::FunctionFlags;
use rusqlite::types::{Type, ValueRef};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row};

use crate::{
    earth_distance, Edge, EdgeId, EdgeRecord, Edges, Error, Graph, Network, Node, NodeRecord,
    Polyline,
};

/// Names of the tables holding the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub nodes_table: String,
    pub edges_table: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            nodes_table: "nodes".to_string(),
            edges_table: "edges".to_string(),
        }
    }
}

/// Builds a [Graph] from the node and edge tables of an SQLite database.
pub fn load_graph<P: AsRef<Path>>(path: P, options: &Options) -> Result<Graph, Error> {
    let conn = connect(path.as_ref())?;

    let nodes = {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, lon, lat FROM {} ORDER BY rowid",
            quote_identifier(&options.nodes_table)
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(NodeRecord {
                id: id_column(row, 0)?,
                lon: row.get(1)?,
                lat: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    let edges = {
        let mut stmt = conn.prepare(&format!(
            "SELECT id, u, v, length, geometry, oneway, oneway_bicycle, category, parent \
             FROM {} ORDER BY rowid",
            quote_identifier(&options.edges_table)
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(EdgeRecord {
                id: id_column(row, 0)?,
                u: id_column(row, 1)?,
                v: id_column(row, 2)?,
                length: row.get(3)?,
                geometry: geometry_column(row, 4)?,
                oneway: row.get(5)?,
                oneway_bicycle: row.get(6)?,
                category: row.get(7)?,
                parent_category: row.get(8)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    log::info!(
        "read {} nodes and {} segments from {}",
        nodes.len(),
        edges.len(),
        path.as_ref().display()
    );
    Graph::build(nodes, edges)
}

/// [Network] backed by an SQLite database.
///
/// The adjacency is loaded into memory once, when the network is opened.
/// Nearest-node lookups are answered by the database, each one on its own
/// short-lived read-only connection.
#[derive(Debug)]
pub struct SqliteNetwork {
    graph: Graph,
    path: PathBuf,
    options: Options,
}

impl SqliteNetwork {
    pub fn open<P: AsRef<Path>>(path: P, options: Options) -> Result<Self, Error> {
        let graph = load_graph(path.as_ref(), &options)?;
        Ok(Self {
            graph,
            path: path.as_ref().to_path_buf(),
            options,
        })
    }

    /// Returns the in-memory adjacency loaded from the database.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Queries the database for the id of the node closest to the given position.
    /// Ties are resolved in favor of the lowest `rowid`.
    pub fn nearest_node_id(&self, lat: f64, lon: f64) -> Result<Option<String>, Error> {
        let conn = connect(&self.path)?;
        let id = conn
            .query_row(
                &format!(
                    "SELECT id FROM {} ORDER BY earth_distance(?1, ?2, lat, lon), rowid LIMIT 1",
                    quote_identifier(&self.options.nodes_table)
                ),
                rusqlite::params![lat, lon],
                |row| id_column(row, 0),
            )
            .optional()?;
        Ok(id)
    }
}

impl Network for SqliteNetwork {
    fn get_node(&self, id: &str) -> Option<&Node> {
        self.graph.get_node(id)
    }

    fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.graph.get_edge(id)
    }

    fn get_edges(&self, from_id: &str) -> Edges<'_> {
        self.graph.get_edges(from_id)
    }

    fn find_nearest_node(&self, lat: f64, lon: f64) -> Result<&Node, Error> {
        let id = self.nearest_node_id(lat, lon)?.ok_or(Error::EmptyGraph)?;
        self.graph.get_node(&id).ok_or(Error::UnknownNode(id))
    }
}

/// Opens a read-only connection with the `earth_distance(lat1, lon1, lat2, lon2)`
/// SQL function registered.
fn connect(path: &Path) -> Result<Connection, Error> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    conn.create_scalar_function(
        "earth_distance",
        4,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            Ok(earth_distance(
                ctx.get(0)?,
                ctx.get(1)?,
                ctx.get(2)?,
                ctx.get(3)?,
            ))
        },
    )?;

    Ok(conn)
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn id_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    match row.get_ref(idx)? {
        ValueRef::Integer(i) => Ok(i.to_string()),
        ValueRef::Text(t) => Ok(String::from_utf8_lossy(t).into_owned()),
        other => Err(rusqlite::Error::InvalidColumnType(
            idx,
            row.as_ref().column_name(idx).unwrap_or_default().to_string(),
            other.data_type(),
        )),
    }
}

fn geometry_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Polyline> {
    match row.get::<_, Option<String>>(idx)? {
        Some(text) => serde_json::from_str(&text)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))),
        None => Ok(Polyline::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::find_route;

    fn create_database(path: &Path, nodes_table: &str, edges_table: &str) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(&format!(
            "CREATE TABLE {nodes} (id, lon REAL, lat REAL);
             CREATE TABLE {edges} (
                 id, u, v,
                 length         REAL,
                 geometry       TEXT,
                 oneway         TEXT,
                 oneway_bicycle TEXT,
                 category       TEXT,
                 parent         TEXT
             );
             INSERT INTO {nodes} (id, lon, lat) VALUES
                 (10, 10.750, 59.910),
                 ('20', 10.760, 59.910),
                 (30, 10.760, 59.915),
                 (31, 10.760, 59.915);
             INSERT INTO {edges} VALUES
                 (501, 10, 20, 560.0, '[[10.75,59.91],[10.76,59.91]]', 'yes', 'no', 'residential', 'road'),
                 (502, 20, 30, 556.0, NULL, 'yes', NULL, 'cycleway', 'bike'),
                 (503, 30, 31, 0.0, NULL, NULL, NULL, NULL, NULL);",
            nodes = quote_identifier(nodes_table),
            edges = quote_identifier(edges_table),
        ))
        .unwrap();
    }

    #[test]
    fn load() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("network.db");
        create_database(&path, "nodes", "edges");

        let g = load_graph(&path, &Options::default()).unwrap();
        assert_eq!(
            g.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
            ["10", "20", "30", "31"]
        );
        assert_eq!(g.edge_count(), 5);

        let contraflow = g.get_edge(EdgeId::reverse(0)).unwrap();
        assert_eq!(contraflow.source_id, "501");
        assert_eq!(contraflow.u, "20");
        assert_eq!(
            contraflow.geometry.coordinates(),
            &[[10.76, 59.91], [10.75, 59.91]]
        );
        assert!(g.get_edge(EdgeId::reverse(1)).is_none());
        assert!(g.get_edge(EdgeId::reverse(2)).is_some());
    }

    #[test]
    fn nearest_node() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("network.db");
        create_database(&path, "nodes", "edges");

        let network = SqliteNetwork::open(&path, Options::default()).unwrap();
        assert_eq!(network.find_nearest_node(59.9101, 10.7501).unwrap().id, "10");

        // 30 and 31 share a position - the first row wins
        assert_eq!(network.find_nearest_node(59.915, 10.760).unwrap().id, "30");

        // Same answers as the in-memory scan
        for n in network.graph().iter() {
            assert_eq!(
                network.find_nearest_node(n.lat, n.lon).unwrap(),
                network.graph().find_nearest_node(n.lat, n.lon).unwrap(),
            );
        }
    }

    #[test]
    fn route() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("network.db");
        create_database(&path, "street_nodes", "street \"edges\"");

        let options = Options {
            nodes_table: "street_nodes".to_string(),
            edges_table: "street \"edges\"".to_string(),
        };
        let network = SqliteNetwork::open(&path, options).unwrap();

        let route = find_route(&network, "10", "31").unwrap();
        assert_eq!(
            route.edge_ids().map(|id| id.to_string()).collect::<Vec<_>>(),
            ["0", "1", "2"]
        );
        assert_eq!(route.total_meters(), 1116.0);

        let route = find_route(&network, "30", "10").unwrap();
        assert!(!route.is_found());
    }

    #[test]
    fn missing_table() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("network.db");
        create_database(&path, "nodes", "edges");

        let options = Options {
            nodes_table: "vertices".to_string(),
            ..Options::default()
        };
        assert!(matches!(
            load_graph(&path, &options),
            Err(Error::Sqlite(_))
        ));
    }

    #[test]
    fn invalid_geometry() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("network.db");
        create_database(&path, "nodes", "edges");
        Connection::open(&path)
            .unwrap()
            .execute("UPDATE edges SET geometry = 'not json' WHERE id = 502", [])
            .unwrap();

        assert!(matches!(
            load_graph(&path, &Options::default()),
            Err(Error::Sqlite(_))
        ));
    }
}
