use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use veinett::interchange::{self, FileFormat};
use veinett::{Graph, Network, Pathfinder};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct GraphLoadError(PathBuf, #[source] veinett::Error);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Auto,
    Json,
    JsonGz,
    JsonBz2,
}

impl From<Format> for FileFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Auto => FileFormat::Unknown,
            Format::Json => FileFormat::Json,
            Format::JsonGz => FileFormat::JsonGz,
            Format::JsonBz2 => FileFormat::JsonBz2,
        }
    }
}

#[derive(Parser)]
struct Cli {
    /// Format of the graph file
    #[arg(long, value_enum, default_value_t = Format::Auto)]
    format: Format,

    /// Treat the graph path as an SQLite database with `nodes` and `edges` tables
    /// (requires the `sqlite` feature)
    #[arg(long)]
    sqlite: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the shortest route between two positions and print it as GeoJSON
    Route {
        /// The path to the graph file
        graph: PathBuf,

        /// Latitude of the start point
        start_lat: f64,

        /// Longitude of the start point
        start_lon: f64,

        /// Latitude of the end point
        end_lat: f64,

        /// Longitude of the end point
        end_lon: f64,
    },

    /// Print the id of the node closest to a position
    Nearest {
        /// The path to the graph file
        graph: PathBuf,

        lat: f64,

        lon: f64,
    },

    /// Print graph statistics and check whether all nodes are reachable
    Check {
        /// The path to the graph file
        graph: PathBuf,
    },
}

impl Command {
    fn graph_path(&self) -> &Path {
        match self {
            Self::Route { graph, .. } | Self::Nearest { graph, .. } | Self::Check { graph } => {
                graph
            }
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();
    let path = cli.command.graph_path();

    if cli.sqlite {
        return run_sqlite(&cli.command, path);
    }

    let g = load_graph(path, cli.format.into())?;
    run(&cli.command, &g, &g)
}

#[cfg(feature = "sqlite")]
fn run_sqlite(command: &Command, path: &Path) -> Result<(), Box<dyn Error>> {
    let network = veinett::SqliteNetwork::open(path, veinett::store::Options::default())
        .map_err(|e| GraphLoadError(path.to_path_buf(), e))?;
    run(command, &network, network.graph())
}

#[cfg(not(feature = "sqlite"))]
fn run_sqlite(_: &Command, _: &Path) -> Result<(), Box<dyn Error>> {
    Err("--sqlite requires veinett to be built with the \"sqlite\" feature".into())
}

fn run<N: Network>(command: &Command, network: &N, g: &Graph) -> Result<(), Box<dyn Error>> {
    match *command {
        Command::Route {
            start_lat,
            start_lon,
            end_lat,
            end_lon,
            ..
        } => {
            let route =
                Pathfinder::new(network).route_between(start_lat, start_lon, end_lat, end_lon)?;
            if !route.is_found() {
                return Err(format!("no route from {} to {}", route.start(), route.end()).into());
            }

            let summary = route.summary();
            let coordinates: Vec<[f64; 2]> = route
                .node_ids()
                .filter_map(|id| network.get_node(id))
                .map(|n| [n.lon, n.lat])
                .collect();

            let collection = serde_json::json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "properties": {
                        "edges": summary.edges,
                        "nodes": summary.nodes,
                        "totalMeters": summary.total_meters,
                    },
                    "geometry": {
                        "type": "LineString",
                        "coordinates": coordinates,
                    },
                }],
            });
            println!("{}", serde_json::to_string_pretty(&collection)?);
        }

        Command::Nearest { lat, lon, .. } => {
            println!("{}", network.find_nearest_node(lat, lon)?.id);
        }

        Command::Check { .. } => {
            println!("nodes: {}", g.len());
            println!("edges: {}", g.edge_count());
            println!("connected: {}", g.is_connected());
        }
    }

    Ok(())
}

fn load_graph<P: AsRef<Path>>(path: P, file_format: FileFormat) -> Result<Graph, GraphLoadError> {
    let options = interchange::Options {
        file_format,
        ..Default::default()
    };
    match interchange::load_from_file(&options, path.as_ref()) {
        Ok(g) => Ok(g),
        Err(e) => Err(GraphLoadError(PathBuf::from(path.as_ref()), e)),
    }
}
