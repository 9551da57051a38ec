// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Lossless JSON representation of a [Graph], used for persistence and interoperability.
//!
//! ```json
//! {
//!   "nodes": [{"properties": {"id": "1", "lon": 10.75, "lat": 59.91}}],
//!   "edges": [{
//!     "properties": {"id": "42", "u": "1", "v": "2", "length": 12.5, "oneway": "yes",
//!                    "onewayBicycle": "no", "category": "residential", "parent": "road"},
//!     "geometry": {"coordinates": [[10.75, 59.91], [10.76, 59.91]]}
//!   }]
//! }
//! ```
//!
//! Only edges coming directly from segment records are stored; reverse edges
//! are synthesized again when the document is loaded.

use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::{EdgeRecord, Error, Graph, NodeRecord};

mod model;

pub use model::{Document, EdgeFeature, EdgeProperties, LineGeometry, NodeFeature, NodeProperties};

/// Format of an interchange file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Unknown format - guess the compression based on the content when reading,
    /// or on the file extension when writing
    #[default]
    Unknown,

    /// Force uncompressed JSON
    Json,

    /// Force JSON with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    JsonGz,

    /// Force JSON with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    JsonBz2,
}

impl FileFormat {
    /// Guesses the format from the leading bytes of a file.
    pub fn detect(head: &[u8]) -> Self {
        if head.starts_with(&[0x1f, 0x8b]) {
            Self::JsonGz
        } else if head.starts_with(b"BZh") {
            Self::JsonBz2
        } else {
            Self::Json
        }
    }

    /// Guesses the format from a file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("gz") => Self::JsonGz,
            Some("bz2") => Self::JsonBz2,
            _ => Self::Json,
        }
    }
}

/// Additional controls for reading and writing interchange documents.
#[derive(Debug, Default, Clone)]
pub struct Options {
    pub file_format: FileFormat,

    /// Indent the written JSON. Ignored when reading.
    pub pretty: bool,
}

impl Graph {
    /// Converts the graph into an interchange [Document].
    pub fn to_interchange(&self) -> Document {
        Document {
            nodes: self.iter().map(Into::into).collect(),
            edges: self
                .edges()
                .filter(|e| !e.id.reversed)
                .map(Into::into)
                .collect(),
        }
    }

    /// Builds a graph from an interchange [Document], see [Graph::build].
    pub fn from_interchange(document: Document) -> Result<Self, Error> {
        Self::build(
            document.nodes.into_iter().map(NodeRecord::from),
            document.edges.into_iter().map(EdgeRecord::from),
        )
    }
}

/// Reads a [Graph] from a reader as per the provided [Options].
///
/// The provided stream is automatically wrapped in a buffered reader.
pub fn load_from_io<R: io::Read>(options: &Options, reader: R) -> Result<Graph, Error> {
    let mut reader = io::BufReader::new(reader);

    let file_format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(reader.fill_buf()?),
        f => f,
    };

    let document: Document = match file_format {
        FileFormat::Unknown | FileFormat::Json => serde_json::from_reader(reader)?,

        FileFormat::JsonGz => {
            let d = flate2::read::MultiGzDecoder::new(reader);
            serde_json::from_reader(io::BufReader::new(d))?
        }

        FileFormat::JsonBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(reader);
            serde_json::from_reader(io::BufReader::new(d))?
        }
    };

    Graph::from_interchange(document)
}

/// Reads a [Graph] from a file at the provided path as per the provided [Options].
pub fn load_from_file<P: AsRef<Path>>(options: &Options, path: P) -> Result<Graph, Error> {
    let f = File::open(path.as_ref())?;
    let g = load_from_io(options, f)?;
    log::info!("loaded graph from {}", path.as_ref().display());
    Ok(g)
}

/// Reads a [Graph] from an in-memory buffer as per the provided [Options].
pub fn load_from_buffer(options: &Options, data: &[u8]) -> Result<Graph, Error> {
    let file_format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(data),
        f => f,
    };

    if file_format == FileFormat::Json {
        // Fast path is available for in-memory JSON data
        let document: Document = serde_json::from_slice(data)?;
        Graph::from_interchange(document)
    } else {
        let options = Options {
            file_format,
            ..options.clone()
        };
        load_from_io(&options, io::Cursor::new(data))
    }
}

/// Writes a [Graph] into a writer as per the provided [Options].
/// [FileFormat::Unknown] is written as uncompressed JSON.
pub fn save_to_io<W: io::Write>(g: &Graph, options: &Options, writer: W) -> Result<(), Error> {
    let document = g.to_interchange();
    let writer = io::BufWriter::new(writer);

    let mut writer = match options.file_format {
        FileFormat::Unknown | FileFormat::Json => write_json(writer, &document, options.pretty)?,

        FileFormat::JsonGz => {
            let e = flate2::write::GzEncoder::new(writer, flate2::Compression::default());
            write_json(e, &document, options.pretty)?.finish()?
        }

        FileFormat::JsonBz2 => {
            let e = bzip2::write::BzEncoder::new(writer, bzip2::Compression::default());
            write_json(e, &document, options.pretty)?.finish()?
        }
    };

    writer.flush()?;
    Ok(())
}

/// Writes a [Graph] into a file at the provided path as per the provided [Options].
/// With [FileFormat::Unknown], the compression is picked based on the file extension.
pub fn save_to_file<P: AsRef<Path>>(g: &Graph, options: &Options, path: P) -> Result<(), Error> {
    let options = match options.file_format {
        FileFormat::Unknown => Options {
            file_format: FileFormat::from_path(path.as_ref()),
            ..options.clone()
        },
        _ => options.clone(),
    };

    let f = File::create(path.as_ref())?;
    save_to_io(g, &options, f)?;
    log::info!("saved graph to {}", path.as_ref().display());
    Ok(())
}

fn write_json<W: io::Write>(mut writer: W, document: &Document, pretty: bool) -> Result<W, Error> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, document)?;
    } else {
        serde_json::to_writer(&mut writer, document)?;
    }
    Ok(writer)
}
