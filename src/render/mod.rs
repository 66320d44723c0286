//! Graphviz output for a local marker graph.
//!
//! The output is a directed graph with a prologue of global directives, one attribute block per vertex, and one attribute block per edge.
//! Compact output draws vertices as points and is laid out with `sfdp`; it is intended for large neighborhoods.
//! Detailed output draws rectangles with HTML-like tables of the supporting reads and the consensus, laid out left to right with `dot`.
//!
//! Blocks are emitted in the storage order of the graph, and the output is identical for identical inputs.
//! A block that fails an internal-consistency check aborts the render before anything is written for it.

use crate::consensus::ConsensusCaller;
use crate::error::{RenderError, Result};
use crate::graph::LocalMarkerGraph;
use crate::marker_interval::OrientedReadId;

use log::{debug, info};
use rayon::prelude::*;

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

mod edge;
mod vertex;

pub use edge::edge_color;
pub use vertex::vertex_color;


//-----------------------------------------------------------------------------

/// Options shared by all vertex and edge blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Vertices and edges with lower coverage are drawn in red.
    pub min_coverage: usize,

    /// Vertices at this distance from the center are on the boundary of the local graph.
    pub max_distance: usize,

    /// Detailed output with HTML-like tables instead of compact output.
    pub detailed: bool,

    /// Show internal vertex and edge identifiers.
    pub show_vertex_id: bool,
}

// Significant digits for vertex sizes and edge thicknesses.
const SIZE_PRECISION: usize = 4;

// Sequences and repeat counts longer than this are not shown in edge tables.
const MAX_SEQUENCE_DISPLAY_LENGTH: usize = 100;

const TOO_LONG: &str = "Too long";

//-----------------------------------------------------------------------------

/// Returns the read exploration link for an oriented read, highlighting the given markers.
///
/// The link is not escaped; table cells escape `&` when they are serialized.
pub fn read_href(oriented_read_id: OrientedReadId, highlight_markers: &[u32]) -> String {
    let mut href = format!(
        "exploreRead?readId={}&strand={}",
        oriented_read_id.read_id(), oriented_read_id.strand()
    );
    for ordinal in highlight_markers {
        let _ = write!(href, "&highlightMarker={}", ordinal);
    }
    href
}

// Space-separated `key=value` pairs in square brackets.
#[derive(Clone, Debug, Default)]
struct Attributes {
    items: Vec<String>,
}

impl Attributes {
    fn push(&mut self, key: &str, value: impl std::fmt::Display) {
        self.items.push(format!("{}={}", key, value));
    }

    fn push_quoted(&mut self, key: &str, value: impl std::fmt::Display) {
        self.items.push(format!("{}=\"{}\"", key, value));
    }

    fn finish(self) -> String {
        format!("[{}]", self.items.join(" "))
    }
}

//-----------------------------------------------------------------------------

/// Writes a local marker graph in Graphviz format.
pub struct GraphWriter<'a> {
    graph: &'a LocalMarkerGraph,
    caller: &'a dyn ConsensusCaller,
    options: RenderOptions,
}

impl<'a> GraphWriter<'a> {
    pub fn new(
        graph: &'a LocalMarkerGraph,
        caller: &'a dyn ConsensusCaller,
        options: RenderOptions,
    ) -> Self {
        GraphWriter { graph, caller, options }
    }

    /// Returns the global directives that follow the graph header.
    pub fn prologue(&self) -> String {
        // This turns off the tooltip on the graph and the edges.
        let mut result = String::from("tooltip = \" \";\n");
        if self.options.detailed {
            result.push_str("layout=dot;\n");
            result.push_str("rankdir=LR;\n");
            result.push_str("ratio=expand;\n");
            result.push_str("node [fontname = \"Courier New\" shape=rectangle];\n");
            result.push_str("edge [fontname = \"Courier New\"];\n");
        } else {
            result.push_str("layout=sfdp;\n");
            result.push_str("smoothing=triangle;\n");
            result.push_str("ratio=expand;\n");
            result.push_str("node [shape=point];\n");
        }
        result
    }

    // Vertex statement, including the terminating newline.
    fn vertex_statement(&self, index: usize) -> Result<String> {
        let vertex = &self.graph.vertices()[index];
        Ok(format!("{}{};\n", vertex.vertex_id, self.vertex_attributes(vertex)?))
    }

    fn edge_statement(&self, index: usize) -> Result<String> {
        let edge = &self.graph.edges()[index];
        Ok(format!("{}->{} {};\n", edge.source, edge.target, self.edge_attributes(edge)?))
    }

    /// Writes the graph sequentially.
    ///
    /// Each block is checked before it is written, so a failure leaves only complete blocks in the output.
    pub fn write<W: Write>(&self, out: &mut W) -> Result<()> {
        debug!(
            "Writing {} vertices and {} edges ({} output)",
            self.graph.vertices().len(), self.graph.edges().len(),
            if self.options.detailed { "detailed" } else { "compact" }
        );
        out.write_all(b"digraph G {\n")?;
        out.write_all(self.prologue().as_bytes())?;
        for index in 0..self.graph.vertices().len() {
            out.write_all(self.vertex_statement(index)?.as_bytes())?;
        }
        for index in 0..self.graph.edges().len() {
            out.write_all(self.edge_statement(index)?.as_bytes())?;
        }
        out.write_all(b"}\n")?;
        Ok(())
    }

    /// Writes the graph, formatting the blocks in parallel on the current rayon pool.
    ///
    /// The output is identical to [`GraphWriter::write`], including the point where a failing block stops it.
    pub fn write_parallel<W: Write>(&self, out: &mut W) -> Result<()> {
        debug!(
            "Formatting {} vertices and {} edges in parallel using {} threads",
            self.graph.vertices().len(), self.graph.edges().len(), rayon::current_num_threads()
        );
        let vertices: Vec<Result<String>> = (0..self.graph.vertices().len())
            .into_par_iter()
            .map(|index| self.vertex_statement(index))
            .collect();
        let edges: Vec<Result<String>> = (0..self.graph.edges().len())
            .into_par_iter()
            .map(|index| self.edge_statement(index))
            .collect();

        out.write_all(b"digraph G {\n")?;
        out.write_all(self.prologue().as_bytes())?;
        for statement in vertices.into_iter().chain(edges) {
            out.write_all(statement?.as_bytes())?;
        }
        out.write_all(b"}\n")?;
        Ok(())
    }

    /// Creates the file and writes the graph to it.
    pub fn write_file<P: AsRef<Path>>(&self, path: P, parallel: bool) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|source| RenderError::Create { path: path.to_path_buf(), source })?;
        let mut out = BufWriter::new(file);
        info!("Writing {:?}...", path);
        if parallel {
            self.write_parallel(&mut out)?;
        } else {
            self.write(&mut out)?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Writes the local marker graph in Graphviz format.
pub fn render<W: Write>(
    graph: &LocalMarkerGraph,
    options: RenderOptions,
    caller: &dyn ConsensusCaller,
    out: &mut W,
) -> Result<()> {
    GraphWriter::new(graph, caller, options).write(out)
}

/// Renders the local marker graph into a string.
pub fn render_to_string(
    graph: &LocalMarkerGraph,
    options: RenderOptions,
    caller: &dyn ConsensusCaller,
) -> Result<String> {
    let mut buffer: Vec<u8> = Vec::new();
    render(graph, options, caller, &mut buffer)?;
    // Everything written is ASCII or escaped HTML.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
