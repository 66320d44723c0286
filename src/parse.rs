//! Loading a local marker graph from a line-oriented text file.
//!
//! Each line is a tab-separated record, and the first field is the record type:
//!
//! ```text
//! K  <k>
//! V  <vertexId> <distance> <rank> <kmer>
//! M  <markerId> <readId> <strand> <ordinal> <position> <repeatCounts>
//! E  <sourceVertexId> <targetVertexId> [tags...]
//! I  <readId> <strand> <ord0> <ord1> <sequence|overlapCount> <repeatCounts|*>
//! A  <readId> <strand> <ord0> <ord1> <alignedRow> <repeatCounts>
//! ```
//!
//! `M` records attach to the preceding `V` record, and `I` and `A` records to the preceding `E` record.
//! Repeat counts are comma-separated.
//! Edge tags use the GFA `TAG:i:VALUE` form: `ST` (spanning tree), `BP` (best path), `DG` (DAG edge, default 1), `ID` (edge id), `AE` and `AP` (assembly edge and position).
//! Empty lines and lines starting with `#` are ignored.

use crate::coverage::{AlignedBase, Base};
use crate::graph::{
    AlignmentRow, EdgeAlignment, EdgeSequence, GraphError, LocalMarkerGraph, LocalMarkerGraphEdge,
    LocalMarkerGraphVertex, Marker, MarkerInfo,
};
use crate::marker_interval::{MarkerInterval, MarkerIntervalWithRepeatCounts, OrientedReadId};

use log::{debug, info};
use rustc_hash::FxHashMap;
use thiserror::Error;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

//-----------------------------------------------------------------------------

/// Errors from loading a local marker graph.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Line {line}: {source}")]
    Graph {
        line: usize,
        #[source]
        source: GraphError,
    },
}

impl ParseError {
    /// Returns the line number of the offending record, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Syntax { line, .. } | ParseError::Graph { line, .. } => Some(*line),
            _ => None,
        }
    }
}

fn syntax(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::Syntax { line, message: message.into() }
}

fn graph_error(line: usize) -> impl FnOnce(GraphError) -> ParseError {
    move |source| ParseError::Graph { line, source }
}

//-----------------------------------------------------------------------------

fn field<T: FromStr>(
    fields: &[&str],
    index: usize,
    name: &str,
    line: usize,
) -> Result<T, ParseError> {
    let value = fields.get(index)
        .ok_or_else(|| syntax(line, format!("Missing field {}", name)))?;
    value.parse().map_err(|_| syntax(line, format!("Invalid {} {:?}", name, value)))
}

fn parse_bases(value: &str, line: usize) -> Result<Vec<Base>, ParseError> {
    value.chars()
        .map(|c| Base::from_char(c).ok_or_else(|| syntax(line, format!("Invalid base {:?}", c))))
        .collect()
}

fn parse_aligned_bases(value: &str, line: usize) -> Result<Vec<AlignedBase>, ParseError> {
    value.chars()
        .map(|c| {
            AlignedBase::from_char(c)
                .ok_or_else(|| syntax(line, format!("Invalid aligned base {:?}", c)))
        })
        .collect()
}

// Comma-separated repeat counts, with `*` or a missing field for counts that were not recorded.
fn parse_repeat_counts(value: Option<&str>, line: usize) -> Result<Vec<u8>, ParseError> {
    let value = match value {
        None | Some("*") | Some("") => return Ok(Vec::new()),
        Some(value) => value,
    };
    value.split(',')
        .map(|count| {
            count.trim().parse::<u8>()
                .map_err(|_| syntax(line, format!("Invalid repeat count {:?}", count)))
        })
        .collect()
}

fn parse_oriented_read(fields: &[&str], line: usize) -> Result<OrientedReadId, ParseError> {
    let read_id: u32 = field(fields, 1, "read id", line)?;
    let strand: u8 = field(fields, 2, "strand", line)?;
    if strand > 1 {
        return Err(syntax(line, format!("Invalid strand {}", strand)));
    }
    Ok(OrientedReadId::new(read_id, strand))
}

fn parse_interval(fields: &[&str], line: usize) -> Result<MarkerInterval, ParseError> {
    let oriented_read_id = parse_oriented_read(fields, line)?;
    let ordinal0: u32 = field(fields, 3, "first ordinal", line)?;
    let ordinal1: u32 = field(fields, 4, "second ordinal", line)?;
    if ordinal1 < ordinal0 {
        let message = format!("Ordinals {} and {} are not in order", ordinal0, ordinal1);
        return Err(syntax(line, message));
    }
    Ok(MarkerInterval::new(oriented_read_id, ordinal0, ordinal1))
}

// Applies a `TAG:i:VALUE` edge tag. Unknown tags are ignored.
fn apply_tag(edge: &mut LocalMarkerGraphEdge, tag: &str, line: usize) -> Result<(), ParseError> {
    let parts: Vec<&str> = tag.splitn(3, ':').collect();
    if parts.len() != 3 || parts[1] != "i" {
        return Err(syntax(line, format!("Invalid tag {:?}", tag)));
    }
    let value: u64 = parts[2].parse()
        .map_err(|_| syntax(line, format!("Invalid tag value {:?}", tag)))?;
    match parts[0] {
        "ST" => edge.is_spanning_tree_edge = value != 0,
        "BP" => edge.is_spanning_tree_best_path_edge = value != 0,
        "DG" => edge.is_dag_edge = value != 0,
        "ID" => edge.edge_id = value,
        "AE" => edge.assembly_edge_id = value,
        "AP" => {
            edge.position_in_assembly_edge = u32::try_from(value)
                .map_err(|_| syntax(line, format!("Position {} is too large", value)))?;
        }
        _ => debug!("Line {}: ignoring tag {}", line, tag),
    }
    Ok(())
}

//-----------------------------------------------------------------------------

// An edge is added to the graph once all of its interval and alignment records have been read.
struct PendingEdge {
    line: usize,
    edge: LocalMarkerGraphEdge,
    alignment: Vec<AlignmentRow>,
}

#[derive(Default)]
struct Loader {
    graph: Option<LocalMarkerGraph>,
    marker_ids: FxHashMap<u64, usize>,
    vertex: Option<u64>,
    edge: Option<PendingEdge>,
}

impl Loader {
    fn graph(&mut self, line: usize) -> Result<&mut LocalMarkerGraph, ParseError> {
        self.graph.as_mut().ok_or_else(|| syntax(line, "Record before the K record"))
    }

    fn finish_edge(&mut self) -> Result<(), ParseError> {
        if let Some(pending) = self.edge.take() {
            let PendingEdge { line, mut edge, alignment } = pending;
            if !alignment.is_empty() {
                edge.alignment = Some(EdgeAlignment::new(alignment).map_err(graph_error(line))?);
            }
            self.graph(line)?.add_edge(edge).map_err(graph_error(line))?;
        }
        Ok(())
    }

    fn record(&mut self, fields: &[&str], line: usize) -> Result<(), ParseError> {
        match fields[0] {
            "K" => {
                if self.graph.is_some() {
                    return Err(syntax(line, "Duplicate K record"));
                }
                let k: usize = field(fields, 1, "k", line)?;
                self.graph = Some(LocalMarkerGraph::new(k));
            }
            "V" => {
                self.finish_edge()?;
                let vertex_id: u64 = field(fields, 1, "vertex id", line)?;
                let distance: usize = field(fields, 2, "distance", line)?;
                let rank: usize = field(fields, 3, "rank", line)?;
                let kmer = parse_bases(fields.get(4).copied().unwrap_or(""), line)?;
                let vertex = LocalMarkerGraphVertex::new(vertex_id, distance, rank, kmer);
                self.graph(line)?.add_vertex(vertex).map_err(graph_error(line))?;
                self.vertex = Some(vertex_id);
            }
            "M" => {
                let vertex_id = self.vertex.filter(|_| self.edge.is_none())
                    .ok_or_else(|| syntax(line, "M record without a preceding V record"))?;
                let file_marker_id: u64 = field(fields, 1, "marker id", line)?;
                let oriented_read_id = parse_oriented_read(&fields[1..], line)?;
                let ordinal: u32 = field(fields, 4, "ordinal", line)?;
                let position: u32 = field(fields, 5, "position", line)?;
                let repeat_counts = parse_repeat_counts(fields.get(6).copied(), line)?;
                if self.marker_ids.contains_key(&file_marker_id) {
                    return Err(syntax(line, format!("Duplicate marker {}", file_marker_id)));
                }
                let graph = self.graph(line)?;
                let marker_id = graph.add_marker(Marker { position, repeat_counts });
                let info = MarkerInfo { marker_id, oriented_read_id, ordinal };
                graph.add_marker_info(vertex_id, info).map_err(graph_error(line))?;
                self.marker_ids.insert(file_marker_id, marker_id);
            }
            "E" => {
                self.finish_edge()?;
                self.vertex = None;
                let source: u64 = field(fields, 1, "source vertex", line)?;
                let target: u64 = field(fields, 2, "target vertex", line)?;
                let mut edge = LocalMarkerGraphEdge::new(source, target);
                for tag in fields.iter().skip(3) {
                    apply_tag(&mut edge, tag, line)?;
                }
                self.edge = Some(PendingEdge { line, edge, alignment: Vec::new() });
            }
            "I" => {
                let interval = parse_interval(fields, line)?;
                let sequence = fields.get(5).copied()
                    .ok_or_else(|| syntax(line, "Missing field sequence"))?;
                let is_overlap = !sequence.is_empty()
                    && sequence.chars().all(|c| c.is_ascii_digit());
                let sequence = if is_overlap {
                    let overlap: u8 = sequence.parse()
                        .map_err(|_| syntax(line, format!("Invalid overlap {:?}", sequence)))?;
                    EdgeSequence::overlap(overlap)
                } else {
                    EdgeSequence::bases(parse_bases(sequence, line)?)
                };
                let repeat_counts = parse_repeat_counts(fields.get(6).copied(), line)?;
                let pending = self.edge.as_mut()
                    .ok_or_else(|| syntax(line, "I record without a preceding E record"))?;
                let interval = MarkerIntervalWithRepeatCounts::new(interval, repeat_counts);
                pending.edge.add_interval(sequence, interval);
            }
            "A" => {
                let interval = parse_interval(fields, line)?;
                let bases = parse_aligned_bases(fields.get(5).copied().unwrap_or(""), line)?;
                let repeat_counts = parse_repeat_counts(fields.get(6).copied(), line)?;
                let pending = self.edge.as_mut()
                    .ok_or_else(|| syntax(line, "A record without a preceding E record"))?;
                pending.alignment.push(AlignmentRow {
                    interval: MarkerIntervalWithRepeatCounts::new(interval, repeat_counts),
                    bases,
                });
            }
            other => return Err(syntax(line, format!("Unknown record type {:?}", other))),
        }
        Ok(())
    }
}

//-----------------------------------------------------------------------------

/// Reads a local marker graph from text records.
pub fn parse_graph<R: BufRead>(reader: R) -> Result<LocalMarkerGraph, ParseError> {
    let mut loader = Loader::default();
    let mut last_line = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        last_line = index + 1;
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        loader.record(&fields, index + 1)?;
    }
    loader.finish_edge()?;
    loader.graph.ok_or_else(|| syntax(last_line, "Missing K record"))
}

/// Loads a local marker graph from a file.
pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<LocalMarkerGraph, ParseError> {
    let path = path.as_ref();
    info!("Loading local marker graph from {:?}...", path);
    let file = File::open(path)
        .map_err(|source| ParseError::Open { path: path.to_path_buf(), source })?;
    let graph = parse_graph(BufReader::new(file))?;
    info!(
        "Found {} vertices, {} edges, k = {}",
        graph.vertices().len(), graph.edges().len(), graph.k()
    );
    Ok(graph)
}

//-----------------------------------------------------------------------------
