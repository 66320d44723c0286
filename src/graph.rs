//! A local marker graph: the neighborhood of a center vertex in the global marker graph.
//!
//! The local graph is built once, by the loader or by the caller, and then only read during rendering.
//! Vertex `distance` and `rank` are assigned by whoever extracted the neighborhood.
//! Vertex coverage records are derived from the supporting markers as they are added, and edge alignment column coverage from the aligned rows.

use crate::coverage::{AlignedBase, Base, Coverage};
use crate::marker_interval::{MarkerIntervalWithRepeatCounts, OrientedReadId};

use rustc_hash::FxHashMap;

use thiserror::Error;

//-----------------------------------------------------------------------------

/// Marker graph edge identifier for edges that do not correspond to a global marker graph edge.
pub const INVALID_EDGE_ID: u64 = u64::MAX;

/// Assembly graph edge identifier for edges that are not part of any assembly graph edge.
pub const INVALID_ASSEMBLY_EDGE_ID: u64 = u64::MAX;

/// Errors from building an inconsistent local marker graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Duplicate vertex {0}")]
    DuplicateVertex(u64),

    #[error("Unknown vertex {0}")]
    UnknownVertex(u64),

    #[error("Unknown marker {0}")]
    UnknownMarker(usize),

    #[error("Vertex {vertex_id} has a k-mer of length {len}, expected {k}")]
    KmerLength { vertex_id: u64, len: usize, k: usize },

    #[error("Marker {marker_id} has {len} repeat counts, expected at least {k}")]
    MarkerRepeatCounts { marker_id: usize, len: usize, k: usize },

    #[error("Alignment row {row} has {len} columns, expected {expected}")]
    AlignmentRowLength { row: usize, len: usize, expected: usize },

    #[error("Alignment row {row} has {len} repeat counts for {bases} aligned bases")]
    AlignmentRepeatCounts { row: usize, len: usize, bases: usize },
}

//-----------------------------------------------------------------------------

/// An occurrence of a marker on an oriented read, as stored in the read/marker collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Marker {
    /// Position of the marker in the run-length representation of the oriented read.
    pub position: u32,

    /// Repeat counts of the marker bases on this oriented read.
    pub repeat_counts: Vec<u8>,
}

/// A marker supporting a vertex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerInfo {
    /// Index in the marker collection of the graph.
    pub marker_id: usize,
    pub oriented_read_id: OrientedReadId,
    /// Ordinal of the marker among the markers of the oriented read.
    pub ordinal: u32,
}

/// A vertex of the local marker graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalMarkerGraphVertex {
    /// Identifier of the vertex in the global marker graph.
    pub vertex_id: u64,

    /// Distance from the center of the local graph.
    pub distance: usize,

    /// Position in an approximate topological order.
    pub rank: usize,

    /// The marker k-mer shared by all markers of the vertex.
    pub kmer: Vec<Base>,

    pub marker_infos: Vec<MarkerInfo>,

    /// Observed (base, repeat count) evidence at each k-mer position.
    pub coverages: Vec<Coverage>,
}

impl LocalMarkerGraphVertex {
    /// Creates a vertex without supporting markers.
    pub fn new(vertex_id: u64, distance: usize, rank: usize, kmer: Vec<Base>) -> Self {
        let coverages = vec![Coverage::new(); kmer.len()];
        LocalMarkerGraphVertex {
            vertex_id,
            distance,
            rank,
            kmer,
            marker_infos: Vec::new(),
            coverages,
        }
    }

    /// Returns the number of supporting markers.
    pub fn coverage(&self) -> usize {
        self.marker_infos.len()
    }
}

//-----------------------------------------------------------------------------

/// The sequence between the markers of an edge, as observed on some reads.
///
/// If the markers overlap, the sequence is empty and `overlapping_base_count` is the size of the overlap.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeSequence {
    pub sequence: Vec<Base>,
    pub overlapping_base_count: u8,
}

impl EdgeSequence {
    pub fn bases(sequence: Vec<Base>) -> Self {
        EdgeSequence { sequence, overlapping_base_count: 0 }
    }

    pub fn overlap(overlapping_base_count: u8) -> Self {
        EdgeSequence { sequence: Vec::new(), overlapping_base_count }
    }

    /// Returns the bases, or the overlapping base count if there are no bases.
    pub fn display_string(&self) -> String {
        if self.sequence.is_empty() {
            self.overlapping_base_count.to_string()
        } else {
            crate::coverage::sequence_string(&self.sequence)
        }
    }
}

/// One read in a multiple sequence alignment of the edge sequences.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlignmentRow {
    /// The interval, with one repeat count for each non-gap base.
    pub interval: MarkerIntervalWithRepeatCounts,
    pub bases: Vec<AlignedBase>,
}

impl AlignmentRow {
    /// Returns the number of non-gap bases.
    pub fn base_count(&self) -> usize {
        self.bases.iter().filter(|base| !base.is_gap()).count()
    }
}

/// A precomputed alignment of the reads supporting an edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeAlignment {
    rows: Vec<AlignmentRow>,
    coverages: Vec<Coverage>,
}

impl EdgeAlignment {
    /// Builds the alignment and the per-column coverage from the aligned rows.
    ///
    /// All rows must have the same length, and each row needs a repeat count for every non-gap base.
    /// Gaps are recorded with repeat count 0.
    pub fn new(rows: Vec<AlignmentRow>) -> Result<Self, GraphError> {
        let columns = rows.first().map(|row| row.bases.len()).unwrap_or(0);
        let mut coverages = vec![Coverage::new(); columns];
        for (i, row) in rows.iter().enumerate() {
            if row.bases.len() != columns {
                return Err(GraphError::AlignmentRowLength {
                    row: i,
                    len: row.bases.len(),
                    expected: columns,
                });
            }
            let repeat_counts = row.interval.repeat_counts();
            let bases = row.base_count();
            if repeat_counts.len() < bases {
                return Err(GraphError::AlignmentRepeatCounts {
                    row: i,
                    len: repeat_counts.len(),
                    bases,
                });
            }
            let mut position = 0;
            for (coverage, base) in coverages.iter_mut().zip(row.bases.iter()) {
                if base.is_gap() {
                    coverage.add_read(*base, 0);
                } else {
                    coverage.add_read(*base, usize::from(repeat_counts[position]));
                    position += 1;
                }
            }
        }
        Ok(EdgeAlignment { rows, coverages })
    }

    pub fn rows(&self) -> &[AlignmentRow] {
        &self.rows
    }

    /// Returns the coverage record for each alignment column.
    pub fn coverages(&self) -> &[Coverage] {
        &self.coverages
    }
}

//-----------------------------------------------------------------------------

/// An edge of the local marker graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalMarkerGraphEdge {
    /// Global identifier of the source vertex.
    pub source: u64,

    /// Global identifier of the target vertex.
    pub target: u64,

    /// Supporting intervals grouped by the observed sequence, in first-seen order.
    pub infos: Vec<(EdgeSequence, Vec<MarkerIntervalWithRepeatCounts>)>,

    pub is_spanning_tree_edge: bool,
    pub is_spanning_tree_best_path_edge: bool,

    /// Kept by the approximate topological sort.
    pub is_dag_edge: bool,

    /// Identifier in the global marker graph, or [`INVALID_EDGE_ID`].
    pub edge_id: u64,

    /// Identifier of the assembly graph edge containing this edge, or [`INVALID_ASSEMBLY_EDGE_ID`].
    pub assembly_edge_id: u64,
    pub position_in_assembly_edge: u32,

    pub alignment: Option<EdgeAlignment>,
}

impl LocalMarkerGraphEdge {
    /// Creates an edge without supporting intervals.
    pub fn new(source: u64, target: u64) -> Self {
        LocalMarkerGraphEdge {
            source,
            target,
            infos: Vec::new(),
            is_spanning_tree_edge: false,
            is_spanning_tree_best_path_edge: false,
            is_dag_edge: true,
            edge_id: INVALID_EDGE_ID,
            assembly_edge_id: INVALID_ASSEMBLY_EDGE_ID,
            position_in_assembly_edge: 0,
            alignment: None,
        }
    }

    /// Adds a supporting interval to the group of its sequence.
    pub fn add_interval(
        &mut self,
        sequence: EdgeSequence,
        interval: MarkerIntervalWithRepeatCounts,
    ) {
        match self.infos.iter_mut().find(|(s, _)| *s == sequence) {
            Some((_, intervals)) => intervals.push(interval),
            None => self.infos.push((sequence, vec![interval])),
        }
    }

    /// Returns the total number of supporting intervals.
    pub fn coverage(&self) -> usize {
        self.infos.iter().map(|(_, intervals)| intervals.len()).sum()
    }

    /// Returns the number of intervals supporting the most common sequence.
    pub fn consensus(&self) -> usize {
        self.infos.iter().map(|(_, intervals)| intervals.len()).max().unwrap_or(0)
    }

    pub fn has_edge_id(&self) -> bool {
        self.edge_id != INVALID_EDGE_ID
    }

    pub fn has_assembly_edge(&self) -> bool {
        self.assembly_edge_id != INVALID_ASSEMBLY_EDGE_ID
    }

    pub fn has_alignment(&self) -> bool {
        self.alignment.is_some()
    }
}

//-----------------------------------------------------------------------------

/// The local marker graph with its read/marker collection.
///
/// Vertices and edges are stored in insertion order, which is also the rendering order.
#[derive(Clone, Debug, Default)]
pub struct LocalMarkerGraph {
    k: usize,
    markers: Vec<Marker>,
    vertices: Vec<LocalMarkerGraphVertex>,
    edges: Vec<LocalMarkerGraphEdge>,
    vertex_index: FxHashMap<u64, usize>,
}

impl LocalMarkerGraph {
    /// Creates an empty graph with markers of length `k`.
    pub fn new(k: usize) -> Self {
        LocalMarkerGraph {
            k,
            ..Self::default()
        }
    }

    /// Returns the marker length.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Adds a marker to the collection and returns its identifier.
    pub fn add_marker(&mut self, marker: Marker) -> usize {
        self.markers.push(marker);
        self.markers.len() - 1
    }

    pub fn marker(&self, marker_id: usize) -> Option<&Marker> {
        self.markers.get(marker_id)
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, vertex: LocalMarkerGraphVertex) -> Result<usize, GraphError> {
        if vertex.kmer.len() != self.k {
            return Err(GraphError::KmerLength {
                vertex_id: vertex.vertex_id,
                len: vertex.kmer.len(),
                k: self.k,
            });
        }
        if self.vertex_index.contains_key(&vertex.vertex_id) {
            return Err(GraphError::DuplicateVertex(vertex.vertex_id));
        }
        let index = self.vertices.len();
        self.vertex_index.insert(vertex.vertex_id, index);
        self.vertices.push(vertex);
        Ok(index)
    }

    /// Adds a supporting marker to a vertex and records its bases and repeat counts in the vertex coverage.
    pub fn add_marker_info(&mut self, vertex_id: u64, info: MarkerInfo) -> Result<(), GraphError> {
        let index = *self.vertex_index.get(&vertex_id).ok_or(GraphError::UnknownVertex(vertex_id))?;
        let marker = self.markers.get(info.marker_id)
            .ok_or(GraphError::UnknownMarker(info.marker_id))?;
        if marker.repeat_counts.len() < self.k {
            return Err(GraphError::MarkerRepeatCounts {
                marker_id: info.marker_id,
                len: marker.repeat_counts.len(),
                k: self.k,
            });
        }
        let vertex = &mut self.vertices[index];
        for (position, coverage) in vertex.coverages.iter_mut().enumerate() {
            let base = AlignedBase::from(vertex.kmer[position]);
            coverage.add_read(base, usize::from(marker.repeat_counts[position]));
        }
        vertex.marker_infos.push(info);
        Ok(())
    }

    /// Adds an edge between two existing vertices and returns its index.
    pub fn add_edge(&mut self, edge: LocalMarkerGraphEdge) -> Result<usize, GraphError> {
        for vertex_id in [edge.source, edge.target] {
            if !self.vertex_index.contains_key(&vertex_id) {
                return Err(GraphError::UnknownVertex(vertex_id));
            }
        }
        self.edges.push(edge);
        Ok(self.edges.len() - 1)
    }

    pub fn vertices(&self) -> &[LocalMarkerGraphVertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[LocalMarkerGraphEdge] {
        &self.edges
    }

    /// Returns the vertex with the given global identifier.
    pub fn vertex(&self, vertex_id: u64) -> Option<&LocalMarkerGraphVertex> {
        self.vertex_index.get(&vertex_id).map(|&index| &self.vertices[index])
    }

    /// Returns the largest vertex distance, or 0 for an empty graph.
    pub fn max_distance(&self) -> usize {
        self.vertices.iter().map(|v| v.distance).max().unwrap_or(0)
    }
}

//-----------------------------------------------------------------------------
