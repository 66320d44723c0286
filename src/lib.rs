//! # mglook: Graphviz views of local marker graphs.
//!
//! A marker graph is an assembly graph where each vertex is a cluster of matching markers (short k-mers) on many oriented reads, and each edge connects markers that are adjacent on some reads.
//! This crate renders a local marker graph, the neighborhood of a center vertex, in Graphviz format for interactive inspection.
//!
//! There are two output modes.
//! Compact output draws each vertex as a point sized by coverage and is intended for large neighborhoods.
//! Detailed output draws each vertex and edge with an HTML-like table of the supporting reads, the run-length consensus (base and repeat count) at each position, and the coverage behind it.
//! Read and marker cells link to a read exploration view with `exploreRead?readId=<id>&strand=<0|1>[&highlightMarker=<ordinal>]*`.
//!
//! ### Basic concepts
//!
//! The local graph ([`LocalMarkerGraph`]) is extracted elsewhere and arrives with vertex distances from the center and approximate topological ranks.
//! It can be built with the API or loaded from a text file with [`parse::load_graph`].
//!
//! Consensus is called through the [`ConsensusCaller`] trait.
//! Each [`Coverage`] record holds the (base, repeat count) observations at one k-mer position or alignment column.
//!
//! See [`GraphWriter`] and [`render()`] for the output.

pub mod consensus;
pub mod coverage;
pub mod error;
pub mod format;
pub mod graph;
pub mod html;
pub mod marker_interval;
pub mod parse;
pub mod render;

pub use consensus::{
    CallerKind, Consensus, ConsensusCaller, MedianConsensusCaller, SimpleConsensusCaller,
};
pub use coverage::{AlignedBase, Base, Coverage};
pub use error::RenderError;
pub use graph::{
    AlignmentRow, EdgeAlignment, EdgeSequence, LocalMarkerGraph, LocalMarkerGraphEdge,
    LocalMarkerGraphVertex, Marker, MarkerInfo,
};
pub use marker_interval::{MarkerInterval, MarkerIntervalWithRepeatCounts, OrientedReadId};
pub use render::{render, render_to_string, GraphWriter, RenderOptions};
