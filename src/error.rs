use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RenderError>;

/// Failures that abort a render.
///
/// Apart from the I/O variants, these are internal-consistency faults: the local graph or the consensus model is corrupt.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Error opening {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Vertex {vertex_id} has zero coverage")]
    ZeroVertexCoverage { vertex_id: u64 },

    #[error("Edge {source_vertex}->{target_vertex} has zero coverage")]
    ZeroEdgeCoverage { source_vertex: u64, target_vertex: u64 },

    #[error(
        "Vertex {vertex_id}: consensus base {consensus} at position {position} does not match k-mer base {expected}"
    )]
    ConsensusMismatch {
        vertex_id: u64,
        position: usize,
        consensus: char,
        expected: char,
    },

    #[error("Unknown marker {marker_id} in vertex {vertex_id}")]
    UnknownMarker { vertex_id: u64, marker_id: usize },

    #[error("Vertex {vertex_id} has {len} coverage records for a k-mer of length {k}")]
    CoverageRecords { vertex_id: u64, len: usize, k: usize },

    #[error("Marker {marker_id} in vertex {vertex_id} has {len} repeat counts, expected {k}")]
    MarkerRepeatCounts {
        vertex_id: u64,
        marker_id: usize,
        len: usize,
        k: usize,
    },
}

impl RenderError {
    /// Returns `true` if the error is an internal-consistency fault rather than an I/O failure.
    pub fn is_invariant_violation(&self) -> bool {
        !matches!(self, RenderError::Io(_) | RenderError::Create { .. })
    }
}
