use super::{read_href, Attributes, GraphWriter, RenderOptions, SIZE_PRECISION};

use crate::consensus::Consensus;
use crate::coverage::{sequence_string, AlignedBase};
use crate::error::{RenderError, Result};
use crate::format::{expand_runs, format_significant, repeat_count_string};
use crate::graph::LocalMarkerGraphVertex;
use crate::html::{Cell, CellStyle, Table};

//-----------------------------------------------------------------------------

const VERTEX_SIZE_SCALE: f64 = 0.05;

const VERTEX_COLUMNS: usize = 4;

/// Returns the vertex color.
///
/// Boundary vertices are cyan and the center is light green.
/// Other vertices are black (compact) or green (detailed) if they have sufficient coverage, and red otherwise.
pub fn vertex_color(vertex: &LocalMarkerGraphVertex, options: &RenderOptions) -> &'static str {
    if vertex.distance == options.max_distance {
        "cyan"
    } else if vertex.distance == 0 {
        "#90ee90"
    } else if vertex.coverage() >= options.min_coverage {
        if options.detailed { "green" } else { "black" }
    } else {
        "red"
    }
}

fn tooltip_prefix(vertex: &LocalMarkerGraphVertex, show_vertex_id: bool) -> String {
    if show_vertex_id {
        format!("Vertex {}, coverage {}", vertex.vertex_id, vertex.coverage())
    } else {
        format!("Coverage {}", vertex.coverage())
    }
}

// Each k-mer position needs its own coverage record.
fn check_coverage_records(vertex: &LocalMarkerGraphVertex) -> Result<()> {
    if vertex.coverages.len() != vertex.kmer.len() {
        return Err(RenderError::CoverageRecords {
            vertex_id: vertex.vertex_id,
            len: vertex.coverages.len(),
            k: vertex.kmer.len(),
        });
    }
    Ok(())
}

//-----------------------------------------------------------------------------

impl<'a> GraphWriter<'a> {
    /// Returns the attribute block for the vertex.
    pub fn vertex_attributes(&self, vertex: &LocalMarkerGraphVertex) -> Result<String> {
        let coverage = vertex.coverage();
        if coverage == 0 {
            return Err(RenderError::ZeroVertexCoverage { vertex_id: vertex.vertex_id });
        }
        check_coverage_records(vertex)?;
        let color = vertex_color(vertex, &self.options);
        let mut attributes = Attributes::default();

        if !self.options.detailed {
            // The vertex id in the tooltip can be used to extract a smaller local graph for detailed output.
            attributes.push("id", format!("vertex{}", vertex.vertex_id));
            attributes.push_quoted("tooltip", format!(
                "{}, distance {}, rank {}, click to recenter graph here, right click for detail",
                tooltip_prefix(vertex, self.options.show_vertex_id), vertex.distance, vertex.rank
            ));
            let size = VERTEX_SIZE_SCALE * (coverage as f64).sqrt();
            attributes.push_quoted("width", format_significant(size, SIZE_PRECISION));
            attributes.push_quoted("fillcolor", color);
            attributes.push_quoted("color", color);
        } else {
            attributes.push("style", "filled");
            attributes.push_quoted("fillcolor", color);
            attributes.push("id", format!("vertex{}", vertex.vertex_id));
            attributes.push_quoted("tooltip", format!(
                "{}, distance {}, rank {}",
                tooltip_prefix(vertex, self.options.show_vertex_id), vertex.distance, vertex.rank
            ));
            attributes.push("label", self.vertex_table(vertex)?.to_label(None));
        }

        Ok(attributes.finish())
    }

    // The detailed label: supporting markers followed by the consensus summary.
    fn vertex_table(&self, vertex: &LocalMarkerGraphVertex) -> Result<Table> {
        let mut table = Table::new(VERTEX_COLUMNS).attribute("border", "0");

        if self.options.show_vertex_id {
            table.push_spanning(Cell::bold(format!("Vertex {}", vertex.vertex_id)));
        }
        table.push_spanning(Cell::bold(sequence_string(&vertex.kmer)));
        table.push_spanning(Cell::bold(format!("Coverage {}", vertex.coverage())));

        // An empty href is necessary to activate the tooltip.
        table.push_row(vec![
            Cell::new(format!("Distance {}", vertex.distance), CellStyle::Link)
                .colspan(VERTEX_COLUMNS)
                .attribute("href", "")
                .id(format!("vertexDistance{}", vertex.vertex_id))
                .tooltip("Click to recenter graph here"),
        ]);
        table.push_spanning(Cell::bold(format!("Rank {}", vertex.rank)));

        table.push_row(["Read", "Ord", "Pos", "Repeat"].into_iter().map(Cell::bold).collect());
        let k = vertex.kmer.len();
        for info in vertex.marker_infos.iter() {
            let marker = self.graph.marker(info.marker_id).ok_or(RenderError::UnknownMarker {
                vertex_id: vertex.vertex_id,
                marker_id: info.marker_id,
            })?;
            if marker.repeat_counts.len() < k {
                return Err(RenderError::MarkerRepeatCounts {
                    vertex_id: vertex.vertex_id,
                    marker_id: info.marker_id,
                    len: marker.repeat_counts.len(),
                    k,
                });
            }
            let read = info.oriented_read_id;
            table.push_row(vec![
                Cell::link(read.to_string(), read_href(read, &[])).align("right"),
                Cell::link(info.ordinal.to_string(), read_href(read, &[info.ordinal]))
                    .align("right"),
                Cell::bold(marker.position.to_string()).align("right"),
                Cell::bold(repeat_count_string(marker.repeat_counts[..k].iter().copied())),
            ]);
        }

        let consensus = self.vertex_consensus(vertex)?;
        table.push_titled(
            "Repeat consensus", VERTEX_COLUMNS - 1,
            Cell::bold(repeat_count_string(consensus.iter().map(|c| c.repeat_count)))
        );

        // Coverage for each repeat count at each position.
        for repeat_count in self.caller.find_repeat_counts(&vertex.coverages) {
            let glyphs: String = vertex.kmer.iter().zip(vertex.coverages.iter())
                .map(|(base, coverage)| {
                    coverage.coverage_character_for(AlignedBase::from(*base), repeat_count)
                })
                .collect();
            let title = format!("Coverage for repeat {}", repeat_count);
            table.push_titled(title, VERTEX_COLUMNS - 1, Cell::bold(glyphs));
        }

        let glyphs: String = consensus.iter().zip(vertex.coverages.iter())
            .map(|(c, coverage)| coverage.coverage_character_for(c.base, c.repeat_count))
            .collect();
        table.push_titled("Coverage for repeat consensus", VERTEX_COLUMNS - 1, Cell::bold(glyphs));

        let raw = expand_runs(consensus.iter().map(|c| (c.base.character(), c.repeat_count)));
        table.push_titled("Raw consensus", VERTEX_COLUMNS - 1, Cell::bold(raw).align("left"));

        Ok(table)
    }

    /// Calls consensus independently at each k-mer position.
    ///
    /// There must be one coverage record per k-mer position.
    /// The consensus base must be the k-mer base at every position.
    pub fn vertex_consensus(&self, vertex: &LocalMarkerGraphVertex) -> Result<Vec<Consensus>> {
        check_coverage_records(vertex)?;
        let mut result = Vec::with_capacity(vertex.kmer.len());
        let positions = vertex.kmer.iter().zip(vertex.coverages.iter()).enumerate();
        for (position, (base, coverage)) in positions {
            let consensus = self.caller.call(coverage);
            let expected = AlignedBase::from(*base);
            if consensus.base != expected {
                return Err(RenderError::ConsensusMismatch {
                    vertex_id: vertex.vertex_id,
                    position,
                    consensus: consensus.base.character(),
                    expected: expected.character(),
                });
            }
            result.push(consensus);
        }
        Ok(result)
    }
}
