use super::{
    read_href, Attributes, GraphWriter, RenderOptions, MAX_SEQUENCE_DISPLAY_LENGTH, SIZE_PRECISION,
    TOO_LONG,
};

use crate::consensus::Consensus;
use crate::coverage::{AlignedBase, Coverage};
use crate::error::{RenderError, Result};
use crate::format::{expand_runs, format_significant, repeat_count_char, repeat_count_string};
use crate::graph::{EdgeAlignment, LocalMarkerGraphEdge};
use crate::html::{Cell, Table};
use crate::marker_interval::MarkerIntervalWithRepeatCounts;

//-----------------------------------------------------------------------------

const COMPACT_THICKNESS_SCALE: f64 = 0.2;
const DETAILED_THICKNESS_SCALE: f64 = 0.5;

const EDGE_COLUMNS: usize = 5;

/// Returns the edge color: violet for spanning tree edges, black with sufficient coverage, and red otherwise.
pub fn edge_color(edge: &LocalMarkerGraphEdge, options: &RenderOptions) -> &'static str {
    if edge.is_spanning_tree_edge {
        "violet"
    } else if edge.coverage() >= options.min_coverage {
        "black"
    } else {
        "red"
    }
}

// Thickness is determined by coverage, but never drops to zero.
fn thickness(coverage: usize, scale: f64) -> String {
    format_significant(scale * coverage.max(1) as f64, SIZE_PRECISION)
}

// Links for the read and the two ordinals of an interval.
fn interval_cells(interval: &MarkerIntervalWithRepeatCounts) -> Vec<Cell> {
    let read = interval.oriented_read_id();
    let ordinals = interval.ordinals();
    vec![
        Cell::link(read.to_string(), read_href(read, &[])).align("right"),
        Cell::link(ordinals[0].to_string(), read_href(read, &ordinals)).align("right"),
        Cell::link(ordinals[1].to_string(), read_href(read, &ordinals)).align("right"),
    ]
}

//-----------------------------------------------------------------------------

impl<'a> GraphWriter<'a> {
    /// Returns the attribute block for the edge.
    pub fn edge_attributes(&self, edge: &LocalMarkerGraphEdge) -> Result<String> {
        let coverage = edge.coverage();
        if coverage == 0 {
            return Err(RenderError::ZeroEdgeCoverage {
                source_vertex: edge.source,
                target_vertex: edge.target,
            });
        }
        let tooltip = format!("Coverage {}, consensus {}", coverage, edge.consensus());
        let color = edge_color(edge, &self.options);
        let dashed = edge.is_spanning_tree_edge && !edge.is_spanning_tree_best_path_edge;
        let mut attributes = Attributes::default();

        if !self.options.detailed {
            attributes.push_quoted("tooltip", &tooltip);
            attributes.push_quoted("fillcolor", color);
            attributes.push_quoted("color", color);
            attributes.push("penwidth", thickness(coverage, COMPACT_THICKNESS_SCALE));
            if dashed {
                attributes.push("style", "dashed");
            }
            attributes.push("weight", coverage);
        } else {
            attributes.push_quoted("tooltip", &tooltip);
            attributes.push_quoted("labeltooltip", &tooltip);
            attributes.push("penwidth", thickness(coverage, DETAILED_THICKNESS_SCALE));
            if dashed {
                attributes.push("style", "dashed");
            }
            attributes.push_quoted("fillcolor", color);
            attributes.push_quoted("color", color);
            attributes.push("weight", coverage);

            // Edges dropped by the approximate topological sort must not constrain the ranks.
            if !edge.is_dag_edge {
                attributes.push("constraint", "false");
            }

            let label_color = if color == "black" { "green" } else { color };
            attributes.push("label", self.edge_table(edge, label_color).to_label(Some("black")));
            attributes.push("decorate", "true");
        }

        Ok(attributes.finish())
    }

    fn edge_table(&self, edge: &LocalMarkerGraphEdge, label_color: &str) -> Table {
        let mut table = Table::new(EDGE_COLUMNS)
            .attribute("color", "black")
            .attribute("bgcolor", label_color)
            .attribute("border", "0")
            .attribute("cellborder", "1")
            .attribute("cellspacing", "1");

        if self.options.show_vertex_id && edge.has_edge_id() {
            table.push_spanning(Cell::bold(format!("Edge {}", edge.edge_id)));
        }
        if self.options.show_vertex_id && edge.has_assembly_edge() {
            table.push_spanning(Cell::bold(format!(
                "Position {} in assembly graph edge {}",
                edge.position_in_assembly_edge, edge.assembly_edge_id
            )));
        }
        table.push_spanning(Cell::bold(format!("Coverage {}", edge.coverage())));
        table.push_spanning(Cell::bold(format!("Consensus {}", edge.consensus())));

        table.push_row(["Read", "Ord0", "Ord1", "Seq", "Repeat"].into_iter()
            .map(|title| Cell::bold(title).align("center"))
            .collect());

        for (sequence, intervals) in edge.infos.iter() {
            let sequence_string = sequence.display_string();
            let too_long = sequence_string.len() > MAX_SEQUENCE_DISPLAY_LENGTH;
            for (i, interval) in intervals.iter().enumerate() {
                let mut cells = interval_cells(interval);
                let sequence_cell = if i > 0 {
                    "="
                } else if too_long {
                    TOO_LONG
                } else {
                    sequence_string.as_str()
                };
                cells.push(Cell::bold(sequence_cell).align("center"));
                if interval.has_repeat_counts() {
                    let repeat_counts = if too_long {
                        String::from(TOO_LONG)
                    } else {
                        repeat_count_string(interval.repeat_counts().iter().copied())
                    };
                    cells.push(Cell::bold(repeat_counts).align("center"));
                }
                table.push_row(cells);
            }
        }

        if let Some(alignment) = edge.alignment.as_ref() {
            self.alignment_rows(alignment, &mut table);
        }

        table
    }

    // The aligned reads followed by the consensus of each alignment column.
    // Every row has a repeat count for each non-gap base, as checked by `EdgeAlignment::new`.
    fn alignment_rows(&self, alignment: &EdgeAlignment, table: &mut Table) {
        table.push_spanning(Cell::bold("Alignment"));

        for row in alignment.rows().iter() {
            let mut cells = interval_cells(&row.interval);
            let bases: String = row.bases.iter().map(AlignedBase::character).collect();
            cells.push(Cell::bold(bases));

            let mut counts = row.interval.repeat_counts().iter();
            let repeat_counts: String = row.bases.iter()
                .map(|base| {
                    if base.is_gap() {
                        '-'
                    } else {
                        counts.next().map_or('-', |count| repeat_count_char(usize::from(*count)))
                    }
                })
                .collect();
            cells.push(Cell::bold(repeat_counts));
            table.push_row(cells);
        }

        // Alignment columns may have a gap as consensus, so there is no check against a reference here.
        let coverages = alignment.coverages();
        let consensus: Vec<Consensus> = coverages.iter()
            .map(|coverage| self.caller.call(coverage))
            .collect();

        let bases: String = consensus.iter().map(|c| c.base.character()).collect();
        let repeat_counts: String = consensus.iter()
            .map(|c| if c.base.is_gap() { '-' } else { repeat_count_char(c.repeat_count) })
            .collect();
        table.push_row(vec![
            Cell::bold("Consensus base, repeat count").colspan(3).align("left"),
            Cell::bold(bases),
            Cell::bold(repeat_counts),
        ]);

        for base in AlignedBase::all() {
            let glyphs: String = coverages.iter()
                .map(|coverage| coverage.coverage_character(base))
                .collect();
            table.push_titled(format!("Coverage for {}", base), 3, Cell::bold(glyphs));
        }

        let glyphs: String = consensus.iter().zip(coverages.iter())
            .map(|(c, coverage)| coverage.coverage_character(c.base))
            .collect();
        table.push_titled("Coverage for consensus base", 3, Cell::bold(glyphs));

        // Coverage for the consensus base, broken down by repeat count.
        let glyph_for = |c: &Consensus, coverage: &Coverage, repeat_count: usize| {
            if c.base.is_gap() {
                '-'
            } else {
                coverage.coverage_character_for(c.base, repeat_count)
            }
        };
        for repeat_count in self.caller.find_repeat_counts(coverages) {
            let glyphs: String = consensus.iter().zip(coverages.iter())
                .map(|(c, coverage)| glyph_for(c, coverage, repeat_count))
                .collect();
            let title = format!("Coverage for consensus base, repeat count {}", repeat_count);
            table.push_titled(title, 4, Cell::bold(glyphs));
        }
        let glyphs: String = consensus.iter().zip(coverages.iter())
            .map(|(c, coverage)| glyph_for(c, coverage, c.repeat_count))
            .collect();
        table.push_titled("Coverage for consensus base and repeat count", 4, Cell::bold(glyphs));

        // Run-length decoded consensus and its coverage. Gap columns contribute nothing.
        let runs = consensus.iter().zip(coverages.iter()).filter(|(c, _)| !c.base.is_gap());
        let raw = expand_runs(runs.clone().map(|(c, _)| (c.base.character(), c.repeat_count)));
        let raw_coverage = expand_runs(runs.map(|(c, coverage)| {
            (coverage.coverage_character_for(c.base, c.repeat_count), c.repeat_count)
        }));
        table.push_titled("Consensus (raw)", 3, Cell::bold(raw).colspan(2));
        table.push_titled("Consensus (raw) coverage", 3, Cell::bold(raw_coverage).colspan(2));
    }
}
