use mglook::parse::{load_graph, ParseError};
use mglook::{CallerKind, GraphWriter, RenderError, RenderOptions};

use pretty_assertions::assert_eq;

use std::fs;
use std::path::{Path, PathBuf};

//-----------------------------------------------------------------------------

const GRAPH: &str = "\
K\t2
V\t1\t0\t0\tAC
M\t1\t5\t0\t10\t100\t1,1
M\t2\t6\t1\t20\t200\t2,1
V\t2\t1\t1\tCG
M\t3\t5\t0\t11\t105\t1,3
E\t1\t2\tST:i:1\tBP:i:1
I\t5\t0\t10\t11\tT\t1
I\t6\t1\t20\t21\tT\t2
";

fn write_graph(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("local.txt");
    fs::write(&path, text).unwrap();
    path
}

fn options(graph_max_distance: usize, detailed: bool) -> RenderOptions {
    RenderOptions { min_coverage: 2, max_distance: graph_max_distance, detailed, show_vertex_id: false }
}

//-----------------------------------------------------------------------------

#[test]
fn compact_file() {
    let dir = tempfile::tempdir().unwrap();
    let graph = load_graph(write_graph(dir.path(), GRAPH)).unwrap();
    let caller = CallerKind::Simple.caller();
    let writer = GraphWriter::new(&graph, caller.as_ref(), options(graph.max_distance(), false));
    let out = dir.path().join("local.dot");
    writer.write_file(&out, false).unwrap();

    let expected = "\
digraph G {
tooltip = \" \";
layout=sfdp;
smoothing=triangle;
ratio=expand;
node [shape=point];
1[id=vertex1 tooltip=\"Coverage 2, distance 0, rank 0, click to recenter graph here, right click for detail\" width=\"0.07071\" fillcolor=\"#90ee90\" color=\"#90ee90\"];
2[id=vertex2 tooltip=\"Coverage 1, distance 1, rank 1, click to recenter graph here, right click for detail\" width=\"0.05\" fillcolor=\"cyan\" color=\"cyan\"];
1->2 [tooltip=\"Coverage 2, consensus 2\" fillcolor=\"violet\" color=\"violet\" penwidth=0.4 weight=2];
}
";
    assert_eq!(fs::read_to_string(&out).unwrap(), expected);
}

#[test]
fn detailed_file_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let graph = load_graph(write_graph(dir.path(), GRAPH)).unwrap();
    for kind in [CallerKind::Simple, CallerKind::Median] {
        let caller = kind.caller();
        let writer = GraphWriter::new(&graph, caller.as_ref(), options(graph.max_distance(), true));
        let sequential = dir.path().join(format!("{}.dot", kind));
        let parallel = dir.path().join(format!("{}-parallel.dot", kind));
        writer.write_file(&sequential, false).unwrap();
        writer.write_file(&parallel, true).unwrap();

        let output = fs::read_to_string(&sequential).unwrap();
        assert_eq!(output, fs::read_to_string(&parallel).unwrap());
        assert!(output.starts_with("digraph G {\ntooltip = \" \";\nlayout=dot;\nrankdir=LR;\n"));
        assert!(output.contains("<b>Raw consensus</b></td><td align=\"left\"><b>AC</b></td>"));
        assert!(output.contains("<b>Raw consensus</b></td><td align=\"left\"><b>CGGG</b></td>"));
        assert!(output.contains("href=\"exploreRead?readId=6&amp;strand=1&amp;highlightMarker=20&amp;highlightMarker=21\""));
        assert!(output.contains(" decorate=true];\n}\n"));
    }
}

#[test]
fn unwritable_output() {
    let dir = tempfile::tempdir().unwrap();
    let graph = load_graph(write_graph(dir.path(), GRAPH)).unwrap();
    let caller = CallerKind::Simple.caller();
    let writer = GraphWriter::new(&graph, caller.as_ref(), options(1, false));
    let out = dir.path().join("no-such-directory").join("local.dot");
    let error = writer.write_file(&out, false).unwrap_err();
    assert!(matches!(error, RenderError::Create { .. }));
    assert!(!error.is_invariant_violation());
    assert!(!out.exists());
}

#[test]
fn malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let text = GRAPH.replace("I\t6\t1\t20\t21\tT\t2", "I\t6\t1\t20\t21\tT\tmany");
    let error = load_graph(write_graph(dir.path(), &text)).unwrap_err();
    assert!(matches!(error, ParseError::Syntax { line: 9, .. }));
}

#[test]
fn zero_coverage_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let text = format!("{}E\t2\t1\n", GRAPH);
    let graph = load_graph(write_graph(dir.path(), &text)).unwrap();
    let caller = CallerKind::Median.caller();
    let writer = GraphWriter::new(&graph, caller.as_ref(), options(1, true));
    let error = writer.write_file(dir.path().join("local.dot"), true).unwrap_err();
    assert!(matches!(error, RenderError::ZeroEdgeCoverage { source_vertex: 2, target_vertex: 1 }));
    assert!(error.is_invariant_violation());
}
