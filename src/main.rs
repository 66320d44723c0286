use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use mglook::parse::load_graph;
use mglook::{CallerKind, GraphWriter, RenderOptions};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "mglook")]
#[command(about = "Render a local marker graph in Graphviz format.", long_about = None)]
struct Args {
    // MANDATORY OPTIONS
    /// Load the local marker graph from this FILE.
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: PathBuf,

    /// Write the graph in Graphviz format to this FILE.
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    out: PathBuf,

    // Rendering Options
    /// Vertices and edges with lower coverage are drawn in red.
    #[arg(short = 'm', long = "min-coverage", value_name = "N", default_value_t = 3)]
    min_coverage: usize,

    /// Vertices at this distance from the center are drawn in cyan (default: the largest distance in the graph).
    #[arg(short = 'd', long = "max-distance", value_name = "N")]
    max_distance: Option<usize>,

    /// Draw vertices and edges with tables of supporting reads and consensus.
    #[arg(short = 'D', long = "detailed")]
    detailed: bool,

    /// Show vertex and edge identifiers.
    #[arg(short = 'I', long = "show-vertex-id")]
    show_vertex_id: bool,

    /// Consensus caller for repeat counts.
    #[arg(short = 'c', long = "consensus-caller", value_enum, default_value_t = CallerArg::Simple)]
    consensus_caller: CallerArg,

    // Threading
    /// Number of threads to use for formatting vertices and edges.
    #[arg(short = 't', long = "threads", value_name = "N")]
    threads: Option<usize>,

    // Logging
    /// Verbosity level (0 = error, 1 = info, 2 = debug).
    #[arg(short = 'v', long = "verbose", value_name = "N", default_value_t = 1)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CallerArg {
    /// Most frequent repeat count.
    Simple,
    /// Median repeat count.
    Median,
}

impl From<CallerArg> for CallerKind {
    fn from(arg: CallerArg) -> Self {
        match arg {
            CallerArg::Simple => CallerKind::Simple,
            CallerArg::Median => CallerKind::Median,
        }
    }
}

fn main() {
    let args = Args::parse();

    // Initialize logger based on verbosity
    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    if let Some(threads) = args.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
            warn!("Cannot set the number of threads: {}", e);
        }
    }

    let graph = match load_graph(&args.input) {
        Ok(g) => g,
        Err(e) => {
            error!("Error loading local marker graph: {}", e);
            process::exit(1);
        }
    };

    if graph.vertices().is_empty() {
        warn!("The local marker graph has no vertices.");
    }

    let options = RenderOptions {
        min_coverage: args.min_coverage,
        max_distance: args.max_distance.unwrap_or_else(|| graph.max_distance()),
        detailed: args.detailed,
        show_vertex_id: args.show_vertex_id,
    };
    let kind = CallerKind::from(args.consensus_caller);
    let caller = kind.caller();
    info!(
        "Rendering {} output with the {} consensus caller, max distance {}...",
        if options.detailed { "detailed" } else { "compact" }, kind, options.max_distance
    );

    let writer = GraphWriter::new(&graph, caller.as_ref(), options);
    if let Err(e) = writer.write_file(&args.out, rayon::current_num_threads() > 1) {
        error!("Error writing {:?}: {}", args.out, e);
        process::exit(1);
    }

    info!("Done!");
}
