use balanced_index::graph::{Graph, GraphError};
use balanced_index::logging::init_tracing;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "pagerank")]
#[command(about = "Ranks the pages of a link graph")]
struct Args {
    /// Graph description to read; reads stdin when omitted
    #[arg(long, env = "PAGERANK_INPUT")]
    input: Option<PathBuf>,

    #[arg(long, default_value = "warn", env = "BALANCED_INDEX_LOG")]
    log: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

fn main() {
    let args = Args::parse();
    init_tracing(&args.log);

    if let Err(err) = run(args) {
        error!(%err, "aborting");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let parsed = match args.input {
        Some(path) => {
            let file = File::open(&path).map_err(|source| CliError::Open {
                path: path.clone(),
                source,
            })?;
            Graph::read(BufReader::new(file))?
        }
        None => Graph::read(io::stdin().lock())?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in &parsed.rejected {
        debug!(%line, "skipping malformed link");
        writeln!(
            out,
            "Received more/less than the expected 2 nodes of input in a line."
        )?;
    }
    if parsed.missing > 0 {
        writeln!(
            out,
            "Expected {} number of lines. Received {} instead.",
            parsed.expected,
            parsed.expected - parsed.missing
        )?;
    }
    for (page, rank) in parsed.graph.page_rank(parsed.power) {
        writeln!(out, "{page} {rank:.2}")?;
    }
    out.flush()?;
    Ok(())
}
