use balanced_index::Session;
use balanced_index::command::ScriptError;
use balanced_index::logging::init_tracing;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process;
use thiserror::Error;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "balanced-index")]
#[command(about = "Runs a script of commands against an AVL-balanced index")]
struct Args {
    /// Script to run; reads stdin when omitted
    #[arg(long, env = "BALANCED_INDEX_INPUT")]
    input: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `balanced_index=trace`
    #[arg(long, default_value = "warn", env = "BALANCED_INDEX_LOG")]
    log: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Script(#[from] ScriptError),
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
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut session = Session::new();

    let executed = match args.input {
        Some(path) => {
            let file = File::open(&path).map_err(|source| CliError::Open {
                path: path.clone(),
                source,
            })?;
            session.run_script(BufReader::new(file), &mut out)?
        }
        None => session.run_script(io::stdin().lock(), &mut out)?,
    };
    out.flush()?;

    info!(executed, entries = session.index().len(), "script finished");
    Ok(())
}
