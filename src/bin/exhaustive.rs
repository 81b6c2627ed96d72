//! Replays a workload file through the exhaustive oracle.
//!
//! Prints one result id per line to stdout for every query record. Any
//! malformed record, unknown delete or bad configuration ends the run with a
//! non-zero exit status.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use aabb_oracle::config::DEFAULT_K;
use aabb_oracle::logging::setup_logging;
use aabb_oracle::{OracleError, QueryMode, Replay, ReplayConfig};
use clap::{Arg, ArgAction, Command};
use tracing::{error, info};

struct CliArgs {
    data_file: PathBuf,
    query_type: String,
    k: usize,
    log_level: Option<String>,
    json_logs: bool,
}

impl CliArgs {
    fn parse() -> Self {
        let matches = Command::new("exhaustive")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Exhaustive ground-truth oracle for spatial index regression runs")
            .arg(
                Arg::new("data_file")
                    .value_name("DATA_FILE")
                    .help("Workload file of 'op id x1 y1 x2 y2' records ('-' for stdin)")
                    .required(true),
            )
            .arg(
                Arg::new("query_type")
                    .value_name("QUERY_TYPE")
                    .help("Query mode: intersection, knn, or <k>NN (e.g. 10NN)")
                    .required(true),
            )
            .arg(
                Arg::new("k")
                    .short('k')
                    .long("k")
                    .value_name("N")
                    .help("Neighbor count for the 'knn' mode")
                    .value_parser(clap::value_parser!(usize))
                    .default_value("10"),
            )
            .arg(
                Arg::new("log-level")
                    .short('l')
                    .long("log-level")
                    .value_name("LEVEL")
                    .help("Log level (trace, debug, info, warn, error)"),
            )
            .arg(
                Arg::new("json-logs")
                    .long("json-logs")
                    .help("Output logs in JSON format")
                    .action(ArgAction::SetTrue),
            )
            .get_matches();

        Self {
            data_file: matches
                .get_one::<String>("data_file")
                .map(PathBuf::from)
                .unwrap_or_default(),
            query_type: matches.get_one::<String>("query_type").cloned().unwrap_or_default(),
            k: matches.get_one::<usize>("k").copied().unwrap_or(DEFAULT_K),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
        }
    }
}

fn run(args: &CliArgs) -> Result<(), OracleError> {
    // Mode errors are configuration errors: reject before touching the data file
    let mode = QueryMode::parse_with_k(&args.query_type, args.k)?;
    let mut replay = Replay::new(ReplayConfig::new(mode));
    let stdout = BufWriter::new(io::stdout().lock());

    info!(file = %args.data_file.display(), %mode, "Starting replay");
    if args.data_file.as_os_str() == "-" {
        let _ = replay.run(io::stdin().lock(), stdout)?;
    } else {
        let file = File::open(&args.data_file)?;
        let _ = replay.run(BufReader::new(file), stdout)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = setup_logging(args.log_level.as_deref(), args.json_logs) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
