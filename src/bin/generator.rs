//! Writes a random regression workload to stdout.
//!
//! A bad argument, a failed logging setup or a write error ends the run with
//! a non-zero exit status.

use std::io::{self, BufWriter};
use std::process::ExitCode;

use aabb_oracle::OracleError;
use aabb_oracle::generator::{Generator, GeneratorConfig};
use aabb_oracle::logging::setup_logging;
use clap::{Arg, ArgAction, Command};
use tracing::error;

struct CliArgs {
    objects: usize,
    rounds: Option<usize>,
    seed: Option<u64>,
    log_level: Option<String>,
    json_logs: bool,
}

impl CliArgs {
    fn parse() -> Self {
        let matches = Command::new("generator")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Generates an insert/move/query workload over the unit square")
            .arg(
                Arg::new("objects")
                    .value_name("NUMBER_OF_DATA")
                    .help("Number of objects inserted before the first round")
                    .value_parser(clap::value_parser!(usize))
                    .required(true),
            )
            .arg(
                Arg::new("rounds")
                    .short('r')
                    .long("rounds")
                    .value_name("N")
                    .help("Number of move-then-query rounds")
                    .value_parser(clap::value_parser!(usize))
                    .default_value("100"),
            )
            .arg(
                Arg::new("seed")
                    .short('s')
                    .long("seed")
                    .value_name("SEED")
                    .help("Seed for a reproducible workload")
                    .value_parser(clap::value_parser!(u64)),
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
            objects: matches.get_one::<usize>("objects").copied().unwrap_or_default(),
            rounds: matches.get_one::<usize>("rounds").copied(),
            seed: matches.get_one::<u64>("seed").copied(),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
        }
    }
}

fn run(args: &CliArgs) -> Result<(), OracleError> {
    let mut config = GeneratorConfig::new(args.objects);
    if let Some(rounds) = args.rounds {
        config = config.with_rounds(rounds);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut generator = Generator::new(config)?;
    let _ = generator.write_to(BufWriter::new(io::stdout().lock()))?;
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
