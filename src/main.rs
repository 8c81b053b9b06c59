use std::fs;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tomsim::{parse_trace, Scheduler, SimConfig, SimError};

/// Simulate Tomasulo's dynamic instruction scheduling over a decoded trace.
#[derive(Parser, Debug)]
#[command(name = "tomsim", version)]
struct Args {
    /// decoded instruction trace (mnemonic token stream, HALT-terminated)
    trace: String,

    /// JSON configuration: per-class unit/station counts and latencies
    config: String,

    /// path the JSON report is written to
    output: String,

    /// reject unrecognized opcodes instead of skipping them
    #[arg(long)]
    strict: bool,

    /// log scheduling events (issue/dispatch/write-back) to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "tomsim=debug" } else { "tomsim=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tomsim: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SimError> {
    let trace_text = read(&args.trace)?;
    let config_text = read(&args.config)?;

    let instructions = parse_trace(&trace_text, args.strict)?;
    let config = SimConfig::from_json(&config_text)?;
    config.validate_for(&instructions)?;

    let mut scheduler = Scheduler::new(&config, instructions);
    let report = scheduler.run();

    print!("{}", scheduler.stats);

    fs::write(&args.output, report.to_json()).map_err(|source| SimError::Report {
        path: args.output.clone(),
        source,
    })?;

    Ok(())
}

fn read(path: &str) -> Result<String, SimError> {
    fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_string(),
        source,
    })
}
