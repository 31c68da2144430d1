//! # Lox
//!
//! Runs a script file, or starts an interactive session when no path is given.

use clap::error::ErrorKind;
use clap::Parser;
use lox::mach::Config;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{fmt, EnvFilter};

mod term;

#[derive(Parser, Debug)]
#[command(name = "lox")]
#[command(about = "Compile and run Lox source")]
struct Args {
    /// Script to run; starts the REPL when omitted
    path: Option<PathBuf>,

    /// Log each executed instruction with the value stack
    #[arg(long)]
    trace: bool,

    /// Print the bytecode listing before running
    #[arg(long)]
    disassemble: bool,
}

fn init_logging(trace: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if trace {
            EnvFilter::new("warn,lox=trace")
        } else {
            EnvFilter::new("warn")
        }
    });
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) => {
            let _ = error.print();
            match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => process::exit(0),
                _ => process::exit(term::EXIT_USAGE),
            }
        }
    };
    init_logging(args.trace);

    let config = Config {
        trace: args.trace,
        ..Config::default()
    };
    let code = match &args.path {
        Some(path) => term::run_file(path, config, args.disassemble),
        None => term::repl(config, args.disassemble),
    };
    process::exit(code);
}
