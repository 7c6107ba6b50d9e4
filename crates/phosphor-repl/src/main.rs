//! phosphor CLI entry point.
//!
//! Usage:
//!   phosphor                     # Interactive terminal
//!   phosphor -c <input>          # Process one input and exit
//!   phosphor --config <path>     # Use a specific config file
//!   phosphor --mode oracle       # Start in a given chat mode

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use phosphor_kernel::{ChatMode, PhosphorConfig};
use phosphor_repl::{ExitRequested, Repl};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Default)]
struct Args {
    command: Option<String>,
    config: Option<PathBuf>,
    mode: Option<ChatMode>,
    no_boot: bool,
    help: bool,
    version: bool,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "-V" | "--version" => parsed.version = true,
            "--no-boot" => parsed.no_boot = true,
            "-c" => {
                let input = iter.next().context("-c requires an input argument")?;
                parsed.command = Some(input.clone());
            }
            "--config" => {
                let path = iter.next().context("--config requires a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--mode" => {
                let mode = iter.next().context("--mode requires operator or oracle")?;
                parsed.mode = Some(mode.parse()?);
            }
            other => {
                if let Some(path) = other.strip_prefix("--config=") {
                    parsed.config = Some(PathBuf::from(path));
                } else if let Some(mode) = other.strip_prefix("--mode=") {
                    parsed.mode = Some(mode.parse()?);
                } else {
                    bail!("Unknown option: {other}\nRun 'phosphor --help' for usage.");
                }
            }
        }
    }
    Ok(parsed)
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().skip(1).collect();
    let args = parse_args(&args)?;

    if args.help {
        print_help();
        return Ok(ExitCode::SUCCESS);
    }
    if args.version {
        println!(
            "phosphor {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            env!("PHOSPHOR_GIT_HASH"),
            env!("PHOSPHOR_BUILD_DATE")
        );
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = match &args.config {
        Some(path) => PhosphorConfig::load_from(path)?,
        None => PhosphorConfig::load()?,
    };
    if let Some(mode) = args.mode {
        config.default_mode = mode;
    }
    if args.no_boot {
        config.boot_animation = false;
    }

    match args.command {
        Some(input) => run_command(config, &input),
        None => {
            phosphor_repl::run(config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Process one input and exit.
fn run_command(config: PhosphorConfig, input: &str) -> Result<ExitCode> {
    let mut repl = Repl::with_config(config)?;
    match repl.process_line(input) {
        Ok(Some(output)) => println!("{output}"),
        Ok(None) => {}
        Err(e) if e.is::<ExitRequested>() => {}
        Err(e) => return Err(e),
    }
    Ok(ExitCode::SUCCESS)
}

fn print_help() {
    println!(
        r#"phosphor v{}

Usage:
  phosphor                     Interactive terminal
  phosphor -c <input>          Process one input and exit

Options:
  -c <input>                   Process one input (filesystem verb, Easter egg or chat)
  --config <path>              Config file (default: ~/.config/phosphor/config.toml)
  --mode <operator|oracle>     Starting chat mode
  --no-boot                    Skip the boot sequence
  -h, --help                   Show this help
  -V, --version                Show version

Examples:
  phosphor -c 'ls'             # List the home directory
  phosphor -c 'cat readme.txt' # Read a file
  phosphor --mode oracle       # Talk to the oracle
"#,
        env!("CARGO_PKG_VERSION")
    );
}
