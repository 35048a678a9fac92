mod debug_report;

use bath::{LogSink, Options, default_catalog, find_actions_verbose_with, load_trace, read_trace};
use std::error::Error;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

fn main() {
    env_logger::init();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(config: &CliConfig) -> Result<(), Box<dyn Error>> {
    let forest = match &config.input {
        Some(path) => load_trace(path)?,
        None => read_trace(io::stdin().lock())?,
    };

    let opts = Options { max_passes: config.max_passes };
    let res = find_actions_verbose_with(forest, default_catalog(), &opts, &LogSink);

    if config.json {
        println!("{}", serde_json::to_string_pretty(&res.actions)?);
    } else {
        let source = config.input.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<stdin>".to_string());
        debug_report::print_run(&source, &res, config.color);
    }
    Ok(())
}

struct CliConfig {
    input: Option<PathBuf>,
    json: bool,
    max_passes: usize,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<PathBuf> = None;
    let mut json = false;
    let mut max_passes = Options::default().max_passes;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("bath {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--json" => json = true,
            "--max-passes" => {
                let value = args.next().ok_or_else(|| "error: --max-passes expects a value".to_string())?;
                max_passes = parse_max_passes(&value)?;
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                set_input(&mut input, value)?;
            }
            _ if arg.starts_with("--max-passes=") => {
                max_passes = parse_max_passes(arg.trim_start_matches("--max-passes="))?;
            }
            _ if arg.starts_with("--input=") => {
                set_input(&mut input, arg.trim_start_matches("--input=").to_string())?;
            }
            _ if arg.starts_with('-') && arg != "-" => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => set_input(&mut input, arg)?,
        }
    }

    if input.is_none() && io::stdin().is_terminal() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, json, max_passes, color })
}

/// `-` reads the trace from stdin.
fn set_input(input: &mut Option<PathBuf>, value: String) -> Result<(), String> {
    if input.is_some() {
        return Err("error: input provided multiple times".to_string());
    }
    if value != "-" {
        *input = Some(PathBuf::from(value));
    }
    Ok(())
}

fn parse_max_passes(value: &str) -> Result<usize, String> {
    value.parse().map_err(|_| format!("error: invalid --max-passes '{value}' (expected a non-negative integer)"))
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "bath {version}

Recognize jetton transfers and mints in an execution trace.

Usage:
  bath [OPTIONS] <trace.json>
  bath [OPTIONS] --input <trace.json>
  cat trace.json | bath [OPTIONS]

Options:
  -i, --input <path>         Trace file (JSON). Use '-' or omit to read stdin.
  --json                     Print the actions as JSON instead of a report.
  --max-passes <n>           Upper bound on catalog passes. Default: {max_passes}
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  RUST_LOG                   Log filter, e.g. RUST_LOG=bath=debug.

Exit codes:
  0  Success.
  1  The trace could not be read or decoded.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        max_passes = Options::default().max_passes
    )
}
