//! typestrip: converts TypeScript/TSX project trees into plain JavaScript/JSX.

mod cli;
mod config;
mod orchestrator;
mod output;

use clap::Parser;
use cli::Args;
use config::ConvertConfig;
use miette::Result;
use output::Formatter;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = ConvertConfig::resolve(&args)?;
    let formatter = Formatter::new(args.output, config.workspace.clone());
    let timings = args.timings || read_env_bool("TYPESTRIP_TIMINGS").unwrap_or(false);

    let summary = match &args.file {
        Some(file) if args.stdout => {
            match orchestrator::strip_single(file, &config) {
                Ok(result) => {
                    print!("{}", result.code);
                    let path = config.workspace.join(file);
                    eprint!("{}", formatter.format_warnings(&path, &result.diagnostics));
                    if let Some(error) = &result.parse_error {
                        eprint!(
                            "{}",
                            formatter.format_warnings(&path, std::slice::from_ref(error))
                        );
                    }
                    return Ok(());
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(file) => match orchestrator::convert_single(file, &config) {
            Ok(summary) => summary,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => orchestrator::run(&config),
    };

    formatter.emit(&summary, timings);
    if !summary.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_env_bool(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
