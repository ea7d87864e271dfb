use clap::Parser;

use faultline_core::error::FaultlineError;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "faultline",
    version,
    about = "Find structural risk in a codebase by simulating stress on its dependency graph"
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Classify an error into a process exit code.
///
/// Exit codes:
///   0   success
///   1   general/unknown error
///   2   configuration error
///   3   input not found
///   4   snapshot parse error
///   7   render failed
///   10  stress findings at or above the `--fail-on` level
fn classify_exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<commands::StressFindings>().is_some() {
        return 10;
    }
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<FaultlineError>() {
            return match e {
                FaultlineError::Config(_) => 2,
                FaultlineError::Snapshot(_) => 4,
                FaultlineError::Render(_) => 7,
                FaultlineError::Analyze(_) => 1,
            };
        }
    }

    let lower = format!("{err:#}").to_lowercase();
    if lower.contains("not found") || lower.contains("cannot resolve path") {
        3
    } else if lower.contains("config") {
        2
    } else {
        1
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match commands::run(cli.command) {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(classify_exit_code(&e));
        }
    }
}
