//! gen-clangd CLI
//!
//! Entry point for the `gen-clangd` command-line tool.

use clap::Parser;
use gen_clangd::{EffectiveConfig, GenerateError, Generator};
use std::error::Error;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::panic;
use std::process;
use std::thread;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gen-clangd")]
#[command(about = "Generate a .clangd file with include paths for a C project", version)]
struct Cli {
    /// Project root to scan
    #[arg(default_value = ".")]
    root: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    // Progress goes to stderr; RUST_LOG overrides the info default.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    let exit_code = report(panic::catch_unwind(|| run(&cli.root)));
    if exit_code != 0 {
        process::exit(exit_code);
    }
}

/// Log a failed run and map it to an exit code.
///
/// Errors and panics both exit 1. The default panic hook has already
/// printed the panic message by the time this sees the payload.
fn report(outcome: thread::Result<Result<(), GenerateError>>) -> i32 {
    match outcome {
        Ok(Ok(())) => 0,
        Ok(Err(e)) => {
            error!("Error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                error!("  caused by: {}", cause);
                source = cause.source();
            }
            1
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!("Internal error: {}", message);
            1
        }
    }
}

fn run(root: &Path) -> Result<(), GenerateError> {
    let effective = EffectiveConfig::discover(root)?;
    for source in &effective.sources {
        match &source.path {
            Some(path) => debug!("Config layer {:?}: {}", source.origin, path),
            None => debug!("Config layer {:?}", source.origin),
        }
    }

    let generator = Generator::new(root, effective.config)?;
    let summary = generator.generate()?;
    print!("{}", summary.to_human());

    Ok(())
}
