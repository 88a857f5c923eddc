//! keymapgen - scan code table to C keycode generator
//!
//! Reads a CSV table of scan codes and writes a header with one `KEYCODE_*`
//! enumerator per scan code plus a source file mapping each enumerator back
//! to the character it types.
//!
//! # Usage
//!
//! ```bash
//! keymapgen data/scancodes.csv --header include/keycodes.h --output src/keycodes.c
//! ```

use clap::Parser;
use keymapgen::cli::{ExitCode, GenerateArgs};
use keymapgen::constants::APP_BINARY_NAME;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Generate C keycode definitions from a scan code table
#[derive(Parser, Debug)]
#[command(name = APP_BINARY_NAME, author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    generate: GenerateArgs,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing (stderr keeps stdout clean for --json)
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = cli.generate.execute() {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code.code());
    }

    std::process::exit(ExitCode::Success.code());
}
