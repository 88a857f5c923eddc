//! Generate command for keycode artifacts.

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::keymap::{self, Generation, Warning};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Generate the keycode header and lookup source from a scan code table
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Scan code table (CSV: codes,name,char)
    #[arg(value_name = "INFILE")]
    pub input: PathBuf,

    /// Output header file (enum KeyCode)
    #[arg(short = 'd', long, value_name = "FILE")]
    pub header: Option<PathBuf>,

    /// Output source file (scan_code_to_char)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Configuration file (defaults to ./keymapgen.toml if present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print a JSON summary instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct GenerateSummary<'a> {
    input: &'a Path,
    header: &'a Path,
    source: &'a Path,
    keycodes: usize,
    characters: usize,
    skipped_rows: usize,
    warnings: &'a [Warning],
}

impl GenerateArgs {
    /// Execute the generate command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load(self.config.as_deref())
            .map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))?;

        let header_path = config.header_path(self.header.as_deref()).ok_or_else(|| {
            CliError::validation("Header output not specified. Use --header or set paths.header")
        })?;
        let source_path = config.source_path(self.output.as_deref()).ok_or_else(|| {
            CliError::validation("Source output not specified. Use --output or set paths.source")
        })?;

        if header_path == source_path {
            return Err(CliError::validation(format!(
                "Header and source outputs must be different files (both are {})",
                header_path.display()
            )));
        }

        // Read and parse everything before touching any output
        let generation = keymap::read_table(&self.input).map_err(|e| {
            if e.downcast_ref::<std::io::Error>().is_some() {
                CliError::io(format!("{e:#}"))
            } else {
                CliError::validation(format!("{e:#}"))
            }
        })?;

        log_warnings(&generation, &config);

        keymap::write_artifacts(&generation.artifacts, &header_path, &source_path)
            .map_err(|e| CliError::io(format!("Failed to write artifacts: {e:#}")))?;

        debug!(
            "Wrote {} and {}",
            header_path.display(),
            source_path.display()
        );

        if self.json {
            let summary = GenerateSummary {
                input: &self.input,
                header: &header_path,
                source: &source_path,
                keycodes: generation.keycodes,
                characters: generation.characters,
                skipped_rows: generation.report.skipped_rows(),
                warnings: &generation.report.warnings,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&summary)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            println!(
                "✓ Generated {} and {}",
                header_path.display(),
                source_path.display()
            );
            println!(
                "  {} keycodes, {} characters, {} rows skipped",
                generation.keycodes,
                generation.characters,
                generation.report.skipped_rows()
            );
        }

        Ok(())
    }
}

/// Logs parse warnings allowed by the diagnostics configuration.
fn log_warnings(generation: &Generation, config: &Config) {
    for warning in &generation.report.warnings {
        let enabled = if warning.is_duplicate() {
            config.diagnostics.warn_duplicates
        } else {
            config.diagnostics.warn_degenerate
        };

        if enabled {
            warn!("{warning}");
        }
    }
}
