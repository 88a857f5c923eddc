//! CLI command handlers for keymapgen.
//!
//! This module provides the scriptable entry point used from build systems.

pub mod common;
pub mod generate;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use generate::GenerateArgs;
