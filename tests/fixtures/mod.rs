//! Shared test fixtures for generator tests.
#![allow(dead_code)] // Not every test file uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A PS/2 set 1 subset covering symbols, numbers, escapes and chorded rows.
///
/// 36 data rows: 33 single-code rows (25 with a character) and 3 chorded rows.
pub const SAMPLE_TABLE: &str = include_str!("scancodes.csv");

/// Two-row table from the basic scenario: one plain key, one chorded row.
pub const MINIMAL_TABLE: &str = "codes,name,char\n1,A,a\n2 3,Shift Combo,\n";

/// Path to the keymapgen binary
pub fn keymapgen_bin() -> &'static str {
    env!("CARGO_BIN_EXE_keymapgen")
}

/// Writes `contents` as `scancodes.csv` inside a fresh temp directory.
///
/// # Returns
/// The table path and the temp dir guard (keep it alive for the test).
pub fn create_temp_table(contents: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("scancodes.csv");
    fs::write(&path, contents).expect("Failed to write scan code table");
    (path, temp_dir)
}

/// Header and source output paths inside `dir`.
pub fn output_paths(dir: &Path) -> (PathBuf, PathBuf) {
    (dir.join("keycodes.h"), dir.join("keycodes.c"))
}

/// Runs keymapgen with `args` from `cwd`.
pub fn run_keymapgen(cwd: &Path, args: &[&str]) -> Output {
    Command::new(keymapgen_bin())
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Runs the generator on `table` with explicit output paths.
///
/// # Returns
/// The process output, header path, source path and temp dir guard.
pub fn generate_table(table: &str) -> (Output, PathBuf, PathBuf, TempDir) {
    let (input, temp_dir) = create_temp_table(table);
    let (header, source) = output_paths(temp_dir.path());

    let output = run_keymapgen(
        temp_dir.path(),
        &[
            input.to_str().unwrap(),
            "--header",
            header.to_str().unwrap(),
            "--output",
            source.to_str().unwrap(),
        ],
    );

    (output, header, source, temp_dir)
}

/// Extracts the `KEYCODE_*` enumerator names from a generated header, in order.
pub fn header_enumerators(header: &str) -> Vec<String> {
    header
        .lines()
        .filter_map(|line| line.trim().strip_suffix(','))
        .filter_map(|entry| entry.split_once(" = "))
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Extracts the identifiers of the `case` labels from a generated source, in order.
pub fn source_cases(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| line.trim().strip_prefix("case "))
        .filter_map(|label| label.strip_suffix(':'))
        .map(str::to_string)
        .collect()
}
