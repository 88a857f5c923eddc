//! Keymap generation pipeline.
//!
//! This module turns a CSV table of keyboard scan codes into two C artifacts:
//! a header defining `enum KeyCode` and a source file implementing
//! `scan_code_to_char`. The pipeline is split into the identifier
//! normalizer ([`normalize`]), the record parser ([`records`]) and the
//! artifact emitter ([`emitter`]).

pub mod emitter;
pub mod normalize;
pub mod numbers;
pub mod records;

// Re-export commonly used items
pub use emitter::{emit, Artifacts};
pub use normalize::normalize;
pub use records::{parse, parse_table, ParseReport, ScanCodeRow, Warning};

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Symbolic constant name generated for one scan code (e.g. `KEYCODE_F_ONE`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct KeyIdentifier(String);

impl KeyIdentifier {
    /// Wraps an already-normalized identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if nothing follows the `KEYCODE_` prefix.
    #[must_use]
    pub fn is_bare_prefix(&self) -> bool {
        self.0 == crate::constants::IDENTIFIER_PREFIX
    }

    /// Returns true if the identifier only uses `[A-Z0-9_]`.
    #[must_use]
    pub fn is_valid_c_identifier(&self) -> bool {
        self.0
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    }
}

impl fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scan code -> identifier, iterated in lexicographic order of the code text.
///
/// Codes are compared as strings, so `"10"` sorts before `"2"`. Inserting an
/// existing code replaces its identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMap {
    entries: BTreeMap<String, KeyIdentifier>,
}

impl KeyMap {
    /// Creates an empty key map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a mapping, returning the identifier it replaced.
    pub fn insert(&mut self, code: impl Into<String>, id: KeyIdentifier) -> Option<KeyIdentifier> {
        self.entries.insert(code.into(), id)
    }

    /// Gets the identifier for a scan code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&KeyIdentifier> {
        self.entries.get(code)
    }

    /// Iterates `(code, identifier)` pairs in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyIdentifier)> {
        self.entries.iter().map(|(code, id)| (code.as_str(), id))
    }

    /// Returns true if any code maps to `id`.
    #[must_use]
    pub fn contains_identifier(&self, id: &KeyIdentifier) -> bool {
        self.entries.values().any(|existing| existing == id)
    }

    /// Number of scan codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no codes are mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Identifier -> printable character, iterated in lexicographic order of the identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharMap {
    entries: BTreeMap<KeyIdentifier, String>,
}

impl CharMap {
    /// Creates an empty character map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a mapping, returning the character it replaced.
    pub fn insert(&mut self, id: KeyIdentifier, literal: impl Into<String>) -> Option<String> {
        self.entries.insert(id, literal.into())
    }

    /// Gets the character literal for an identifier.
    #[must_use]
    pub fn get(&self, id: &KeyIdentifier) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Iterates `(identifier, literal)` pairs in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&KeyIdentifier, &str)> {
        self.entries.iter().map(|(id, literal)| (id, literal.as_str()))
    }

    /// Number of identifiers with a character.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no identifier has a character.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of one generation run.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Rendered header and source text
    pub artifacts: Artifacts,
    /// Number of enumerators in the header
    pub keycodes: usize,
    /// Number of case blocks in the source
    pub characters: usize,
    /// Diagnostics collected while parsing
    pub report: ParseReport,
}

/// Runs the pipeline on CSV text without touching the filesystem.
///
/// # Errors
///
/// Returns an error if the table is malformed (see [`parse_table`]).
pub fn generate_from_str(table: &str) -> Result<Generation> {
    let (key_map, char_map, report) = parse_table(table.as_bytes())?;
    let artifacts = emit(&key_map, &char_map);

    Ok(Generation {
        artifacts,
        keycodes: key_map.len(),
        characters: char_map.len(),
        report,
    })
}

/// Reads and parses the table at `input` without writing anything.
///
/// # Errors
///
/// Returns errors for:
/// - Unreadable input file (the error chain holds a [`std::io::Error`])
/// - Malformed table rows
pub fn read_table(input: &Path) -> Result<Generation> {
    let table = fs::read_to_string(input)
        .with_context(|| format!("Failed to read scan code table: {}", input.display()))?;

    let generation = generate_from_str(&table)
        .with_context(|| format!("Invalid scan code table: {}", input.display()))?;

    info!(
        "Parsed {} keycodes and {} characters from {}",
        generation.keycodes,
        generation.characters,
        input.display()
    );
    Ok(generation)
}

/// Writes both artifacts using temp file + rename.
///
/// Both temporary files are written before either target is replaced. The
/// existing header is moved aside while the pair is committed and restored
/// if the source cannot be renamed into place, so a failure never leaves a
/// new header next to an old or missing source.
///
/// # Errors
///
/// Returns an error if a temporary file cannot be written or renamed.
pub fn write_artifacts(
    artifacts: &Artifacts,
    header_path: &Path,
    source_path: &Path,
) -> Result<()> {
    let header_temp = sibling_path(header_path, "tmp");
    let source_temp = sibling_path(source_path, "tmp");

    let staged = fs::write(&header_temp, &artifacts.header)
        .with_context(|| format!("Failed to write to temporary file: {}", header_temp.display()))
        .and_then(|()| {
            fs::write(&source_temp, &artifacts.source).with_context(|| {
                format!("Failed to write to temporary file: {}", source_temp.display())
            })
        });

    if let Err(e) = staged {
        let _ = fs::remove_file(&header_temp);
        let _ = fs::remove_file(&source_temp);
        return Err(e);
    }

    let header_backup = sibling_path(header_path, "bak");
    let had_header = header_path.is_file();
    if had_header {
        if let Err(e) = fs::rename(header_path, &header_backup) {
            let _ = fs::remove_file(&header_temp);
            let _ = fs::remove_file(&source_temp);
            return Err(e).with_context(|| {
                format!("Failed to move existing header aside: {}", header_path.display())
            });
        }
    }

    debug!("Staged artifacts, renaming into place");
    let committed = fs::rename(&header_temp, header_path)
        .with_context(|| format!("Failed to rename temporary file to: {}", header_path.display()))
        .and_then(|()| {
            fs::rename(&source_temp, source_path).with_context(|| {
                format!("Failed to rename temporary file to: {}", source_path.display())
            })
        });

    if let Err(e) = committed {
        debug!("Restoring previous header {}", header_path.display());
        let _ = fs::remove_file(&header_temp);
        let _ = fs::remove_file(&source_temp);
        if had_header {
            let _ = fs::rename(&header_backup, header_path);
        } else {
            let _ = fs::remove_file(header_path);
        }
        return Err(e);
    }

    if had_header {
        let _ = fs::remove_file(&header_backup);
    }
    Ok(())
}

/// Sibling path with an extra extension, e.g. `keycodes.h` -> `keycodes.h.tmp`.
fn sibling_path(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(extension);
    path.with_file_name(name)
}
