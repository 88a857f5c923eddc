//! C header and source generation.
//!
//! Renders the [`KeyMap`] into `enum KeyCode` and the [`CharMap`] into the
//! `scan_code_to_char` switch. Entry order follows the maps' own iteration
//! order, so identical input always produces byte-identical artifacts.

use crate::constants::HEADER_INCLUDE;
use crate::keymap::{CharMap, KeyMap};

const ENUM_HEADER: &str = "#pragma once\n\nenum KeyCode {\n";

const ENUM_FOOTER: &str = "};\n";

const SWITCH_DECL: &str = "char scan_code_to_char(enum KeyCode scan_code);\n";

const SWITCH_HEADER: &str = "char scan_code_to_char(enum KeyCode scan_code) {\n  switch (scan_code) {\n";

const SWITCH_FOOTER: &str = "
  default:
    return '\\0';
  }
}
";

/// The two generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// Contents of the header (`keycodes.h`)
    pub header: String,
    /// Contents of the lookup source (`keycodes.c`)
    pub source: String,
}

/// Escapes a character literal for use between single quotes.
///
/// A `'` or `\` is prefixed with a backslash unless a lowercase ASCII letter
/// follows it, so `\t` and `\n` pass through as C escapes while a lone `'`
/// or `\` becomes `\'` or `\\`.
#[must_use]
pub fn escape_char_literal(literal: &str) -> String {
    let mut output = String::with_capacity(literal.len() + 2);
    let mut chars = literal.chars().peekable();

    while let Some(c) = chars.next() {
        if matches!(c, '\'' | '\\') && !chars.peek().is_some_and(char::is_ascii_lowercase) {
            output.push('\\');
        }
        output.push(c);
    }

    output
}

/// Renders the header: the `KeyCode` enum plus the lookup declaration.
#[must_use]
pub fn render_header(key_map: &KeyMap) -> String {
    let mut output = String::from(ENUM_HEADER);

    for (code, identifier) in key_map.iter() {
        output.push_str(&format!("    {identifier} = {code},\n"));
    }

    output.push_str(ENUM_FOOTER);
    output.push_str(SWITCH_DECL);
    output
}

/// Renders the source: one `case` per character, defaulting to `'\0'`.
#[must_use]
pub fn render_source(char_map: &CharMap) -> String {
    let mut output = format!("#include \"{HEADER_INCLUDE}\"\n\n");
    output.push_str(SWITCH_HEADER);

    for (identifier, literal) in char_map.iter() {
        output.push_str(&format!(
            "  case {identifier}:\n    return '{}';\n",
            escape_char_literal(literal)
        ));
    }

    output.push_str(SWITCH_FOOTER);
    output
}

/// Renders both artifacts.
#[must_use]
pub fn emit(key_map: &KeyMap, char_map: &CharMap) -> Artifacts {
    Artifacts {
        header: render_header(key_map),
        source: render_source(char_map),
    }
}
