//! Key name to identifier normalization.
//!
//! Turns free-text key names from the scan code table ("Keypad 7 (Home)",
//! "F12", "*") into C enumerator names (`KEYCODE_KEYPAD_SEVEN`,
//! `KEYCODE_F_TWELVE`, `KEYCODE_STAR`). The pipeline runs in a fixed order:
//!
//! 1. parenthesized groups are deleted
//! 2. symbols are spelled out from [`SPECIAL_REPLACEMENTS`]
//! 3. digit runs are spelled out as English cardinals
//! 4. the result is upper-cased, trimmed, and `-`/space become `_`
//! 5. the [`IDENTIFIER_PREFIX`] is prepended

use crate::constants::IDENTIFIER_PREFIX;
use crate::keymap::numbers::digits_to_words;
use crate::keymap::KeyIdentifier;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Symbols replaced by their spelled-out names during normalization.
pub const SPECIAL_REPLACEMENTS: &[(char, &str)] = &[
    ('*', "STAR"),
    ('+', "PLUS"),
    ('-', "MINUS"),
    ('/', "SLASH"),
    ('\\', "BACKSLASH"),
    ('=', "EQUALS"),
    ('(', "LEFT PARENTHESIS"),
    (')', "RIGHT PARENTHESIS"),
    ('{', "LEFT BRACE"),
    ('}', "RIGHT BRACE"),
    ('[', "LEFT BRACKET"),
    (']', "RIGHT BRACKET"),
    ('<', "LESS THAN"),
    ('>', "GREATER THAN"),
    ('!', "EXCLAMATION MARK"),
    ('@', "AT SYMBOL"),
    ('#', "POUND SIGN"),
    ('$', "DOLLAR SIGN"),
    ('^', "CARET"),
    ('&', "AMPERSAND"),
    ('_', "UNDERSCORE"),
    ('`', "GRAVE ACCENT"),
    ('~', "TILDE"),
    ('|', "PIPE"),
    ('.', "PERIOD"),
    (',', "COMMA"),
    (';', "SEMICOLON"),
    (':', "COLON"),
    ('"', "DOUBLE QUOTE"),
    ('\'', "SINGLE QUOTE"),
    ('?', "QUESTION MARK"),
];

/// One parenthesized group, matched non-greedily up to the first `)`.
static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("parenthetical pattern is valid"));

/// A digit run with an optional single letter directly in front of it.
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]?)([0-9]+)").expect("number pattern is valid"));

/// Looks up the spelled-out replacement for a symbol.
#[must_use]
pub fn special_replacement(c: char) -> Option<&'static str> {
    SPECIAL_REPLACEMENTS
        .iter()
        .find(|(symbol, _)| *symbol == c)
        .map(|(_, word)| *word)
}

/// Deletes every parenthesized group: `"text (note) more"` -> `"text  more"`.
#[must_use]
pub fn remove_parentheticals(name: &str) -> String {
    PARENTHETICAL.replace_all(name, "").into_owned()
}

/// Replaces each symbol found in [`SPECIAL_REPLACEMENTS`] with its name.
#[must_use]
pub fn replace_special(name: &str) -> String {
    let mut output = String::with_capacity(name.len());
    for c in name.chars() {
        match special_replacement(c) {
            Some(word) => output.push_str(word),
            None => output.push(c),
        }
    }
    output
}

/// Spells out digit runs: `"F1"` -> `"F one"`, `"12"` -> `"twelve"`.
///
/// A letter immediately before the digits is kept and separated from the
/// spelled number by a single space.
#[must_use]
pub fn expand_numbers(name: &str) -> String {
    NUMBER
        .replace_all(name, |caps: &Captures| {
            let words = digits_to_words(&caps[2]);
            match &caps[1] {
                "" => words,
                unit => format!("{unit} {words}"),
            }
        })
        .into_owned()
}

/// Upper-cases, trims and turns dashes and spaces into underscores.
fn to_identifier_case(name: &str) -> String {
    name.to_uppercase()
        .trim()
        .replace('-', "_")
        .replace(' ', "_")
}

/// Normalizes a raw key name into a keycode identifier.
///
/// A name that is empty after normalization yields the bare prefix
/// (`KEYCODE_`) rather than an error.
///
/// # Examples
///
/// ```
/// use keymapgen::keymap::normalize::normalize;
///
/// assert_eq!(normalize("F1").as_str(), "KEYCODE_F_ONE");
/// assert_eq!(normalize("Enter (Return)").as_str(), "KEYCODE_ENTER");
/// ```
#[must_use]
pub fn normalize(raw_name: &str) -> KeyIdentifier {
    let stripped = remove_parentheticals(raw_name);
    let spelled = replace_special(&stripped);
    let expanded = expand_numbers(&spelled);
    let body = to_identifier_case(&expanded);

    KeyIdentifier::new(format!("{IDENTIFIER_PREFIX}{body}"))
}
