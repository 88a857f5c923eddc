//! Application-wide constants.
//!
//! This module defines constants shared by the generator and the command line,
//! including the binary name and the fixed identifier prefix.

/// The binary name of the application (used in command examples and messages).
pub const APP_BINARY_NAME: &str = "keymapgen";

/// Configuration file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "keymapgen.toml";

/// Prefix carried by every generated keycode identifier.
pub const IDENTIFIER_PREFIX: &str = "KEYCODE_";

/// Header file name the generated source includes.
pub const HEADER_INCLUDE: &str = "keycodes.h";
