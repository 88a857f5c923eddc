//! Keymap Generator Library
//!
//! This library turns a CSV table of keyboard scan codes into a C header
//! declaring `enum KeyCode` and a C source implementing `scan_code_to_char`.
//! It is meant to run as a build step for a kernel's PS/2 keyboard driver.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod keymap;
