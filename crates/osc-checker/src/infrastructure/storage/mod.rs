//! Storage infrastructure: configuration file loading.
//!
//! The `config` sub-module handles:
//!
//! - Reading the TOML configuration file (send targets and receiver settings).
//! - Providing built-in defaults when the file does not exist.
//! - Turning the file's target entries into editable `SendTarget`s.

pub mod config;
