//! TOML-based configuration for OSC Checker.
//!
//! The file is read once at startup and never written back.  Its path
//! defaults to `config.toml` in the working directory and can be overridden
//! on the command line.
//!
//! # Schema
//!
//! ```toml
//! [app]
//! name = "OSC Checker"
//! version = "1.0.0"
//! log_level = "info"
//!
//! [[sender.targets]]
//! name = "Default"
//! host = "127.0.0.1"
//! port = 7000
//! address = "/test"
//!
//! [[sender.targets.arguments]]
//! type = "int"
//! default_value = "42"
//! description = "Test integer"
//!
//! [receiver]
//! default_port = 7000
//! max_log_entries = 100
//! ```
//!
//! `sender.targets` may also be written as a single table (`[sender.targets]`)
//! when there is only one destination, and `sender.list` is accepted as an
//! alias.  Both shapes deserialize into the same `Vec<TargetConfig>`.
//!
//! # Serde default values
//!
//! Every field is defaulted, so a partial file (or no file at all) still
//! yields a usable configuration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use osc_core::{ArgKind, OscArgument, DEFAULT_MAX_ENTRIES};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::send_message::SendTarget;

/// Config file name used when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error other than "not found".
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed (includes unknown argument types).
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The TOML parsed but a value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub sender: SenderConfig,
    #[serde(default)]
    pub receiver: ReceiverConfig,
}

/// Application identity and logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppSection {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_app_version")]
    pub version: String,
    /// `tracing` level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Send-side settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SenderConfig {
    #[serde(default = "default_targets", alias = "list")]
    pub targets: OneOrMany<TargetConfig>,
}

/// One configured destination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetConfig {
    #[serde(default = "default_target_name")]
    pub name: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default)]
    pub arguments: Vec<ArgumentConfig>,
}

/// One preconfigured argument row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArgumentConfig {
    #[serde(rename = "type", default)]
    pub kind: ArgKind,
    #[serde(default = "default_value")]
    pub default_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Receive-side settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReceiverConfig {
    #[serde(default = "default_port")]
    pub default_port: u16,
    #[serde(default = "default_max_log_entries")]
    pub max_log_entries: usize,
}

/// A single table or an array of tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(item) => std::slice::from_ref(item),
            OneOrMany::Many(items) => items,
        }
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_app_name() -> String {
    "OSC Checker".to_string()
}
fn default_app_version() -> String {
    "1.0.0".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_target_name() -> String {
    "Default".to_string()
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    7000
}
fn default_address() -> String {
    "/test".to_string()
}
fn default_value() -> String {
    "0".to_string()
}
fn default_max_log_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}
fn default_targets() -> OneOrMany<TargetConfig> {
    OneOrMany::Many(vec![TargetConfig::default()])
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
            log_level: default_log_level(),
        }
    }
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            targets: default_targets(),
        }
    }
}

impl Default for TargetConfig {
    /// The built-in target: `Default`, `127.0.0.1:7000 /test`, one int `42`.
    fn default() -> Self {
        Self {
            name: default_target_name(),
            host: default_host(),
            port: default_port(),
            address: default_address(),
            arguments: vec![ArgumentConfig {
                kind: ArgKind::Int,
                default_value: "42".to_string(),
                description: Some("Test integer".to_string()),
            }],
        }
    }
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            default_port: default_port(),
            max_log_entries: default_max_log_entries(),
        }
    }
}

// ── Conversions ───────────────────────────────────────────────────────────────

impl From<&ArgumentConfig> for OscArgument {
    fn from(cfg: &ArgumentConfig) -> Self {
        let arg = OscArgument::new(cfg.kind, cfg.default_value.clone());
        match &cfg.description {
            Some(description) => arg.with_description(description.clone()),
            None => arg,
        }
    }
}

impl From<&TargetConfig> for SendTarget {
    fn from(cfg: &TargetConfig) -> Self {
        let mut target = SendTarget::new(
            cfg.name.clone(),
            cfg.host.clone(),
            cfg.port,
            cfg.address.clone(),
        );
        target.arguments = cfg.arguments.iter().map(OscArgument::from).collect();
        target
    }
}

impl AppConfig {
    /// Editable send targets built from the configured entries, in file order.
    pub fn send_targets(&self) -> Vec<SendTarget> {
        self.sender
            .targets
            .as_slice()
            .iter()
            .map(SendTarget::from)
            .collect()
    }

    /// Checks values serde cannot express as types.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `receiver.max_log_entries` is 0,
    /// or when two send targets share a name.  Targets are addressed by name,
    /// and a target without one is called `Default`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.receiver.max_log_entries == 0 {
            return Err(ConfigError::Invalid(
                "receiver.max_log_entries must be at least 1".to_string(),
            ));
        }
        let mut names = HashSet::new();
        for target in self.sender.targets.as_slice() {
            if !names.insert(target.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate send target name {:?}; give each target a unique name",
                    target.name
                )));
            }
        }
        Ok(())
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses and validates configuration text.
///
/// # Errors
///
/// [`ConfigError::Parse`] for malformed TOML, [`ConfigError::Invalid`] for
/// out-of-range values.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let cfg: AppConfig = toml::from_str(content)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the file
/// does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and the errors of [`parse_config`] for the content.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
