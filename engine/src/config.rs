//! Parse-time switches for matching argv against a usage grammar.
//!
//! The switches can be set in code or loaded from YAML, so a harness can keep
//! per-program settings next to the usage text it checks.
//!
//! # Example YAML
//!
//! ```yaml
//! help: true
//! version: false
//! options_first: true
//! ```
//!
//! Missing keys take their defaults.

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Switches controlling one [`parse`](crate::parse) call.
///
/// # Examples
///
/// ```
/// use docopt_engine::ParseConfig;
///
/// let config = ParseConfig::default().with_options_first(true);
/// assert!(config.help);
/// assert!(config.version);
/// assert!(config.options_first);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Report help-requested when `-h`/`--help` is present in argv.
    pub help: bool,
    /// Report version-requested when `--version` is present in argv.
    pub version: bool,
    /// Stop recognizing options after the first positional token.
    pub options_first: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            help: true,
            version: true,
            options_first: false,
        }
    }
}

impl ParseConfig {
    pub fn with_help(mut self, help: bool) -> Self {
        self.help = help;
        self
    }

    pub fn with_version(mut self, version: bool) -> Self {
        self.version = version;
        self
    }

    pub fn with_options_first(mut self, options_first: bool) -> Self {
        self.options_first = options_first;
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
