//! Configuration loading for the retrosheet decipher.
//!
//! `defaults/retrosheet.default.toml` is embedded into the binary so that the
//! documented defaults and runtime behavior stay in sync. Callers layer
//! user files and command-line overrides on top via [`Loader`] before
//! deserializing into [`RetrosheetConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

use crate::event::pitches::DEFAULT_IGNORED;
use crate::event::processor::{OutputFormat, Table};

const DEFAULT_TOML: &str = include_str!("../defaults/retrosheet.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RetrosheetConfig {
    pub pitches: PitchesConfig,
    pub output: OutputConfig,
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PitchesConfig {
    /// Pitch-field characters that are not pitches
    pub ignored: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Table printed by `decipher` when no output directory is given
    pub table: Table,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProcessingConfig {
    pub parallel: bool,
}

/// The same values as the embedded defaults, without going through `config`.
impl Default for RetrosheetConfig {
    fn default() -> Self {
        RetrosheetConfig {
            pitches: PitchesConfig {
                ignored: DEFAULT_IGNORED.to_string(),
            },
            output: OutputConfig {
                format: OutputFormat::Csv,
                table: Table::Plays,
            },
            processing: ProcessingConfig { parallel: true },
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<RetrosheetConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<RetrosheetConfig, ConfigError> {
    Loader::new().build()
}
