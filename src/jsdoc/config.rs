//! Parser configuration
//!
//! `defaults/jsdoc.default.toml` is embedded into the crate so the documented
//! defaults and [`ParserConfig::default`] cannot drift apart. Callers layer
//! their own files and overrides on top through [`Loader`].
//!
//! Only plain data lives here. Function-valued options (custom extraction,
//! per-node overrides) are set on [`ParserBuilder`](crate::jsdoc::parser::ParserBuilder).

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/jsdoc.default.toml");

/// Resolved configuration, built once and shared by every parse call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParserConfig {
    pub strict: bool,
    pub format: bool,
    pub types: TypesConfig,
    pub tags: TagsConfig,
    pub inline: InlineConfig,
    pub extract: ExtractConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypesConfig {
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagsConfig {
    pub closed_vocabulary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InlineConfig {
    pub strip_markers: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractConfig {
    pub keep_protected: bool,
}

impl Default for ParserConfig {
    /// Mirrors `defaults/jsdoc.default.toml`.
    fn default() -> Self {
        ParserConfig {
            strict: false,
            format: false,
            types: TypesConfig {
                max_depth: crate::jsdoc::types::DEFAULT_MAX_DEPTH,
            },
            tags: TagsConfig {
                closed_vocabulary: false,
            },
            inline: InlineConfig {
                strip_markers: false,
            },
            extract: ExtractConfig {
                keep_protected: false,
            },
        }
    }
}

impl ParserConfig {
    pub fn strict() -> Self {
        ParserConfig {
            strict: true,
            ..Default::default()
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

    /// Apply a single key/value override, e.g. `("types.max_depth", 16)`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<ParserConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ParserConfig, ConfigError> {
    Loader::new().build()
}
