//! Configuration errors.
//!
//! Every failure names the file, variable or key that caused it, so the
//! CLI can print it as-is under `SYSTEM_CONFIG_ERROR`.
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | [`ConfigError::ReadFile`] | `~/.spacewh/config.toml` or `<project>/.spacewh/config.toml` exists but cannot be read |
//! | [`ConfigError::ParseToml`] | a config file is not valid TOML for [`SpacewhConfig`](super::SpacewhConfig) |
//! | [`ConfigError::InvalidEnvVar`] | a `SPACEWH_*` variable does not parse (bool, number, mode name) |
//! | [`ConfigError::InvalidValue`] | a merged value is unusable: unknown `router.default_mode`, unknown `[modes.<name>]`, zero limits |
//! | [`ConfigError::Serialize`] | `config --save` cannot render the merged config |
//! | [`ConfigError::CreateDir`] / [`ConfigError::WriteFile`] | `config --save` cannot write the global file |

use std::path::PathBuf;
use thiserror::Error;

/// Failure while loading, validating or saving a [`SpacewhConfig`](super::SpacewhConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config layer file could not be read.
    #[error("cannot read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A config layer file is malformed.
    #[error("malformed config file '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A `SPACEWH_*` environment variable has an unusable value.
    #[error("invalid value for environment variable '{name}': {message}")]
    InvalidEnvVar { name: String, message: String },

    /// A key parsed but names no mode or breaks a limit.
    #[error("invalid config value '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// The merged config could not be rendered as TOML.
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The global config directory could not be created.
    #[error("cannot create config directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The global config file could not be written.
    #[error("cannot write config file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse_toml(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ParseToml {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CreateDir {
            path: path.into(),
            source,
        }
    }

    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Path of the offending file, for file-backed failures.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::ReadFile { path, .. }
            | Self::ParseToml { path, .. }
            | Self::CreateDir { path, .. }
            | Self::WriteFile { path, .. } => Some(path),
            Self::InvalidEnvVar { .. } | Self::InvalidValue { .. } | Self::Serialize(_) => None,
        }
    }
}
