use std::path::PathBuf;

use thiserror::Error;

/// Why a single letterbox job failed.
#[derive(Debug, Error)]
pub enum LetterboxError {
    /// Canvas settings that no image can be rendered into.
    #[error("invalid letterbox settings: {0}")]
    Settings(String),

    /// The source could not be opened, identified or decoded.
    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// The decoded pixels could not be resampled to the planned size.
    #[error("failed to resample {}: {reason}", path.display())]
    Resample { path: PathBuf, reason: String },

    /// The canvas could not be encoded for the destination format.
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Filesystem error while checking the source or writing the destination.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LetterboxError {
    pub(crate) fn decode(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            path: path.into(),
            reason: format!("{reason:#}"),
        }
    }

    pub(crate) fn resample(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Resample {
            path: path.into(),
            reason: format!("{reason:#}"),
        }
    }

    /// Short label for log fields and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Settings(_) => "settings",
            Self::Decode { .. } => "decode",
            Self::Resample { .. } => "resample",
            Self::Encode { .. } => "encode",
            Self::Io { .. } => "io",
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML/serde configuration error.
    #[error(transparent)]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
