use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::letterbox::LetterboxSettings;

/// One source image and where its letterboxed copy goes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Job {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl Job {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// Parses `SRC=DST`, the form used on the command line.
impl FromStr for Job {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.split_once('=') {
            Some((src, dst)) if !src.is_empty() && !dst.is_empty() => Ok(Self::new(src, dst)),
            _ => Err(format!("expected SRC=DST, got {raw:?}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    #[serde(flatten)]
    pub canvas: LetterboxSettings,
    /// Processed in order; relative paths resolve against the working directory.
    pub jobs: Vec<Job>,
}

impl Configuration {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.canvas.check().map_err(ConfigError::Invalid)?;
        if let Some(job) = self
            .jobs
            .iter()
            .find(|job| job.source.as_os_str().is_empty() || job.destination.as_os_str().is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "job has an empty path: {} -> {}",
                job.source.display(),
                job.destination.display()
            )));
        }
        Ok(())
    }
}

pub fn from_yaml_file(path: &Path) -> Result<Configuration, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    from_yaml_str(&text)
}

pub fn from_yaml_str(text: &str) -> Result<Configuration, ConfigError> {
    if text.trim().is_empty() {
        return Ok(Configuration::default());
    }
    Ok(serde_yaml::from_str(text)?)
}
