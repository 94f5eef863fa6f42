//! Configuration loaded from a `calcplot.toml` file.
//!
//! Every field has a default, so a partial file (or none at all) is a valid configuration:
//!
//! ```toml
//! [plots]
//! dir = "static/plots"
//! max_files = 20
//! samples = 500
//! url_prefix = "/static/plots/"
//! width = 800
//! height = 600
//!
//! [engine]
//! program = "numbat"
//! script = "numbat_script.nbt"
//! timeout_secs = 5
//!
//! [log]
//! dir = "logs"
//! file = "calcplot.log"
//! level = "info"
//! term_level = "warn"
//! ```

use calcplot_compute::DEFAULT_SAMPLES;
use calcplot_engine::{DEFAULT_PROGRAM, DEFAULT_SCRIPT, DEFAULT_TIMEOUT};
use log::{debug, LevelFilter};
use serde::Deserialize;
use std::{
    fs,
    io,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use thiserror::Error;

/// The file read when no configuration file is named.
pub const DEFAULT_CONFIG: &str = "calcplot.toml";

/// Errors that can occur while loading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("`{0}` is not a log level (expected off, error, warn, info, debug or trace)")]
    InvalidLevel(String),

    #[error("`{key}` must be at least {min}, got {value}")]
    OutOfRange {
        key: &'static str,
        min: u64,
        value: u64,
    },
}

/// Checks that a numeric setting is at least `min`.
fn at_least(key: &'static str, value: u64, min: u64) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::OutOfRange { key, min, value });
    }
    Ok(())
}

/// Where plots are stored and how they are drawn.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlotsConfig {
    /// The directory plot images are written to.
    pub dir: PathBuf,

    /// The number of images kept before the oldest are deleted.
    pub max_files: usize,

    /// The number of points a function is sampled at.
    pub samples: usize,

    /// The URL prefix the images are served under.
    pub url_prefix: String,

    /// The image width, in pixels.
    pub width: u16,

    /// The image height, in pixels.
    pub height: u16,
}

impl Default for PlotsConfig {
    fn default() -> Self {
        PlotsConfig {
            dir: PathBuf::from("static/plots"),
            max_files: 20,
            samples: DEFAULT_SAMPLES,
            url_prefix: "/static/plots/".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// The external computation engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// The engine program.
    pub program: String,

    /// The script file handed to the engine.
    pub script: PathBuf,

    /// The time the engine may run for, in seconds.
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            program: DEFAULT_PROGRAM.to_string(),
            script: PathBuf::from(DEFAULT_SCRIPT),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl EngineConfig {
    /// The engine timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Logging to the terminal and to a file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// The directory the log file is written to.
    pub dir: PathBuf,

    /// The name of the log file.
    pub file: String,

    /// The level of messages written to the log file.
    pub level: String,

    /// The level of messages written to the terminal.
    pub term_level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            dir: PathBuf::from("logs"),
            file: "calcplot.log".to_string(),
            level: "info".to_string(),
            term_level: "warn".to_string(),
        }
    }
}

/// Parses a log level name.
fn level(name: &str) -> Result<LevelFilter, ConfigError> {
    LevelFilter::from_str(name).map_err(|_| ConfigError::InvalidLevel(name.to_string()))
}

impl LogConfig {
    /// The path of the log file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file)
    }

    /// The level of messages written to the log file.
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        level(&self.level)
    }

    /// The level of messages written to the terminal.
    pub fn term_level_filter(&self) -> Result<LevelFilter, ConfigError> {
        level(&self.term_level)
    }
}

/// The whole configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub plots: PlotsConfig,
    pub engine: EngineConfig,
    pub log: LogConfig,
}

impl Config {
    /// Parses a configuration from TOML text. `path` is only used in error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings every request would fail on, so they are reported at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least("plots.max_files", self.plots.max_files as u64, 1)?;
        at_least("plots.samples", self.plots.samples as u64, 2)?;
        at_least("plots.width", self.plots.width.into(), 1)?;
        at_least("plots.height", self.plots.height.into(), 1)?;
        at_least("engine.timeout_secs", self.engine.timeout_secs, 1)?;
        self.log.level_filter()?;
        self.log.term_level_filter()?;
        Ok(())
    }

    /// Loads the configuration at `path`. A missing file gives the default configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text, path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("{} not found, using the default configuration", path.display());
                Ok(Config::default())
            },
            Err(source) => Err(ConfigError::Io { path: path.to_path_buf(), source }),
        }
    }
}
