use crate::config::{ConfigError, LogConfig};
use simplelog::{
    ColorChoice,
    CombinedLogger,
    Config,
    SharedLogger,
    TermLogger,
    TerminalMode,
    WriteLogger,
};
use std::{fs::{self, File}, io, path::PathBuf};
use thiserror::Error;

/// Errors that can occur while setting up logging.
#[derive(Debug, Error)]
pub enum LogError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not create the log file {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("a logger is already installed")]
    AlreadyInstalled(#[from] log::SetLoggerError),
}

/// Installs a logger writing to stderr and to the configured log file.
///
/// The file is opened in append mode, so logs survive restarts.
pub fn init(config: &LogConfig) -> Result<(), LogError> {
    let path = config.path();
    let file = fs::create_dir_all(&config.dir)
        .and_then(|_| File::options().create(true).append(true).open(&path))
        .map_err(|source| LogError::File { path: path.clone(), source })?;

    let loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(
            config.term_level_filter()?,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
        WriteLogger::new(config.level_filter()?, Config::default(), file),
    ];
    CombinedLogger::init(loggers)?;

    log::info!("logging to {}", path.display());
    Ok(())
}
