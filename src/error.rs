use std::path::PathBuf;

use thiserror::Error;

/// Application-wide result type
pub type Result<T> = anyhow::Result<T>;

/// Catalog API errors with typed variants for matching
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("YouTube Music API error: {0}")]
    YtMusic(String),

    #[error("Could not resolve album '{0}'. It may be region locked or no longer available.")]
    AlbumNotFound(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config file: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloader errors
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Downloader '{0}' not found. Please install yt-dlp or set downloader.command in the config.")]
    NotFound(String),

    #[error("Failed to launch downloader: {0}")]
    LaunchFailed(String),

    #[error("Downloader exited with error: {0}")]
    ExitError(String),

    #[error("Could not create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Downloader finished without reporting an output file")]
    MissingOutput,
}

/// Tag writing errors
#[derive(Error, Debug)]
#[cfg_attr(not(feature = "tag"), allow(dead_code))]
pub enum TagError {
    #[error("Failed to read {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    #[error("Failed to write tags to {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

/// Menu selection errors, shown to the user before re-prompting
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Please choose at least one number.")]
    Empty,

    #[error("'{0}' is not a number.")]
    NotANumber(String),

    #[error("{value} is out of range. Pick a number between 1 and {max}.")]
    OutOfRange { value: String, max: usize },

    #[error("'{0}' is not a valid range.")]
    InvalidRange(String),
}
