//! Error types shared by the schedule core, the store and the config loader.

use thiserror::Error;

/// A time-of-day string that could not be turned into minutes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("malformed time {0:?}, expected HH:MM")]
    Malformed(String),

    #[error("time {0:?} is out of range")]
    OutOfRange(String),
}

/// Why a drag gesture ended without changing the schedule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitRejection {
    #[error("released outside the calendar grid")]
    OutsideGrid,

    #[error("end would not follow start")]
    InvertedRange,

    #[error("item would cross midnight")]
    OutOfDay,

    #[error("item has malformed times: {0}")]
    MalformedItem(#[from] TimeError),

    #[error("no item with id {0}")]
    UnknownItem(String),
}

/// Reading or writing the schedule data file.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid schedule data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Persister stopped")]
    Closed,
}

/// Loading the TOML config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
