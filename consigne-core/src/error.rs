//! Error types for consigne-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("ambiguous or invalid local time (DST?): {0}")]
    AmbiguousLocalTime(String),

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
