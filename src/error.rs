//! Error types for questline.
//!
//! [`Error`] covers fallible setup and contract violations. Store operations
//! never return it: remote failures are captured into a store's error slot
//! as a [`crate::cache::CacheError`] instead.

use thiserror::Error;

use crate::remote::RemoteError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("experience cannot be negative: {0}")]
    NegativeExperience(i64),

    #[error("remote call failed: {0}")]
    Remote(#[from] RemoteError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
