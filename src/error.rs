//! Crate-wide error type.
//!
//! Every failure here is a misconfiguration or a broken terminal, never a
//! transient condition, so nothing retries.

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid asset: {0}")]
    InvalidAsset(String),
    #[error("no scene named {0:?}")]
    UnknownScene(String),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
