//! Errors from the space data feeds.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpaceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed returned HTTP {0}")]
    Status(u16),

    #[error("unexpected feed payload: {0}")]
    Decode(String),
}
