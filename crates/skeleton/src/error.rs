//! Library error type.
//!
//! Mirrors the `thiserror`-based error enums used elsewhere in the retrieval
//! pack (e.g. `lyon_tessellation` depends on `thiserror`); the teacher crate
//! itself mostly signals failure via `bool`/`Option`, which is why an empty
//! chain here is modeled as an empty `Vec`, not as an `Error` variant.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("polygon is not monotone with respect to any direction")]
    NotMonotone,

    #[error("numeric inconsistency during skeleton computation: {0}")]
    NumericInconsistency(String),
}

pub type Result<T> = std::result::Result<T, Error>;
