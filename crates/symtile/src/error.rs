//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, degenerate geometry detected while rendering, runaway
//! destinations, tiling text parse failures, IO, and generic errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("tiling has no base cells")]
    EmptyTiling,

    #[error("degenerate lattice: repeat vectors are parallel")]
    DegenerateLattice,

    #[error("singular transform: {context}")]
    SingularTransform { context: String },

    #[error("base cell {base_cell} destination {destination} repeats without any stop condition")]
    UnboundedDestination { base_cell: usize, destination: usize },

    #[error("render would exceed the instance limit of {limit}")]
    InstanceLimit { limit: usize },

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unknown pattern '{name}'")]
    UnknownPattern { name: String },

    #[error("unsupported tiling: {0}")]
    UnsupportedTiling(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn singular(context: impl Into<String>) -> Self {
        Error::SingularTransform {
            context: context.into(),
        }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
