// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// No such Collection, Dataset, Dimension or value in a list.
    #[error("no such item: {0}")]
    NoSuchItem(String),

    /// This string is not allowed as an id at this point.
    #[error("invalid id: {0}")]
    InvalidId(String),

    #[error("no such datatype: {0}")]
    NoSuchDatatype(String),

    /// The adapter encountered invalid upstream data.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A required adapter callback was not provided.
    #[error("this scraper has no method for {0}")]
    Unimplemented(&'static str),

    #[error("`{value}` can not be translated to dialect `{dialect}`")]
    NotTranslatable { value: String, dialect: String },

    #[error("`{0}` is not a dataset")]
    NotADataset(String),

    #[error("catalogue table {path}: {source}")]
    Catalogue {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Anything an adapter's own I/O stack raises.
    #[error(transparent)]
    Upstream(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn upstream<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Upstream(err.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    /// Not-found conditions callers may want to recover from.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NoSuchItem(_) | Error::NoSuchDatatype(_))
    }
}
