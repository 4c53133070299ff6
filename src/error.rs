use std::{fmt, io};

use http::status::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum CuratorError {
    /// A write targeted one of the reserved meta-fields a [`crate::draft::Draft`]
    /// uses internally for snapshot/diff storage.
    #[error("Cannot write to reserved field '{0}'")]
    InvalidField(String),
    /// A read targeted a key present in neither the snapshot nor the pending changes.
    #[error("No such field '{0}' in snapshot or pending changes")]
    NoSuchField(String),
    /// A relation bundle referenced an entity kind the cache does not recognize.
    /// Surfaced rather than dropped so API/schema drift is caught at the boundary.
    #[error("Unknown entity kind '{0}' in relation bundle")]
    UnknownKind(String),
    /// An entity submitted to a relation merge carries no `id`.
    #[error("Entity without an 'id' in relation bundle: {0}")]
    MissingIdentifier(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
}

impl CuratorError {
    /// Map an error onto the HTTP status a transport caller should answer with.
    /// Contract violations (malformed input from the caller) are client errors;
    /// everything else is a server-side failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CuratorError::InvalidField(_) => StatusCode::BAD_REQUEST,
            CuratorError::NoSuchField(_) => StatusCode::BAD_REQUEST,
            CuratorError::UnknownKind(_) => StatusCode::BAD_REQUEST,
            CuratorError::MissingIdentifier(_) => StatusCode::BAD_REQUEST,
            CuratorError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CuratorError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CuratorError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<JsonError> for CuratorError {
    fn from(src: JsonError) -> CuratorError {
        CuratorError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<toml::de::Error> for CuratorError {
    fn from(src: toml::de::Error) -> CuratorError {
        CuratorError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for CuratorError {
    fn from(src: toml::ser::Error) -> CuratorError {
        CuratorError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<io::Error> for CuratorError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => CuratorError::NotFound(format!("{x}")),
            _ => CuratorError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<fmt::Error> for CuratorError {
    fn from(x: fmt::Error) -> Self {
        CuratorError::Serialization(format!("{x}"))
    }
}
