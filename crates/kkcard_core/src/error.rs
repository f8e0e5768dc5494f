use std::io;

use thiserror::Error;

/// Coarse classification of codec failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    Truncated,
    UnsupportedVersion,
    UnknownObjectType,
    UnresolvedPath,
    Io,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed data at offset {offset:#x}: {message}")]
    Format { offset: usize, message: String },

    #[error("unexpected end of data at offset {offset:#x} (need {need} bytes, have {have})")]
    Truncated {
        offset: usize,
        need: usize,
        have: usize,
    },

    #[error("{context}: unsupported version {version:?}")]
    UnsupportedVersion { context: String, version: String },

    #[error("unknown scene object type {tag} at offset {offset:#x}")]
    UnknownObjectType { offset: usize, tag: i32 },

    #[error("nested extension path {path} does not address a value")]
    UnresolvedPath { path: String },

    #[error("invalid MessagePack data at offset {offset:#x}: {message}")]
    MsgPack { offset: usize, message: String },

    #[error("lz4: {0}")]
    Compression(String),

    #[error("block {name:?}: {source}")]
    Block {
        name: String,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub fn format(offset: usize, message: impl Into<String>) -> Self {
        Self::Format {
            offset,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Format { .. } | Error::MsgPack { .. } | Error::Compression(_) => {
                ErrorKind::Format
            }
            Error::Truncated { .. } => ErrorKind::Truncated,
            Error::UnsupportedVersion { .. } => ErrorKind::UnsupportedVersion,
            Error::UnknownObjectType { .. } => ErrorKind::UnknownObjectType,
            Error::UnresolvedPath { .. } => ErrorKind::UnresolvedPath,
            Error::Block { source, .. } => source.kind(),
            Error::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn in_block(self, name: &str) -> Self {
        Error::Block {
            name: name.to_string(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
