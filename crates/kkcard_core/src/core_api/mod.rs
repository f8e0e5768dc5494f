mod engine;
mod error;
mod types;

pub use engine::{Engine, LoadedDocument, Session};
pub use error::{CoreError, CoreErrorCode};
pub use types::{BlockEntry, FileKind, ObjectCount, Snapshot};
