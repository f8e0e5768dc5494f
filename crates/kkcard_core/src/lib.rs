pub mod chara;
pub mod core_api;
pub mod error;
pub mod layout;
pub mod msgpack;
pub mod png;
pub mod reader;
pub mod save;
pub mod scene;
pub mod version;
pub mod writer;

mod b64;

pub use chara::CharaDocument;
pub use error::{Error, ErrorKind, Result};
pub use save::SaveDocument;
pub use scene::SceneDocument;
pub use version::Version;
