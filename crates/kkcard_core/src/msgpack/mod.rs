//! MessagePack, the self-describing document format embedded in character
//! blocks, index tables and extension data.

mod decode;
mod encode;
mod value;

pub use decode::{Decoder, decode};
pub use encode::{encode, normalize_ext_header, write_value};
pub use value::{Ext, Value};
