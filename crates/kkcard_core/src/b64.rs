//! `serialize_with` helpers that render byte fields as base64 strings.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serializer;

pub(crate) fn serialize<T: AsRef<[u8]>, S: Serializer>(
    bytes: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes.as_ref()))
}

pub(crate) fn serialize_option<T: AsRef<[u8]>, S: Serializer>(
    bytes: &Option<T>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match bytes {
        Some(bytes) => serialize(bytes, serializer),
        None => serializer.serialize_none(),
    }
}
