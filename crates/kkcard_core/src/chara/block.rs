use serde::Serialize;

use super::coordinate::Coordinate;
use super::kkex::KkEx;
use crate::error::Result;
use crate::msgpack::{self, Value};
use crate::reader::{ByteReader, Prefix};
use crate::writer::ByteWriter;

/// Body customisation: three independently framed documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Custom {
    pub face: Value,
    pub body: Value,
    pub hair: Value,
}

impl Custom {
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(bytes);
        let mut next = || -> Result<Value> { msgpack::decode(r.read_len_prefixed(Prefix::I32)?) };
        Ok(Self {
            face: next()?,
            body: next()?,
            hair: next()?,
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut w = ByteWriter::new();
        for part in [&self.face, &self.body, &self.hair] {
            w.write_len_prefixed(Prefix::I32, &msgpack::encode(part)?)?;
        }
        Ok(w.into_bytes())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data")]
pub enum BlockData {
    Custom(Custom),
    Coordinate(Coordinate),
    Parameter(Value),
    Status(Value),
    About(Value),
    KKEx(KkEx),
    Unknown(#[serde(serialize_with = "crate::b64::serialize")] Vec<u8>),
}

impl BlockData {
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            BlockData::Custom(custom) => custom.encode(),
            BlockData::Coordinate(coordinate) => coordinate.encode(),
            BlockData::Parameter(v) | BlockData::Status(v) | BlockData::About(v) => {
                msgpack::encode(v)
            }
            BlockData::KKEx(ext) => ext.encode(),
            BlockData::Unknown(bytes) => Ok(bytes.clone()),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            BlockData::Custom(_) => "custom",
            BlockData::Coordinate(_) => "coordinate",
            BlockData::Parameter(_) => "parameter",
            BlockData::Status(_) => "status",
            BlockData::About(_) => "about",
            BlockData::KKEx(_) => "kkex",
            BlockData::Unknown(_) => "unknown",
        }
    }

    pub fn as_document(&self) -> Option<&Value> {
        match self {
            BlockData::Parameter(v) | BlockData::Status(v) | BlockData::About(v) => Some(v),
            BlockData::KKEx(ext) => Some(&ext.root),
            _ => None,
        }
    }
}

/// A named, versioned block of a character file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub name: String,
    pub version: String,
    pub data: BlockData,
}
