use serde::Serialize;

use crate::error::{Error, Result};
use crate::msgpack::{self, Value};
use crate::reader::{ByteReader, Prefix};
use crate::writer::ByteWriter;

/// One outfit of a multi-outfit coordinate block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outfit {
    pub clothes: Value,
    pub accessory: Value,
    pub enable_makeup: bool,
    pub makeup: Value,
}

/// Schema of the `Coordinate` block, chosen by its declared version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSchema {
    /// `0.0.0`: MessagePack array of binary outfit records.
    Outfits,
    /// `0.0.1`: a single clothes/accessory pair.
    Single,
}

impl CoordinateSchema {
    pub fn for_version(version: &str) -> Option<Self> {
        match version {
            "0.0.0" => Some(Self::Outfits),
            "0.0.1" => Some(Self::Single),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Coordinate {
    Outfits { outfits: Vec<Outfit> },
    Single { clothes: Value, accessory: Value },
}

fn read_document(r: &mut ByteReader<'_>) -> Result<Value> {
    msgpack::decode(r.read_len_prefixed(Prefix::I32)?)
}

fn write_document(w: &mut ByteWriter, value: &Value) -> Result<()> {
    w.write_len_prefixed(Prefix::I32, &msgpack::encode(value)?)
}

fn expect_end(r: &ByteReader<'_>, what: &str) -> Result<()> {
    if r.is_at_end() {
        Ok(())
    } else {
        Err(Error::format(
            r.position(),
            format!("{} unexpected trailing bytes in {what}", r.remaining()),
        ))
    }
}

impl Coordinate {
    pub fn decode(bytes: &[u8], schema: CoordinateSchema) -> Result<Self> {
        match schema {
            CoordinateSchema::Outfits => {
                let Value::Array(records) = msgpack::decode(bytes)? else {
                    return Err(Error::format(0, "coordinate list is not an array"));
                };
                let outfits = records
                    .iter()
                    .enumerate()
                    .map(|(index, record)| {
                        let raw = record.as_bin().ok_or_else(|| {
                            Error::format(0, format!("outfit {index} is not a binary record"))
                        })?;
                        Outfit::decode(raw)
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::Outfits { outfits })
            }
            CoordinateSchema::Single => {
                let mut r = ByteReader::new(bytes);
                let clothes = read_document(&mut r)?;
                let accessory = read_document(&mut r)?;
                expect_end(&r, "coordinate")?;
                Ok(Self::Single { clothes, accessory })
            }
        }
    }

    pub fn schema(&self) -> CoordinateSchema {
        match self {
            Self::Outfits { .. } => CoordinateSchema::Outfits,
            Self::Single { .. } => CoordinateSchema::Single,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            Self::Outfits { outfits } => {
                let records = outfits
                    .iter()
                    .map(|outfit| outfit.encode().map(Value::Bin))
                    .collect::<Result<Vec<_>>>()?;
                msgpack::encode(&Value::Array(records))
            }
            Self::Single { clothes, accessory } => {
                let mut w = ByteWriter::new();
                write_document(&mut w, clothes)?;
                write_document(&mut w, accessory)?;
                Ok(w.into_bytes())
            }
        }
    }
}

impl Outfit {
    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(bytes);
        let outfit = Self {
            clothes: read_document(&mut r)?,
            accessory: read_document(&mut r)?,
            enable_makeup: r.read_bool()?,
            makeup: read_document(&mut r)?,
        };
        expect_end(&r, "outfit record")?;
        Ok(outfit)
    }

    fn encode(&self) -> Result<Vec<u8>> {
        let mut w = ByteWriter::new();
        write_document(&mut w, &self.clothes)?;
        write_document(&mut w, &self.accessory)?;
        w.write_bool(self.enable_makeup);
        write_document(&mut w, &self.makeup)?;
        Ok(w.into_bytes())
    }
}
