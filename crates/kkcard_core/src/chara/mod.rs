//! Character cards: a PNG thumbnail followed by a block-indexed payload.

pub mod block;
pub mod coordinate;
pub mod kkex;
pub mod registry;

use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::layout::{BlockLayout, BlockRange, ByteRange};
use crate::msgpack::{self, Value};
use crate::png;
use crate::reader::{ByteReader, Prefix};
use crate::writer::ByteWriter;

pub use block::{Block, BlockData, Custom};
pub use coordinate::{Coordinate, CoordinateSchema, Outfit};
pub use kkex::{KkEx, NestedPath, NestedPaths, NestedSlot};

const INDEX_KEY: &str = "lstInfo";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharaDocument {
    #[serde(serialize_with = "crate::b64::serialize_option")]
    pub png: Option<Vec<u8>>,
    pub product_no: i32,
    pub header: String,
    pub version: String,
    #[serde(serialize_with = "crate::b64::serialize")]
    pub face_png: Vec<u8>,
    /// Blocks in index-table order.
    pub blocks: Vec<Block>,
    /// Indices into `blocks`, in payload-area order.
    pub storage_order: Vec<usize>,
}

struct IndexEntry {
    name: String,
    version: String,
    pos: usize,
    size: usize,
}

fn entry_field<'v>(entry: &'v Value, key: &str, index: usize) -> Result<&'v Value> {
    entry.get(key).ok_or_else(|| {
        Error::format(0, format!("index entry {index} is missing {key:?}"))
    })
}

fn entry_offset(entry: &Value, key: &str, index: usize) -> Result<usize> {
    let value = entry_field(entry, key, index)?;
    value
        .as_i64()
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| {
            Error::format(0, format!("index entry {index} has invalid {key}: {value:?}"))
        })
}

fn entry_string(entry: &Value, key: &str, index: usize) -> Result<String> {
    let value = entry_field(entry, key, index)?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::format(0, format!("index entry {index} has non-string {key}")))
}

fn parse_index(table: &Value, offset: usize) -> Result<Vec<IndexEntry>> {
    let entries = table
        .get(INDEX_KEY)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::format(offset, "block index has no lstInfo list"))?;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            Ok(IndexEntry {
                name: entry_string(entry, "name", index)?,
                version: entry_string(entry, "version", index)?,
                pos: entry_offset(entry, "pos", index)?,
                size: entry_offset(entry, "size", index)?,
            })
        })
        .collect::<Result<Vec<_>>>()
        .map_err(|e| match e {
            Error::Format { message, .. } => Error::format(offset, message),
            other => other,
        })
}

fn build_index(blocks: &[Block], ranges: &[ByteRange]) -> Value {
    let entries = blocks
        .iter()
        .zip(ranges)
        .map(|(block, range)| {
            Value::map([
                ("name", Value::str(block.name.as_str())),
                ("version", Value::str(block.version.as_str())),
                ("pos", Value::UInt(range.start as u64)),
                ("size", Value::UInt(range.len() as u64)),
            ])
        })
        .collect();
    Value::map([(INDEX_KEY, Value::Array(entries))])
}

impl CharaDocument {
    /// Parse a complete character file.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(bytes);
        let doc = Self::decode(&mut r)?;
        if !r.is_at_end() {
            return Err(Error::format(
                r.position(),
                format!("{} trailing bytes after character payload", r.remaining()),
            ));
        }
        Ok(doc)
    }

    pub fn load_path(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::load(&bytes)
    }

    /// Decode one character from the cursor, leaving it just past the payload
    /// area so that embedded characters can be read from larger streams.
    pub fn decode(r: &mut ByteReader<'_>) -> Result<Self> {
        Self::decode_with(r, NestedPaths::standard())
    }

    pub fn decode_with(r: &mut ByteReader<'_>, paths: NestedPaths) -> Result<Self> {
        let png = png::read_optional_png(r)?;
        let product_no = r.read_i32()?;
        let header = r.read_prefixed_string(Prefix::U8)?;
        let version = r.read_prefixed_string(Prefix::U8)?;
        let face_png = r.read_len_prefixed(Prefix::I32)?.to_vec();

        let index_offset = r.position();
        let index = msgpack::decode(r.read_len_prefixed(Prefix::I32)?)?;
        let entries = parse_index(&index, index_offset)?;

        let area_offset = r.position() + 8;
        let area = r.read_len_prefixed(Prefix::I64)?;

        let layout = BlockLayout {
            area_offset,
            area_len: area.len(),
            blocks: entries
                .iter()
                .map(|entry| BlockRange {
                    name: entry.name.clone(),
                    range: ByteRange {
                        start: entry.pos,
                        end: entry.pos.saturating_add(entry.size),
                    },
                })
                .collect(),
        };
        layout.validate()?;

        let blocks = entries
            .into_iter()
            .zip(&layout.blocks)
            .map(|(entry, placed)| {
                let body = &area[placed.range.start..placed.range.end];
                let data = registry::decode_block(&entry.name, &entry.version, body, paths)?;
                Ok(Block {
                    name: entry.name,
                    version: entry.version,
                    data,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            png,
            product_no,
            header,
            version,
            face_png,
            blocks,
            storage_order: layout.storage_order(),
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut w = ByteWriter::new();
        self.encode(&mut w)?;
        Ok(w.into_bytes())
    }

    pub fn encode(&self, w: &mut ByteWriter) -> Result<()> {
        let order = self.effective_storage_order();

        let mut area = Vec::new();
        let mut ranges = vec![ByteRange { start: 0, end: 0 }; self.blocks.len()];
        for index in order {
            let block = &self.blocks[index];
            registry::check_encodable(&block.name, &block.version, &block.data)?;
            let body = block.data.encode().map_err(|e| e.in_block(&block.name))?;
            let start = area.len();
            area.extend_from_slice(&body);
            ranges[index] = ByteRange {
                start,
                end: area.len(),
            };
        }

        if let Some(png) = &self.png {
            w.write_bytes(png);
        }
        w.write_i32(self.product_no);
        w.write_prefixed_string(Prefix::U8, &self.header)?;
        w.write_prefixed_string(Prefix::U8, &self.version)?;
        w.write_len_prefixed(Prefix::I32, &self.face_png)?;
        let index = msgpack::encode(&build_index(&self.blocks, &ranges))?;
        w.write_len_prefixed(Prefix::I32, &index)?;
        w.write_len_prefixed(Prefix::I64, &area)?;
        Ok(())
    }

    /// `storage_order` when it is a permutation of the blocks, otherwise
    /// declaration order followed by anything it left out.
    fn effective_storage_order(&self) -> Vec<usize> {
        let mut seen = vec![false; self.blocks.len()];
        let mut order = Vec::with_capacity(self.blocks.len());
        for &index in &self.storage_order {
            if index < seen.len() && !seen[index] {
                seen[index] = true;
                order.push(index);
            }
        }
        order.extend((0..self.blocks.len()).filter(|&index| !seen[index]));
        order
    }

    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.name == name)
    }

    pub fn block_mut(&mut self, name: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|block| block.name == name)
    }

    pub fn block_names(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|block| block.name.as_str())
    }

    pub fn parameter(&self) -> Option<&Value> {
        match &self.block("Parameter")?.data {
            BlockData::Parameter(v) => Some(v),
            _ => None,
        }
    }

    pub fn kkex(&self) -> Option<&KkEx> {
        match &self.block("KKEx")?.data {
            BlockData::KKEx(ext) => Some(ext),
            _ => None,
        }
    }

    pub fn kkex_mut(&mut self) -> Option<&mut KkEx> {
        match &mut self.block_mut("KKEx")?.data {
            BlockData::KKEx(ext) => Some(ext),
            _ => None,
        }
    }

    /// `lastname firstname` from the `Parameter` block, when both are present.
    pub fn full_name(&self) -> Option<String> {
        let parameter = self.parameter()?;
        let last = parameter.get("lastname")?.as_str()?;
        let first = parameter.get("firstname")?.as_str()?;
        Some(format!("{last} {first}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sample() -> CharaDocument {
        CharaDocument {
            png: Some(png::placeholder_png()),
            product_no: 100,
            header: "【KoiKatuChara】".to_string(),
            version: "0.0.0".to_string(),
            face_png: png::placeholder_png(),
            blocks: vec![
                Block {
                    name: "Parameter".to_string(),
                    version: "0.0.5".to_string(),
                    data: BlockData::Parameter(Value::map([
                        ("lastname", Value::str("Koi")),
                        ("firstname", Value::str("Kana")),
                    ])),
                },
                Block {
                    name: "Mystery".to_string(),
                    version: "1.2.3".to_string(),
                    data: BlockData::Unknown(vec![0xde, 0xad]),
                },
            ],
            storage_order: vec![1, 0],
        }
    }

    #[test]
    fn round_trip_keeps_both_orders() {
        let bytes = sample().to_bytes().unwrap();
        let doc = CharaDocument::load(&bytes).unwrap();

        assert_eq!(doc.block_names().collect::<Vec<_>>(), ["Parameter", "Mystery"]);
        assert_eq!(doc.storage_order, [1, 0]);
        assert_eq!(doc.full_name().as_deref(), Some("Koi Kana"));
        assert_eq!(doc.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn png_is_optional_when_embedded() {
        let mut doc = sample();
        doc.png = None;
        let bytes = doc.to_bytes().unwrap();
        assert_eq!(bytes[..4], 100i32.to_le_bytes());

        let mut r = ByteReader::new(&bytes);
        let decoded = CharaDocument::decode(&mut r).unwrap();
        assert!(decoded.png.is_none());
        assert!(r.is_at_end());
    }

    #[test]
    fn truncated_area_fails() {
        let bytes = sample().to_bytes().unwrap();
        let err = CharaDocument::load(&bytes[..bytes.len() - 1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Truncated);
    }

    #[test]
    fn repairs_inconsistent_storage_order() {
        let mut doc = sample();
        doc.storage_order = vec![1, 1, 7];
        assert_eq!(doc.effective_storage_order(), [1, 0]);
    }
}
