//! Extended plugin data (`KKEx` block).
//!
//! The block is a MessagePack map of plugin id to `[version, {field: value}]`.
//! Some fields hold a second MessagePack document serialized into a `Bin`;
//! a subset of those are additionally LZ4-compressed inside extension 99.
//! The fields to expand are listed by a [`NestedPaths`] table.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::msgpack::{self, Decoder, Ext, Value};

pub const COMPRESSED_EXT_TAG: i8 = 99;
pub const COMPRESSION_THRESHOLD: usize = 64;
/// Upper bound of the LZ4 block format's expansion per input byte.
const MAX_INFLATE_RATIO: usize = 255;

/// Address of a nested document: `root[plugin][index][field]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NestedPath {
    pub plugin: &'static str,
    pub index: usize,
    pub field: &'static str,
}

impl NestedPath {
    pub const fn new(plugin: &'static str, field: &'static str) -> Self {
        Self {
            plugin,
            index: 1,
            field,
        }
    }
}

impl fmt::Display for NestedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}].{}", self.plugin, self.index, self.field)
    }
}

/// Read-only tables of nested paths handed to the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedPaths {
    pub nested: &'static [NestedPath],
    pub compressed: &'static [NestedPath],
}

static STANDARD_NESTED: [NestedPath; 16] = [
    NestedPath::new("Accessory_States", "accessoryData"),
    NestedPath::new("Accessory_States", "ACC_Binding_Dictionary"),
    NestedPath::new("Accessory_States", "ACC_State_array"),
    NestedPath::new("Accessory_States", "ACC_Name_Dictionary"),
    NestedPath::new("Accessory_States", "ACC_Parented_Dictionary"),
    NestedPath::new("Additional_Card_Info", "CardInfo"),
    NestedPath::new("Additional_Card_Info", "CoordinateInfo"),
    NestedPath::new("KCOX", "Overlays"),
    NestedPath::new("KKABMPlugin.ABMData", "boneData"),
    NestedPath::new("com.deathweasel.bepinex.materialeditor", "MaterialShaderList"),
    NestedPath::new("com.deathweasel.bepinex.materialeditor", "RendererPropertyList"),
    NestedPath::new("com.deathweasel.bepinex.materialeditor", "MaterialFloatPropertyList"),
    NestedPath::new("com.deathweasel.bepinex.materialeditor", "MaterialColorPropertyList"),
    NestedPath::new("com.deathweasel.bepinex.materialeditor", "MaterialTexturePropertyList"),
    NestedPath::new("madevil.kk.ass", "TriggerPropertyList"),
    NestedPath::new("madevil.kk.ass", "TriggerGroupList"),
];

static STANDARD_COMPRESSED: [NestedPath; 3] = [
    NestedPath::new("com.deathweasel.bepinex.materialeditor", "MaterialTexturePropertyList"),
    NestedPath::new("madevil.kk.ass", "TriggerPropertyList"),
    NestedPath::new("madevil.kk.ass", "TriggerGroupList"),
];

impl NestedPaths {
    pub fn standard() -> Self {
        Self {
            nested: &STANDARD_NESTED,
            compressed: &STANDARD_COMPRESSED,
        }
    }

    pub fn is_compressed(&self, path: &NestedPath) -> bool {
        self.compressed.contains(path)
    }

    fn all(&self) -> impl Iterator<Item = &'static NestedPath> {
        let nested = self.nested;
        let compressed = self.compressed;
        nested
            .iter()
            .chain(compressed.iter().filter(move |p| !nested.contains(p)))
    }
}

impl Default for NestedPaths {
    fn default() -> Self {
        Self::standard()
    }
}

/// A nested document expanded during decode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NestedSlot {
    pub path: NestedPath,
    pub compressed_path: bool,
    /// Bytes exactly as they sat in the `Bin`, re-emitted while the decoded
    /// value is unchanged.
    #[serde(skip)]
    pub original: Option<Vec<u8>>,
    #[serde(skip)]
    pub decoded: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KkEx {
    pub root: Value,
    pub slots: Vec<NestedSlot>,
    #[serde(skip)]
    paths: NestedPaths,
}

enum Resolved<T> {
    Found(T),
    Absent,
    Blocked,
}

fn resolve<'v>(root: &'v Value, path: &NestedPath) -> Resolved<&'v Value> {
    let Some(entries) = root.as_map() else {
        return Resolved::Blocked;
    };
    let plugin = match entries.iter().find(|(k, _)| k.as_str() == Some(path.plugin)) {
        None => return Resolved::Absent,
        Some((_, Value::Nil)) => return Resolved::Absent,
        Some((_, v)) => v,
    };
    let Value::Array(items) = plugin else {
        return Resolved::Blocked;
    };
    let data = match items.get(path.index) {
        None | Some(Value::Nil) => return Resolved::Absent,
        Some(v) => v,
    };
    if !matches!(data, Value::Map(_)) {
        return Resolved::Blocked;
    }
    match data.get(path.field) {
        None => Resolved::Absent,
        Some(v) => Resolved::Found(v),
    }
}

fn resolve_mut<'v>(root: &'v mut Value, path: &NestedPath) -> Resolved<&'v mut Value> {
    match resolve(root, path) {
        Resolved::Found(_) => {}
        Resolved::Absent => return Resolved::Absent,
        Resolved::Blocked => return Resolved::Blocked,
    }
    let found = root
        .get_mut(path.plugin)
        .and_then(|plugin| match plugin {
            Value::Array(items) => items.get_mut(path.index),
            _ => None,
        })
        .and_then(|data| data.get_mut(path.field));
    match found {
        Some(v) => Resolved::Found(v),
        None => Resolved::Absent,
    }
}

fn decode_nested(raw: &[u8], compressed_path: bool) -> Result<Value> {
    let value = msgpack::decode(raw)?;
    match value {
        Value::Ext(Ext { tag, data }) if compressed_path && tag == COMPRESSED_EXT_TAG => {
            let mut payload = Decoder::new(&data);
            let size = payload.read_value()?;
            let declared = match size {
                Value::Int(v) => i128::from(v),
                Value::UInt(v) => i128::from(v),
                other => {
                    return Err(Error::MsgPack {
                        offset: 0,
                        message: format!("compressed size header is not an integer: {other:?}"),
                    });
                }
            };
            let size = i32::try_from(declared)
                .ok()
                .and_then(|s| usize::try_from(s).ok())
                .ok_or_else(|| {
                    Error::Compression(format!("declared size {declared} is not an i32 length"))
                })?;
            let limit = payload
                .rest()
                .len()
                .saturating_mul(MAX_INFLATE_RATIO)
                .saturating_add(16);
            if size > limit {
                return Err(Error::Compression(format!(
                    "declared size {size} is out of reach of {} compressed bytes",
                    payload.rest().len()
                )));
            }
            let inflated = lz4_flex::block::decompress(payload.rest(), size)
                .map_err(|e| Error::Compression(e.to_string()))?;
            msgpack::decode(&inflated)
        }
        other => Ok(other),
    }
}

fn encode_nested(value: &Value, compressed_path: bool) -> Result<Vec<u8>> {
    let serialized = msgpack::encode(value)?;
    if !compressed_path || serialized.len() <= COMPRESSION_THRESHOLD {
        return Ok(serialized);
    }

    let size = i32::try_from(serialized.len())
        .map_err(|_| Error::Compression(format!("{} bytes exceed i32", serialized.len())))?;
    let mut payload = vec![0xd2];
    payload.extend_from_slice(&size.to_be_bytes());
    payload.extend_from_slice(&lz4_flex::block::compress(&serialized));

    let wrapped = msgpack::encode(&Value::Ext(Ext {
        tag: COMPRESSED_EXT_TAG,
        data: payload,
    }))?;
    msgpack::normalize_ext_header(&wrapped)
}

/// Stored bytes of an unchanged slot. A lone extension value still gets
/// the 32-bit header.
fn reuse_original(original: &[u8]) -> Result<Vec<u8>> {
    match original.first() {
        Some(0xc7..=0xc9 | 0xd4..=0xd8) => msgpack::normalize_ext_header(original),
        _ => Ok(original.to_vec()),
    }
}

impl KkEx {
    pub fn decode(bytes: &[u8], paths: NestedPaths) -> Result<Self> {
        let mut root = msgpack::decode(bytes)?;
        let mut slots = Vec::new();

        for path in paths.all() {
            let Resolved::Found(slot) = resolve_mut(&mut root, path) else {
                continue;
            };
            let Value::Bin(raw) = &*slot else {
                continue;
            };
            let compressed_path = paths.is_compressed(path);
            let decoded = decode_nested(raw, compressed_path)
                .map_err(|e| e.in_block(&format!("KKEx {path}")))?;
            let original = raw.clone();
            *slot = decoded.clone();
            slots.push(NestedSlot {
                path: *path,
                compressed_path,
                original: Some(original),
                decoded,
            });
        }

        Ok(Self { root, slots, paths })
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut root = self.root.clone();
        for slot in &self.slots {
            let target = match resolve_mut(&mut root, &slot.path) {
                Resolved::Found(v) => v,
                Resolved::Absent => continue,
                Resolved::Blocked => {
                    return Err(Error::UnresolvedPath {
                        path: slot.path.to_string(),
                    });
                }
            };
            let bytes = match &slot.original {
                Some(original) if *target == slot.decoded => reuse_original(original)?,
                None if target.is_nil() => continue,
                _ => encode_nested(target, slot.compressed_path)?,
            };
            *target = Value::Bin(bytes);
        }
        msgpack::encode(&root)
    }

    pub fn plugin(&self, id: &str) -> Option<&Value> {
        self.root.get(id)
    }

    pub fn nested(&self, path: &NestedPath) -> Option<&Value> {
        match resolve(&self.root, path) {
            Resolved::Found(v) => Some(v),
            _ => None,
        }
    }

    /// Replace the document at `path`. The plugin entry must already exist.
    pub fn set_nested(&mut self, path: &NestedPath, value: Value) -> Result<()> {
        let unresolved = || Error::UnresolvedPath {
            path: path.to_string(),
        };
        let Some(known) = self.paths.all().find(|p| *p == path) else {
            return Err(unresolved());
        };

        let data = self
            .root
            .get_mut(path.plugin)
            .and_then(|plugin| match plugin {
                Value::Array(items) => items.get_mut(path.index),
                _ => None,
            })
            .filter(|data| matches!(data, Value::Map(_)))
            .ok_or_else(unresolved)?;
        data.insert(path.field, value);

        if !self.slots.iter().any(|slot| slot.path == *known) {
            self.slots.push(NestedSlot {
                path: *known,
                compressed_path: self.paths.is_compressed(known),
                original: None,
                decoded: Value::Nil,
            });
        }
        Ok(())
    }
}
