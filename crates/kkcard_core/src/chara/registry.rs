//! Dispatch table from block name to its codec.

use super::block::{BlockData, Custom};
use super::coordinate::{Coordinate, CoordinateSchema};
use super::kkex::{KkEx, NestedPaths};
use crate::error::{Error, Result};
use crate::msgpack;

pub struct BlockCodec {
    pub name: &'static str,
    pub supports_version: fn(&str) -> bool,
    pub decode: fn(&[u8], &str, NestedPaths) -> Result<BlockData>,
}

fn any_version(_: &str) -> bool {
    true
}

fn coordinate_version(version: &str) -> bool {
    CoordinateSchema::for_version(version).is_some()
}

fn decode_custom(bytes: &[u8], _: &str, _: NestedPaths) -> Result<BlockData> {
    Custom::decode(bytes).map(BlockData::Custom)
}

fn decode_coordinate(bytes: &[u8], version: &str, _: NestedPaths) -> Result<BlockData> {
    let schema = CoordinateSchema::for_version(version)
        .ok_or_else(|| unsupported("Coordinate", version))?;
    Coordinate::decode(bytes, schema).map(BlockData::Coordinate)
}

fn decode_parameter(bytes: &[u8], _: &str, _: NestedPaths) -> Result<BlockData> {
    msgpack::decode(bytes).map(BlockData::Parameter)
}

fn decode_status(bytes: &[u8], _: &str, _: NestedPaths) -> Result<BlockData> {
    msgpack::decode(bytes).map(BlockData::Status)
}

fn decode_about(bytes: &[u8], _: &str, _: NestedPaths) -> Result<BlockData> {
    msgpack::decode(bytes).map(BlockData::About)
}

fn decode_kkex(bytes: &[u8], _: &str, paths: NestedPaths) -> Result<BlockData> {
    KkEx::decode(bytes, paths).map(BlockData::KKEx)
}

static REGISTRY: [BlockCodec; 6] = [
    BlockCodec {
        name: "Custom",
        supports_version: any_version,
        decode: decode_custom,
    },
    BlockCodec {
        name: "Coordinate",
        supports_version: coordinate_version,
        decode: decode_coordinate,
    },
    BlockCodec {
        name: "Parameter",
        supports_version: any_version,
        decode: decode_parameter,
    },
    BlockCodec {
        name: "Status",
        supports_version: any_version,
        decode: decode_status,
    },
    BlockCodec {
        name: "About",
        supports_version: any_version,
        decode: decode_about,
    },
    BlockCodec {
        name: "KKEx",
        supports_version: any_version,
        decode: decode_kkex,
    },
];

fn unsupported(name: &str, version: &str) -> Error {
    Error::UnsupportedVersion {
        context: format!("block {name}"),
        version: version.to_string(),
    }
}

pub fn lookup(name: &str) -> Option<&'static BlockCodec> {
    REGISTRY.iter().find(|codec| codec.name == name)
}

pub fn registered_names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|codec| codec.name)
}

/// Decode a block body. Names missing from the table become opaque bytes.
pub fn decode_block(
    name: &str,
    version: &str,
    bytes: &[u8],
    paths: NestedPaths,
) -> Result<BlockData> {
    let Some(codec) = lookup(name) else {
        return Ok(BlockData::Unknown(bytes.to_vec()));
    };
    if !(codec.supports_version)(version) {
        return Err(unsupported(name, version));
    }
    (codec.decode)(bytes, version, paths).map_err(|e| e.in_block(name))
}

/// Check that a block written under its declared version can be read back.
pub fn check_encodable(name: &str, version: &str, data: &BlockData) -> Result<()> {
    let Some(codec) = lookup(name) else {
        return Ok(());
    };
    if !(codec.supports_version)(version) {
        return Err(unsupported(name, version));
    }
    if let BlockData::Coordinate(coordinate) = data {
        if CoordinateSchema::for_version(version) != Some(coordinate.schema()) {
            return Err(Error::UnsupportedVersion {
                context: format!("block {name} holding {:?} data", coordinate.schema()),
                version: version.to_string(),
            });
        }
    }
    Ok(())
}
