use super::value::{Ext, Value};
use crate::error::{Error, Result};

/// Serialize a document using the narrowest header for every element.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_value(&mut out, value)?;
    Ok(out)
}

pub fn write_value(out: &mut Vec<u8>, value: &Value) -> Result<()> {
    match value {
        Value::Nil => out.push(0xc0),
        Value::Bool(false) => out.push(0xc2),
        Value::Bool(true) => out.push(0xc3),
        Value::UInt(v) => write_uint(out, *v),
        Value::Int(v) if *v >= 0 => write_uint(out, *v as u64),
        Value::Int(v) => write_negative(out, *v),
        Value::F32(v) => {
            out.push(0xca);
            out.extend_from_slice(&v.to_be_bytes());
        }
        Value::F64(v) => {
            out.push(0xcb);
            out.extend_from_slice(&v.to_be_bytes());
        }
        Value::Str(s) => {
            let len = checked_len(s.len(), "string")?;
            match len {
                0..=31 => out.push(0xa0 | len as u8),
                32..=0xff => out.extend_from_slice(&[0xd9, len as u8]),
                0x100..=0xffff => {
                    out.push(0xda);
                    out.extend_from_slice(&(len as u16).to_be_bytes());
                }
                _ => {
                    out.push(0xdb);
                    out.extend_from_slice(&len.to_be_bytes());
                }
            }
            out.extend_from_slice(s.as_bytes());
        }
        Value::Bin(b) => {
            let len = checked_len(b.len(), "binary")?;
            match len {
                0..=0xff => out.extend_from_slice(&[0xc4, len as u8]),
                0x100..=0xffff => {
                    out.push(0xc5);
                    out.extend_from_slice(&(len as u16).to_be_bytes());
                }
                _ => {
                    out.push(0xc6);
                    out.extend_from_slice(&len.to_be_bytes());
                }
            }
            out.extend_from_slice(b);
        }
        Value::Array(items) => {
            write_container_header(out, checked_len(items.len(), "array")?, 0x90, 0xdc);
            for item in items {
                write_value(out, item)?;
            }
        }
        Value::Map(entries) => {
            write_container_header(out, checked_len(entries.len(), "map")?, 0x80, 0xde);
            for (k, v) in entries {
                write_value(out, k)?;
                write_value(out, v)?;
            }
        }
        Value::Ext(ext) => write_ext(out, ext)?,
    }
    Ok(())
}

fn checked_len(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::MsgPack {
        offset: 0,
        message: format!("{what} of {len} elements is too long to encode"),
    })
}

fn write_uint(out: &mut Vec<u8>, v: u64) {
    match v {
        0..=0x7f => out.push(v as u8),
        0x80..=0xff => out.extend_from_slice(&[0xcc, v as u8]),
        0x100..=0xffff => {
            out.push(0xcd);
            out.extend_from_slice(&(v as u16).to_be_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xce);
            out.extend_from_slice(&(v as u32).to_be_bytes());
        }
        _ => {
            out.push(0xcf);
            out.extend_from_slice(&v.to_be_bytes());
        }
    }
}

fn write_negative(out: &mut Vec<u8>, v: i64) {
    if v >= -32 {
        out.push(v as i8 as u8);
    } else if v >= i8::MIN as i64 {
        out.extend_from_slice(&[0xd0, v as i8 as u8]);
    } else if v >= i16::MIN as i64 {
        out.push(0xd1);
        out.extend_from_slice(&(v as i16).to_be_bytes());
    } else if v >= i32::MIN as i64 {
        out.push(0xd2);
        out.extend_from_slice(&(v as i32).to_be_bytes());
    } else {
        out.push(0xd3);
        out.extend_from_slice(&v.to_be_bytes());
    }
}

fn write_container_header(out: &mut Vec<u8>, len: u32, fix: u8, wide: u8) {
    match len {
        0..=15 => out.push(fix | len as u8),
        16..=0xffff => {
            out.push(wide);
            out.extend_from_slice(&(len as u16).to_be_bytes());
        }
        _ => {
            out.push(wide + 1);
            out.extend_from_slice(&len.to_be_bytes());
        }
    }
}

fn write_ext(out: &mut Vec<u8>, ext: &Ext) -> Result<()> {
    let len = checked_len(ext.data.len(), "extension payload")?;
    match len {
        1 => out.push(0xd4),
        2 => out.push(0xd5),
        4 => out.push(0xd6),
        8 => out.push(0xd7),
        16 => out.push(0xd8),
        0..=0xff => out.extend_from_slice(&[0xc7, len as u8]),
        0x100..=0xffff => {
            out.push(0xc8);
            out.extend_from_slice(&(len as u16).to_be_bytes());
        }
        _ => {
            out.push(0xc9);
            out.extend_from_slice(&len.to_be_bytes());
        }
    }
    out.push(ext.tag as u8);
    out.extend_from_slice(&ext.data);
    Ok(())
}

/// Rewrite the header of a serialized extension value to the 32-bit form
/// (`0xc9`, big-endian `u32` length, tag), whatever width it was written with.
pub fn normalize_ext_header(bytes: &[u8]) -> Result<Vec<u8>> {
    let bad = |message: &str| Error::MsgPack {
        offset: 0,
        message: message.to_string(),
    };
    let (&marker, rest) = bytes
        .split_first()
        .ok_or_else(|| bad("empty extension value"))?;

    let (len, header_rest) = match marker {
        0xd4 => (1, rest),
        0xd5 => (2, rest),
        0xd6 => (4, rest),
        0xd7 => (8, rest),
        0xd8 => (16, rest),
        0xc7 if !rest.is_empty() => (rest[0] as usize, &rest[1..]),
        0xc8 if rest.len() >= 2 => (u16::from_be_bytes([rest[0], rest[1]]) as usize, &rest[2..]),
        0xc9 if rest.len() >= 4 => (
            u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize,
            &rest[4..],
        ),
        _ => return Err(bad("value is not an extension")),
    };

    // tag byte plus payload
    if header_rest.len() != len + 1 {
        return Err(bad("extension length does not match its payload"));
    }

    let mut out = Vec::with_capacity(6 + len);
    out.push(0xc9);
    out.extend_from_slice(&checked_len(len, "extension payload")?.to_be_bytes());
    out.extend_from_slice(header_rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgpack::decode;

    #[test]
    fn picks_minimal_integer_widths() {
        assert_eq!(encode(&Value::UInt(5)).unwrap(), [0x05]);
        assert_eq!(encode(&Value::Int(5)).unwrap(), [0x05]);
        assert_eq!(encode(&Value::Int(-1)).unwrap(), [0xff]);
        assert_eq!(encode(&Value::Int(-33)).unwrap(), [0xd0, 0xdf]);
        assert_eq!(encode(&Value::UInt(300)).unwrap(), [0xcd, 0x01, 0x2c]);
        assert_eq!(
            encode(&Value::Int(-40_000)).unwrap(),
            [0xd2, 0xff, 0xff, 0x63, 0xc0]
        );
    }

    #[test]
    fn keeps_float_width() {
        let bytes = encode(&Value::Array(vec![Value::F32(1.5), Value::F64(1.5)])).unwrap();
        assert_eq!(bytes[1], 0xca);
        assert_eq!(bytes[6], 0xcb);
        assert_eq!(
            decode(&bytes).unwrap(),
            Value::Array(vec![Value::F32(1.5), Value::F64(1.5)])
        );
    }

    #[test]
    fn string_headers_switch_at_boundaries() {
        assert_eq!(encode(&Value::str("a".repeat(31))).unwrap()[0], 0xbf);
        assert_eq!(encode(&Value::str("a".repeat(32))).unwrap()[..2], [0xd9, 32]);
        assert_eq!(encode(&Value::str("a".repeat(256))).unwrap()[..3], [0xda, 1, 0]);
    }

    #[test]
    fn normalizes_every_ext_width() {
        let small = Value::Ext(Ext {
            tag: 99,
            data: vec![1, 2, 3, 4],
        });
        let encoded = encode(&small).unwrap();
        assert_eq!(encoded[0], 0xd6);
        assert_eq!(
            normalize_ext_header(&encoded).unwrap(),
            [0xc9, 0, 0, 0, 4, 99, 1, 2, 3, 4]
        );

        let medium = Value::Ext(Ext {
            tag: 99,
            data: vec![7; 300],
        });
        let encoded = encode(&medium).unwrap();
        assert_eq!(encoded[0], 0xc8);
        let normalized = normalize_ext_header(&encoded).unwrap();
        assert_eq!(normalized[..6], [0xc9, 0, 0, 1, 0x2c, 99]);
        assert_eq!(decode(&normalized).unwrap(), medium);
    }

    #[test]
    fn normalize_rejects_non_ext() {
        assert!(normalize_ext_header(&[0xc0]).is_err());
        assert!(normalize_ext_header(&[0xc7, 5, 99, 1]).is_err());
    }
}
