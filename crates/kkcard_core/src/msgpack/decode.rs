use super::value::{Ext, Value};
use crate::error::{Error, Result};

const MAX_DEPTH: usize = 512;

/// Streaming MessagePack reader over a byte slice.
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn read_value(&mut self) -> Result<Value> {
        self.read_at_depth(0)
    }

    fn err(&self, offset: usize, message: impl Into<String>) -> Error {
        Error::MsgPack {
            offset,
            message: message.into(),
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.data.len() - self.pos < n {
            return Err(Error::Truncated {
                offset: self.pos,
                need: n,
                have: self.data.len() - self.pos,
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    fn read_u16(&mut self) -> Result<usize> {
        Ok(u16::from_be_bytes(self.take_array()?) as usize)
    }

    fn read_u32(&mut self) -> Result<usize> {
        Ok(u32::from_be_bytes(self.take_array()?) as usize)
    }

    fn read_str(&mut self, len: usize) -> Result<Value> {
        let offset = self.pos;
        let bytes = self.take(len)?;
        let s = std::str::from_utf8(bytes)
            .map_err(|e| self.err(offset, format!("string is not valid UTF-8: {e}")))?;
        Ok(Value::Str(s.to_string()))
    }

    fn read_ext(&mut self, len: usize) -> Result<Value> {
        let tag = self.read_u8()? as i8;
        let data = self.take(len)?.to_vec();
        Ok(Value::Ext(Ext { tag, data }))
    }

    fn read_array(&mut self, len: usize, depth: usize) -> Result<Value> {
        let mut items = Vec::with_capacity(len.min(self.data.len() - self.pos));
        for _ in 0..len {
            items.push(self.read_at_depth(depth + 1)?);
        }
        Ok(Value::Array(items))
    }

    fn read_map(&mut self, len: usize, depth: usize) -> Result<Value> {
        let mut entries = Vec::with_capacity(len.min(self.data.len() - self.pos));
        for _ in 0..len {
            let key = self.read_at_depth(depth + 1)?;
            let value = self.read_at_depth(depth + 1)?;
            entries.push((key, value));
        }
        Ok(Value::Map(entries))
    }

    fn read_at_depth(&mut self, depth: usize) -> Result<Value> {
        let offset = self.pos;
        if depth > MAX_DEPTH {
            return Err(self.err(offset, "document nests too deeply"));
        }

        let marker = self.read_u8()?;
        let value = match marker {
            0x00..=0x7f => Value::UInt(marker as u64),
            0x80..=0x8f => self.read_map((marker & 0x0f) as usize, depth)?,
            0x90..=0x9f => self.read_array((marker & 0x0f) as usize, depth)?,
            0xa0..=0xbf => self.read_str((marker & 0x1f) as usize)?,
            0xc0 => Value::Nil,
            0xc2 => Value::Bool(false),
            0xc3 => Value::Bool(true),
            0xc4 => {
                let len = self.read_u8()? as usize;
                Value::Bin(self.take(len)?.to_vec())
            }
            0xc5 => {
                let len = self.read_u16()?;
                Value::Bin(self.take(len)?.to_vec())
            }
            0xc6 => {
                let len = self.read_u32()?;
                Value::Bin(self.take(len)?.to_vec())
            }
            0xc7 => {
                let len = self.read_u8()? as usize;
                self.read_ext(len)?
            }
            0xc8 => {
                let len = self.read_u16()?;
                self.read_ext(len)?
            }
            0xc9 => {
                let len = self.read_u32()?;
                self.read_ext(len)?
            }
            0xca => Value::F32(f32::from_be_bytes(self.take_array()?)),
            0xcb => Value::F64(f64::from_be_bytes(self.take_array()?)),
            0xcc => Value::UInt(self.read_u8()? as u64),
            0xcd => Value::UInt(u16::from_be_bytes(self.take_array()?) as u64),
            0xce => Value::UInt(u32::from_be_bytes(self.take_array()?) as u64),
            0xcf => Value::UInt(u64::from_be_bytes(self.take_array()?)),
            0xd0 => Value::Int(self.read_u8()? as i8 as i64),
            0xd1 => Value::Int(i16::from_be_bytes(self.take_array()?) as i64),
            0xd2 => Value::Int(i32::from_be_bytes(self.take_array()?) as i64),
            0xd3 => Value::Int(i64::from_be_bytes(self.take_array()?)),
            0xd4 => self.read_ext(1)?,
            0xd5 => self.read_ext(2)?,
            0xd6 => self.read_ext(4)?,
            0xd7 => self.read_ext(8)?,
            0xd8 => self.read_ext(16)?,
            0xd9 => {
                let len = self.read_u8()? as usize;
                self.read_str(len)?
            }
            0xda => {
                let len = self.read_u16()?;
                self.read_str(len)?
            }
            0xdb => {
                let len = self.read_u32()?;
                self.read_str(len)?
            }
            0xdc => {
                let len = self.read_u16()?;
                self.read_array(len, depth)?
            }
            0xdd => {
                let len = self.read_u32()?;
                self.read_array(len, depth)?
            }
            0xde => {
                let len = self.read_u16()?;
                self.read_map(len, depth)?
            }
            0xdf => {
                let len = self.read_u32()?;
                self.read_map(len, depth)?
            }
            0xe0..=0xff => Value::Int(marker as i8 as i64),
            0xc1 => return Err(self.err(offset, "reserved marker 0xc1")),
        };
        Ok(value)
    }
}

/// Decode one document that must span all of `bytes`.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    let mut decoder = Decoder::new(bytes);
    let value = decoder.read_value()?;
    if decoder.position() != bytes.len() {
        return Err(Error::MsgPack {
            offset: decoder.position(),
            message: format!(
                "{} trailing bytes after document",
                bytes.len() - decoder.position()
            ),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn decodes_index_table_shape() {
        // {"lstInfo": [{"pos": 0}]}
        let mut bytes = vec![0x81, 0xa7];
        bytes.extend_from_slice(b"lstInfo");
        bytes.extend_from_slice(&[0x91, 0x81, 0xa3]);
        bytes.extend_from_slice(b"pos");
        bytes.push(0x00);

        let doc = decode(&bytes).unwrap();
        let info = doc.get("lstInfo").and_then(Value::as_array).unwrap();
        assert_eq!(info[0].get("pos").and_then(Value::as_i64), Some(0));
    }

    #[test]
    fn signed_and_unsigned_stay_distinct() {
        assert_eq!(decode(&[0xd0, 0x05]).unwrap(), Value::Int(5));
        assert_eq!(decode(&[0xcc, 0x05]).unwrap(), Value::UInt(5));
        assert_eq!(decode(&[0xff]).unwrap(), Value::Int(-1));
    }

    #[test]
    fn reports_trailing_and_truncated_input() {
        assert_eq!(decode(&[0xc0, 0xc0]).unwrap_err().kind(), ErrorKind::Format);
        assert_eq!(
            decode(&[0xa5, b'a']).unwrap_err().kind(),
            ErrorKind::Truncated
        );
    }

    #[test]
    fn rejects_runaway_nesting() {
        let bytes = vec![0x91; MAX_DEPTH + 4];
        assert_eq!(decode(&bytes).unwrap_err().kind(), ErrorKind::Format);
    }
}
