use crate::error::{Error, Result};

/// Width of the length field in front of a length-prefixed blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    U8,
    I32,
    I64,
}

const MAX_VAR_LEN_BYTES: usize = 5;

/// Little-endian read cursor over an in-memory buffer.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    /// Nesting level of recursive records being read.
    depth: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            depth: 0,
        }
    }

    /// Enter one level of a recursive record, failing past `limit` levels.
    pub fn descend(&mut self, limit: usize, what: &str) -> Result<()> {
        if self.depth >= limit {
            return Err(Error::format(
                self.pos,
                format!("{what} nests deeper than {limit} levels"),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    pub fn seek_to(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(Error::format(
                pos,
                format!("seek past end of {}-byte buffer", self.data.len()),
            ));
        }
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Bytes from the cursor to the end, without consuming them.
    pub fn peek_rest(&self) -> &'a [u8] {
        &self.data[self.pos.min(self.data.len())..]
    }

    /// Consume and return everything left in the buffer.
    pub fn rest(&mut self) -> &'a [u8] {
        let rest = self.peek_rest();
        self.pos = self.data.len();
        rest
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// .NET-style boolean: any non-zero byte is `true`.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32_array<const N: usize>(&mut self) -> Result<[i32; N]> {
        let mut result = [0i32; N];
        for item in &mut result {
            *item = self.read_i32()?;
        }
        Ok(result)
    }

    pub fn read_f32_array<const N: usize>(&mut self) -> Result<[f32; N]> {
        let mut result = [0f32; N];
        for item in &mut result {
            *item = self.read_f32()?;
        }
        Ok(result)
    }

    pub fn read_bool_vec(&mut self, n: usize) -> Result<Vec<bool>> {
        let mut result = Vec::with_capacity(n);
        for _ in 0..n {
            result.push(self.read_bool()?);
        }
        Ok(result)
    }

    /// Read a non-negative element count stored as `i32`.
    pub fn read_count(&mut self) -> Result<usize> {
        let offset = self.pos;
        let count = self.read_i32()?;
        usize::try_from(count)
            .map_err(|_| Error::format(offset, format!("negative element count {count}")))
    }

    pub fn read_len_prefixed(&mut self, prefix: Prefix) -> Result<&'a [u8]> {
        let offset = self.pos;
        let len = match prefix {
            Prefix::U8 => self.read_u8()? as i64,
            Prefix::I32 => self.read_i32()? as i64,
            Prefix::I64 => self.read_i64()?,
        };
        let len = usize::try_from(len)
            .map_err(|_| Error::format(offset, format!("negative length prefix {len}")))?;
        self.read_bytes(len)
    }

    /// Length written as 7-bit groups, least significant first; the high bit
    /// of each byte flags a continuation.
    pub fn read_var_len(&mut self) -> Result<usize> {
        let offset = self.pos;
        let mut len = 0usize;
        for index in 0..MAX_VAR_LEN_BYTES {
            let byte = self.read_u8()?;
            len |= ((byte & 0x7f) as usize) << (7 * index);
            if byte & 0x80 == 0 {
                return Ok(len);
            }
        }
        Err(Error::format(offset, "7-bit encoded length is too long"))
    }

    pub fn read_var_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_var_len()?;
        self.read_bytes(len)
    }

    pub fn read_var_string(&mut self) -> Result<String> {
        let offset = self.pos;
        let bytes = self.read_var_bytes()?;
        decode_utf8(bytes, offset)
    }

    pub fn read_prefixed_string(&mut self, prefix: Prefix) -> Result<String> {
        let offset = self.pos;
        let bytes = self.read_len_prefixed(prefix)?;
        decode_utf8(bytes, offset)
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(Error::Truncated {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        Ok(())
    }
}

fn decode_utf8(bytes: &[u8], offset: usize) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| Error::format(offset, format!("string is not valid UTF-8: {e}")))
}
