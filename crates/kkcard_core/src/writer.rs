use crate::error::{Error, Result};
use crate::reader::Prefix;

/// Little-endian byte sink, the inverse of [`crate::reader::ByteReader`].
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
        }
    }

    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_i8(&mut self, v: i8) {
        self.buf.push(v as u8);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(u8::from(v));
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f32_slice(&mut self, values: &[f32]) {
        for v in values {
            self.write_f32(*v);
        }
    }

    pub fn write_i32_slice(&mut self, values: &[i32]) {
        for v in values {
            self.write_i32(*v);
        }
    }

    pub fn write_bool_slice(&mut self, values: &[bool]) {
        for v in values {
            self.write_bool(*v);
        }
    }

    pub fn write_count(&mut self, count: usize) -> Result<()> {
        let count = i32::try_from(count).map_err(|_| {
            Error::format(self.position(), format!("element count {count} exceeds i32"))
        })?;
        self.write_i32(count);
        Ok(())
    }

    pub fn write_len_prefixed(&mut self, prefix: Prefix, bytes: &[u8]) -> Result<()> {
        let len = bytes.len();
        let too_long = || {
            Error::format(
                self.buf.len(),
                format!("{len}-byte field does not fit a {prefix:?} length prefix"),
            )
        };
        match prefix {
            Prefix::U8 => self.write_u8(u8::try_from(len).map_err(|_| too_long())?),
            Prefix::I32 => self.write_i32(i32::try_from(len).map_err(|_| too_long())?),
            Prefix::I64 => self.write_i64(i64::try_from(len).map_err(|_| too_long())?),
        }
        self.write_bytes(bytes);
        Ok(())
    }

    pub fn write_var_len(&mut self, mut len: usize) {
        while len >= 0x80 {
            self.buf.push((len as u8 & 0x7f) | 0x80);
            len >>= 7;
        }
        self.buf.push(len as u8);
    }

    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_var_len(bytes.len());
        self.write_bytes(bytes);
    }

    pub fn write_var_string(&mut self, s: &str) {
        self.write_var_bytes(s.as_bytes());
    }

    pub fn write_prefixed_string(&mut self, prefix: Prefix, s: &str) -> Result<()> {
        self.write_len_prefixed(prefix, s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ByteReader;

    #[test]
    fn var_len_matches_dotnet_layout() {
        let mut w = ByteWriter::new();
        w.write_var_len(127);
        w.write_var_len(128);
        w.write_var_len(16_384);
        assert_eq!(w.as_slice(), &[0x7f, 0x80, 0x01, 0x80, 0x80, 0x01]);

        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_var_len().unwrap(), 127);
        assert_eq!(r.read_var_len().unwrap(), 128);
        assert_eq!(r.read_var_len().unwrap(), 16_384);
    }

    #[test]
    fn u8_prefix_rejects_long_fields() {
        let mut w = ByteWriter::new();
        let long = vec![0u8; 256];
        assert!(w.write_len_prefixed(Prefix::U8, &long).is_err());
        assert!(w.write_len_prefixed(Prefix::U8, &long[..255]).is_ok());
        assert_eq!(w.position(), 256);
    }
}
