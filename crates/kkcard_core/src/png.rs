//! PNG framing: locate the end of a leading PNG image so the binary tail that
//! follows it can be decoded.

use crate::error::{Error, Result};
use crate::reader::ByteReader;

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

const CHUNK_IEND: [u8; 4] = *b"IEND";

pub fn has_png_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(&PNG_SIGNATURE)
}

/// Consume a PNG image from the cursor and return the consumed bytes.
///
/// Chunks are walked as `[length:u32 BE][type:4][data][crc:4]` up to and
/// including `IEND`. CRCs are carried through untouched.
pub fn read_png<'a>(r: &mut ByteReader<'a>) -> Result<&'a [u8]> {
    let start = r.position();
    let signature: [u8; 8] = r.read_array().map_err(|_| {
        Error::format(start, "input is too short to hold a PNG signature")
    })?;
    if signature != PNG_SIGNATURE {
        return Err(Error::format(start, "missing PNG signature"));
    }

    loop {
        let chunk_start = r.position();
        let header: [u8; 8] = r.read_array().map_err(|_| {
            Error::format(chunk_start, "PNG ended before the IEND chunk")
        })?;
        let len = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let chunk_type = [header[4], header[5], header[6], header[7]];

        let body = len.checked_add(4).ok_or_else(|| {
            Error::format(chunk_start, format!("PNG chunk length {len} overflows"))
        })?;
        if r.remaining() < body {
            return Err(Error::format(
                chunk_start,
                format!(
                    "PNG chunk {:?} declares {len} bytes but only {} remain",
                    String::from_utf8_lossy(&chunk_type),
                    r.remaining().saturating_sub(4)
                ),
            ));
        }
        r.skip(body)?;

        if chunk_type == CHUNK_IEND {
            break;
        }
    }

    let end = r.position();
    r.seek_to(start)?;
    r.read_bytes(end - start)
}

/// Read a PNG only when the cursor sits on a PNG signature.
pub fn read_optional_png(r: &mut ByteReader<'_>) -> Result<Option<Vec<u8>>> {
    if has_png_signature(r.peek_rest()) {
        Ok(Some(read_png(r)?.to_vec()))
    } else {
        Ok(None)
    }
}

/// A minimal valid 1x1 PNG, used as a stand-in thumbnail.
pub fn placeholder_png() -> Vec<u8> {
    let mut out = PNG_SIGNATURE.to_vec();
    push_chunk(
        &mut out,
        b"IHDR",
        &[0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0],
    );
    push_chunk(
        &mut out,
        b"IDAT",
        &[0x78, 0x9c, 0x63, 0x60, 0x00, 0x02, 0x00, 0x00, 0x05, 0x00, 0x01],
    );
    push_chunk(&mut out, &CHUNK_IEND, &[]);
    out
}

fn push_chunk(out: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);
    // Placeholder CRC; readers here never verify it.
    out.extend_from_slice(&[0, 0, 0, 0]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn stops_after_iend() {
        let png = placeholder_png();
        let mut bytes = png.clone();
        bytes.extend_from_slice(b"tail");

        let mut r = ByteReader::new(&bytes);
        let image = read_png(&mut r).unwrap();
        assert_eq!(image, png.as_slice());
        assert_eq!(r.rest(), b"tail");
    }

    #[test]
    fn rejects_bad_signature() {
        let bytes = b"GIF89a..........";
        let mut r = ByteReader::new(bytes);
        assert_eq!(read_png(&mut r).unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn rejects_chunk_running_past_input() {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&1000u32.to_be_bytes());
        bytes.extend_from_slice(b"IDAT");
        bytes.extend_from_slice(&[0; 16]);

        let mut r = ByteReader::new(&bytes);
        assert_eq!(read_png(&mut r).unwrap_err().kind(), ErrorKind::Format);
    }

    #[test]
    fn optional_png_leaves_cursor_when_absent() {
        let bytes = [1u8, 2, 3];
        let mut r = ByteReader::new(&bytes);
        assert!(read_optional_png(&mut r).unwrap().is_none());
        assert_eq!(r.position(), 0);
    }
}
