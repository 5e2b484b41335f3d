use crate::{
    foundation::error::{ArchiveError, ArchiveResult},
    io::{reader::Endian, tag::Tag},
};

/// Growable output buffer with a per-session byte order, mirroring [`crate::ByteReader`].
#[derive(Clone, Debug)]
pub struct ByteWriter {
    buf: Vec<u8>,
    endian: Endian,
}

impl ByteWriter {
    /// Empty writer with the given byte order.
    pub fn new(endian: Endian) -> Self {
        Self {
            buf: Vec::new(),
            endian,
        }
    }

    /// Empty big-endian writer.
    pub fn big() -> Self {
        Self::new(Endian::Big)
    }

    /// Current length in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Active byte order.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Consume the writer and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Written bytes so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append one byte.
    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    /// Append a `u16` in the session byte order.
    pub fn write_u16(&mut self, v: u16) {
        match self.endian {
            Endian::Big => self.buf.extend_from_slice(&v.to_be_bytes()),
            Endian::Little => self.buf.extend_from_slice(&v.to_le_bytes()),
        }
    }

    /// Append a `u32` in the session byte order.
    pub fn write_u32(&mut self, v: u32) {
        match self.endian {
            Endian::Big => self.buf.extend_from_slice(&v.to_be_bytes()),
            Endian::Little => self.buf.extend_from_slice(&v.to_le_bytes()),
        }
    }

    /// Append an `i32` in the session byte order.
    pub fn write_i32(&mut self, v: i32) {
        self.write_u32(v as u32);
    }

    /// Append a `u64` in the session byte order.
    pub fn write_u64(&mut self, v: u64) {
        match self.endian {
            Endian::Big => self.buf.extend_from_slice(&v.to_be_bytes()),
            Endian::Little => self.buf.extend_from_slice(&v.to_le_bytes()),
        }
    }

    /// Append a big-endian `u16` regardless of session byte order.
    pub fn write_u16_be(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Append a big-endian `u32` regardless of session byte order.
    pub fn write_u32_be(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_be_bytes());
    }

    /// Append a little-endian `u32` regardless of session byte order.
    pub fn write_u32_le(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a tag, reversing it in little-endian sessions.
    pub fn write_tag(&mut self, tag: Tag) {
        let stored = match self.endian {
            Endian::Big => tag,
            Endian::Little => tag.reversed(),
        };
        self.buf.extend_from_slice(&stored.0);
    }

    /// Parse `text` as a tag and append it; fails unless it is exactly four ASCII characters.
    pub fn write_tag_str(&mut self, text: &str) -> ArchiveResult<()> {
        self.write_tag(Tag::parse(text)?);
        Ok(())
    }

    /// Append a variable-length integer (7-bit groups, most significant first).
    pub fn write_varint(&mut self, v: u32) {
        let mut groups = [0u8; 5];
        let mut n = 0;
        let mut rest = v;
        loop {
            groups[n] = (rest & 0x7F) as u8;
            n += 1;
            rest >>= 7;
            if rest == 0 {
                break;
            }
        }
        for i in (0..n).rev() {
            let cont = if i == 0 { 0 } else { 0x80 };
            self.buf.push(groups[i] | cont);
        }
    }

    /// Append a one-byte length and Latin-1 text; fails for characters above U+00FF or
    /// text longer than 255 bytes.
    pub fn write_pascal_string(&mut self, text: &str) -> ArchiveResult<()> {
        let bytes = encode_latin1(text)?;
        let len = u8::try_from(bytes.len()).map_err(|_| {
            ArchiveError::validation(format!("string of {} bytes exceeds 255", bytes.len()))
        })?;
        self.write_u8(len);
        self.write_bytes(&bytes);
        Ok(())
    }

    /// Overwrite a previously written `u32` at `pos` in the session byte order.
    pub fn patch_u32(&mut self, pos: usize, v: u32) -> ArchiveResult<()> {
        let bytes = match self.endian {
            Endian::Big => v.to_be_bytes(),
            Endian::Little => v.to_le_bytes(),
        };
        let end = pos + 4;
        let have = self.buf.len();
        let slot = self.buf.get_mut(pos..end).ok_or(ArchiveError::UnexpectedEof {
            offset: pos,
            need: 4,
            have: have.saturating_sub(pos),
        })?;
        slot.copy_from_slice(&bytes);
        Ok(())
    }

    /// Pad with a zero byte when the length is odd.
    pub fn pad_even(&mut self) {
        if self.buf.len() % 2 == 1 {
            self.buf.push(0);
        }
    }
}

/// Encode text as Latin-1, rejecting characters outside U+0000..=U+00FF.
pub fn encode_latin1(text: &str) -> ArchiveResult<Vec<u8>> {
    text.chars()
        .map(|c| {
            u8::try_from(u32::from(c)).map_err(|_| {
                ArchiveError::validation(format!("character {c:?} is not representable in Latin-1"))
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/io/writer.rs"]
mod tests;
