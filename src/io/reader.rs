use crate::{
    foundation::error::{ArchiveError, ArchiveResult},
    io::tag::Tag,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Byte order of a container family.
pub enum Endian {
    /// `RIFX` containers (classic Mac authoring).
    Big,
    /// `XFIR` containers (Windows authoring).
    #[default]
    Little,
}

impl Endian {
    /// The other byte order.
    pub fn flipped(self) -> Self {
        match self {
            Self::Big => Self::Little,
            Self::Little => Self::Big,
        }
    }
}

/// Read cursor over a byte slice with a per-session byte order.
///
/// Every read is bounds-checked; nothing here can index past the slice even when a
/// declared length claims otherwise.
#[derive(Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> ByteReader<'a> {
    /// Cursor at offset 0 with the given byte order.
    pub fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            pos: 0,
            endian,
        }
    }

    /// Big-endian cursor at offset 0.
    pub fn big(data: &'a [u8]) -> Self {
        Self::new(data, Endian::Big)
    }

    /// Current byte position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying data is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Remaining bytes from the current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Active byte order.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Switch byte order for subsequent reads.
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Access the full underlying data.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Seek to an absolute position; positions past the end are allowed but unreadable.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Skip `n` bytes forward.
    pub fn skip(&mut self, n: usize) -> ArchiveResult<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Advance to the next even position.
    pub fn align_even(&mut self) {
        if self.pos % 2 == 1 {
            self.pos += 1;
        }
    }

    fn ensure(&self, n: usize) -> ArchiveResult<()> {
        let have = self.remaining();
        if have < n {
            return Err(ArchiveError::UnexpectedEof {
                offset: self.pos,
                need: n,
                have,
            });
        }
        Ok(())
    }

    /// Read a slice of `n` bytes without copying.
    pub fn read_bytes(&mut self, n: usize) -> ArchiveResult<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read up to `n` bytes, stopping at the end of the data.
    pub fn read_bytes_clamped(&mut self, n: usize) -> &'a [u8] {
        let n = n.min(self.remaining());
        let start = self.pos.min(self.data.len());
        self.pos = start + n;
        &self.data[start..start + n]
    }

    fn read_array<const N: usize>(&mut self) -> ArchiveResult<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> ArchiveResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Read a `u16` in the session byte order.
    pub fn read_u16(&mut self) -> ArchiveResult<u16> {
        let b = self.read_array()?;
        Ok(match self.endian {
            Endian::Big => u16::from_be_bytes(b),
            Endian::Little => u16::from_le_bytes(b),
        })
    }

    /// Read an `i16` in the session byte order.
    pub fn read_i16(&mut self) -> ArchiveResult<i16> {
        Ok(self.read_u16()? as i16)
    }

    /// Read a `u32` in the session byte order.
    pub fn read_u32(&mut self) -> ArchiveResult<u32> {
        let b = self.read_array()?;
        Ok(match self.endian {
            Endian::Big => u32::from_be_bytes(b),
            Endian::Little => u32::from_le_bytes(b),
        })
    }

    /// Read an `i32` in the session byte order.
    pub fn read_i32(&mut self) -> ArchiveResult<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Read a `u64` in the session byte order.
    pub fn read_u64(&mut self) -> ArchiveResult<u64> {
        let b = self.read_array()?;
        Ok(match self.endian {
            Endian::Big => u64::from_be_bytes(b),
            Endian::Little => u64::from_le_bytes(b),
        })
    }

    /// Read a big-endian `u16` regardless of session byte order.
    pub fn read_u16_be(&mut self) -> ArchiveResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Read a big-endian `u32` regardless of session byte order.
    pub fn read_u32_be(&mut self) -> ArchiveResult<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Read a tag, reversing it in little-endian sessions.
    pub fn read_tag(&mut self) -> ArchiveResult<Tag> {
        let tag = Tag(self.read_array()?);
        Ok(match self.endian {
            Endian::Big => tag,
            Endian::Little => tag.reversed(),
        })
    }

    /// Read four bytes as a tag exactly as stored.
    pub fn read_raw_tag(&mut self) -> ArchiveResult<Tag> {
        Ok(Tag(self.read_array()?))
    }

    /// Read a variable-length integer: 7-bit groups, most significant first,
    /// high bit set on every byte but the last.
    pub fn read_varint(&mut self) -> ArchiveResult<u32> {
        let mut value: u32 = 0;
        for _ in 0..5 {
            let b = self.read_u8()?;
            value = (value << 7) | u32::from(b & 0x7F);
            if b & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(ArchiveError::map(format!(
            "variable-length integer at {:#x} exceeds 5 bytes",
            self.pos
        )))
    }

    /// Read a NUL-terminated string, decoded as Latin-1.
    pub fn read_cstring(&mut self) -> ArchiveResult<String> {
        let rest = &self.data[self.pos.min(self.data.len())..];
        let Some(end) = rest.iter().position(|&b| b == 0) else {
            return Err(ArchiveError::UnexpectedEof {
                offset: self.pos,
                need: rest.len() + 1,
                have: rest.len(),
            });
        };
        let text = latin1(&rest[..end]);
        self.pos += end + 1;
        Ok(text)
    }

    /// Read a one-byte length followed by that many Latin-1 bytes.
    pub fn read_pascal_string(&mut self) -> ArchiveResult<String> {
        let len = self.read_u8()? as usize;
        Ok(latin1(self.read_bytes(len)?))
    }
}

/// Decode bytes as Latin-1 (every byte maps to the code point of the same value).
pub fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Big-endian `u16` at an absolute offset.
pub fn be_u16_at(data: &[u8], offset: usize) -> Option<u16> {
    let b = data.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_be_bytes([b[0], b[1]]))
}

/// Big-endian `u32` at an absolute offset.
pub fn be_u32_at(data: &[u8], offset: usize) -> Option<u32> {
    let b = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

/// Little-endian `u32` at an absolute offset.
pub fn le_u32_at(data: &[u8], offset: usize) -> Option<u32> {
    let b = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// `u32` at an absolute offset in the given byte order.
pub fn u32_at(data: &[u8], offset: usize, endian: Endian) -> Option<u32> {
    match endian {
        Endian::Big => be_u32_at(data, offset),
        Endian::Little => le_u32_at(data, offset),
    }
}

/// `u16` at an absolute offset in the given byte order.
pub fn u16_at(data: &[u8], offset: usize, endian: Endian) -> Option<u16> {
    let b = data.get(offset..offset.checked_add(2)?)?;
    Some(match endian {
        Endian::Big => u16::from_be_bytes([b[0], b[1]]),
        Endian::Little => u16::from_le_bytes([b[0], b[1]]),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/io/reader.rs"]
mod tests;
