//! Synthetic shape members in each header generation.
use crate::{
    build::{
        container::ResourceFile,
        library::{name_info, single_member_library},
    },
    decode::shape::{RECORD_LEN, SHAPE_TYPE, ShapeLayout},
    foundation::error::{ArchiveError, ArchiveResult},
    io::{reader::Endian, writer::ByteWriter},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which header generation and byte order to write.
pub struct ShapeWriter {
    /// Header generation.
    pub layout: ShapeLayout,
    /// Byte order of the multi-byte header fields.
    pub endian: Endian,
    /// Flags byte written ahead of the record in vintage and transitional headers.
    pub flags: u8,
}

impl ShapeWriter {
    /// Writer for `layout` in `endian`, with a zero flags byte.
    pub fn new(layout: ShapeLayout, endian: Endian) -> Self {
        Self {
            layout,
            endian,
            flags: 0,
        }
    }

    /// `CASt` payload wrapping a 17-byte `record`. `info` is ignored by vintage headers,
    /// which have no info block.
    pub fn member_chunk(&self, record: &[u8], info: &[u8]) -> ArchiveResult<Vec<u8>> {
        if record.len() != RECORD_LEN {
            return Err(ArchiveError::validation(format!(
                "shape record must be {RECORD_LEN} bytes, got {}",
                record.len()
            )));
        }
        let info_len = u32::try_from(info.len())
            .map_err(|_| ArchiveError::validation("shape info block exceeds 4 GiB"))?;
        // type byte + flags + record
        let entry_len = 2 + RECORD_LEN;

        let mut w = ByteWriter::new(self.endian);
        match self.layout {
            ShapeLayout::Vintage => {
                w.write_u8(entry_len as u8);
                w.write_u8(SHAPE_TYPE);
                w.write_u8(self.flags);
                w.write_bytes(record);
            }
            ShapeLayout::Transitional => {
                w.write_u16(entry_len as u16);
                w.write_u32(info_len);
                w.write_u8(SHAPE_TYPE);
                w.write_u8(self.flags);
                w.write_bytes(record);
                w.write_bytes(info);
            }
            ShapeLayout::Modern => {
                w.write_u32(u32::from(SHAPE_TYPE));
                w.write_u32(info_len);
                w.write_u32(RECORD_LEN as u32);
                w.write_bytes(info);
                w.write_bytes(record);
            }
            ShapeLayout::Scored => {
                return Err(ArchiveError::validation("scored is not a writable shape layout"));
            }
        }
        Ok(w.into_bytes())
    }

    /// Library holding one named shape member. Vintage members cannot carry the name.
    pub fn library(&self, name: &str, record: &[u8]) -> ArchiveResult<Vec<ResourceFile>> {
        let info = match self.layout {
            ShapeLayout::Vintage => Vec::new(),
            _ => name_info(name)?,
        };
        let member = self.member_chunk(record, &info)?;
        single_member_library(self.endian, member, Vec::new())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/build/shape.rs"]
mod tests;
