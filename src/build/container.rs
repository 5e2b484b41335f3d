use std::{
    collections::BTreeMap,
    io::{Seek, SeekFrom, Write},
};

use crate::{
    build::options::WriterOptions,
    container::header::HEADER_LEN,
    foundation::error::{ArchiveError, ArchiveResult},
    io::{
        reader::Endian,
        tag::Tag,
        writer::ByteWriter,
    },
};

/// Length of the written `imap` payload.
const IMAP_LEN: u32 = 24;
const MMAP_HEADER_SIZE: u16 = 12;
const MMAP_ENTRY_SIZE: u16 = 20;
/// Largest resource id accepted; the map holds one slot per id up to the highest.
/// Slot 0 is always written as a `free` entry.
const MAX_RESOURCE_ID: i32 = 0x000F_FFFF;

#[derive(Clone, Debug, PartialEq, Eq)]
/// One resource to write, named `<tag><anything>_<id>.<ext>`.
pub struct ResourceFile {
    /// File name whose first four characters are the tag and whose digits after `_` are the id.
    pub name: String,
    /// Payload bytes.
    pub bytes: Vec<u8>,
}

impl ResourceFile {
    /// Named resource.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Resource named from its tag and id (`CASt_0003.bin`).
    pub fn from_parts(tag: Tag, id: i32, bytes: Vec<u8>) -> Self {
        Self::new(format!("{tag}_{id:04}.bin"), bytes)
    }
}

#[derive(Clone, Debug)]
struct Descriptor<'a> {
    tag: Tag,
    id: i32,
    bytes: &'a [u8],
    offset: u32,
}

/// Parse the tag and id encoded in a resource file name. Without a (possibly signed)
/// number after `_` the id falls back to `fallback_id`.
///
/// The writer passes the file's 1-based position as the fallback.
pub fn parse_resource_name(name: &str, fallback_id: i32) -> ArchiveResult<(Tag, i32)> {
    let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let stem = match file.rfind('.') {
        Some(dot) if dot >= 4 => &file[..dot],
        _ => file,
    };
    let head = stem.get(..4).ok_or_else(|| {
        ArchiveError::validation(format!(
            "resource name '{name}' must begin with a four-character tag"
        ))
    })?;
    let tag = Tag::parse(head)?;

    let id = stem[4..]
        .find('_')
        .map(|i| &stem[4 + i + 1..])
        .map(|rest| {
            rest.char_indices()
                .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && c == '-'))
                .map(|(_, c)| c)
                .collect::<String>()
        })
        .and_then(|digits| digits.parse::<i32>().ok())
        .unwrap_or(fallback_id);
    Ok((tag, id))
}

/// Classic (`imap` + `mmap`) container writer.
///
/// Ids encoded in resource names are preserved exactly: each resource occupies map slot
/// `id` and skipped slots are filled with `free` entries. Ids must be positive and unique
/// within one write.
#[derive(Clone, Debug, Default)]
pub struct ContainerWriter {
    options: WriterOptions,
}

impl ContainerWriter {
    /// Writer with the given options.
    pub fn new(options: WriterOptions) -> Self {
        Self { options }
    }

    /// Active options.
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Validate `files` and lay out the complete container in memory.
    pub fn to_bytes(&self, files: &[ResourceFile]) -> ArchiveResult<Vec<u8>> {
        let mut descriptors = Vec::with_capacity(files.len());
        let mut seen: BTreeMap<i32, &str> = BTreeMap::new();
        for (order, file) in files.iter().enumerate() {
            let (tag, id) = parse_resource_name(&file.name, order as i32 + 1)?;
            if !(1..=MAX_RESOURCE_ID).contains(&id) {
                return Err(ArchiveError::validation(format!(
                    "resource '{}' has id {id} outside 1..={MAX_RESOURCE_ID}",
                    file.name
                )));
            }
            if let Some(previous) = seen.insert(id, &file.name) {
                return Err(ArchiveError::validation(format!(
                    "resources '{previous}' and '{}' share id {id}",
                    file.name
                )));
            }
            if u32::try_from(file.bytes.len()).is_err() {
                return Err(ArchiveError::validation(format!(
                    "resource '{}' exceeds 4 GiB",
                    file.name
                )));
            }
            descriptors.push(Descriptor {
                tag,
                id,
                bytes: &file.bytes,
                offset: 0,
            });
        }
        descriptors.sort_by_key(|d| d.id);
        let slot_count = descriptors.last().map_or(0, |d| d.id as usize + 1);

        let endian = self.options.endian;
        let imap_start = HEADER_LEN;
        let mmap_start = imap_start + 8 + IMAP_LEN as usize;
        let mmap_len = usize::from(MMAP_HEADER_SIZE) + slot_count * usize::from(MMAP_ENTRY_SIZE);
        let data_start = mmap_start + 8 + mmap_len;

        let mut cursor = data_start as u64;
        for d in &mut descriptors {
            d.offset = u32::try_from(cursor)
                .map_err(|_| ArchiveError::validation("container exceeds 4 GiB"))?;
            let padded = d.bytes.len() as u64 + (d.bytes.len() as u64 & 1);
            cursor += 8 + padded;
        }
        let total = u32::try_from(cursor - HEADER_LEN as u64)
            .map_err(|_| ArchiveError::validation("container exceeds 4 GiB"))?;

        let mut w = ByteWriter::new(endian);
        w.write_bytes(match endian {
            Endian::Big => &Tag::RIFX.0,
            Endian::Little => &Tag::XFIR.0,
        });
        w.write_u32(total);
        w.write_tag(self.options.codec);

        w.write_tag(Tag::IMAP);
        w.write_u32(IMAP_LEN);
        w.write_u32(self.options.director_version.map_version());
        let mmap_offset_slot = w.len();
        w.write_u32(0);
        w.write_u32(self.options.director_version.archive_version());
        for _ in 0..3 {
            w.write_u32(0);
        }

        w.write_tag(Tag::MMAP);
        w.write_u32(mmap_len as u32);
        w.write_u16(MMAP_HEADER_SIZE);
        w.write_u16(MMAP_ENTRY_SIZE);
        w.write_u32(slot_count as u32);
        w.write_u32(slot_count as u32);
        let mut pending = descriptors.iter().peekable();
        for slot in 0..slot_count {
            match pending.next_if(|d| d.id as usize == slot) {
                Some(d) => {
                    w.write_tag(d.tag);
                    w.write_u32(d.bytes.len() as u32);
                    w.write_u32(d.offset);
                    w.write_u16(0);
                    w.write_u16(0);
                    w.write_i32(-1);
                }
                None => {
                    w.write_tag(Tag::FREE);
                    w.write_u32(0);
                    w.write_u32(0);
                    w.write_u16(0);
                    w.write_u16(0);
                    w.write_i32(-1);
                }
            }
        }

        for d in &descriptors {
            w.write_tag(d.tag);
            w.write_u32(d.bytes.len() as u32);
            w.write_bytes(d.bytes);
            w.pad_even();
        }
        w.patch_u32(mmap_offset_slot, mmap_start as u32)?;

        tracing::debug!(
            resources = descriptors.len(),
            slots = slot_count,
            bytes = w.len(),
            "container laid out"
        );
        Ok(w.into_bytes())
    }

    /// Validate, lay out, then write the container at the start of `out`.
    ///
    /// Nothing is written when validation fails. Returns the number of bytes written.
    pub fn write<W: Write + Seek>(&self, out: &mut W, files: &[ResourceFile]) -> ArchiveResult<u64> {
        let bytes = self.to_bytes(files)?;
        out.seek(SeekFrom::Start(0))?;
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(bytes.len() as u64)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/build/container.rs"]
mod tests;
