use crate::{
    container::header::ContainerFormat,
    foundation::error::{ArchiveError, ArchiveResult},
    io::{reader::ByteReader, tag::Tag},
    resources::entry::{ResourceEntry, Storage},
};

/// Minimum `mmap` header: header size, entry size, total and used counts.
const MMAP_MIN_HEADER: u16 = 12;
/// Bytes each `mmap` entry needs: tag, size, offset, flags, attributes, next-free link.
const MMAP_ENTRY_FIELDS: u16 = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Parsed `mmap` header.
pub struct MmapHeader {
    /// Declared header size (at least 12).
    pub header_size: u16,
    /// Declared width of each entry.
    pub entry_size: u16,
    /// Allocated entry slots.
    pub total_count: u32,
    /// Entry slots in use.
    pub used_count: u32,
    /// First free slot, when the header carries it.
    pub free_head: u32,
    /// Free-list terminator, when the header carries it.
    pub free_terminator: u32,
    /// Number of free slots, when the header carries it.
    pub free_count: u32,
}

#[derive(Clone, Debug)]
/// Result of reading the classic `imap` + `mmap` pair.
pub struct ClassicMap {
    /// `imap` map version.
    pub map_version: u32,
    /// `imap` archive-version word.
    pub archive_version: u32,
    /// Resolved absolute offset of the `mmap` chunk.
    pub mmap_offset: usize,
    /// `mmap` header.
    pub header: MmapHeader,
    /// Entries in slot order; the slot index is the resource id.
    pub entries: Vec<ResourceEntry>,
}

/// Read the classic resource map that follows the container header.
///
/// Any failure here is structural: without a map nothing is addressable.
#[tracing::instrument(skip(data, format), fields(len = data.len()))]
pub fn read_classic_map(data: &[u8], format: &ContainerFormat) -> ArchiveResult<ClassicMap> {
    let base = format.signature_offset;
    let mut r = ByteReader::new(data, format.endian);
    r.seek(format.payload_start());

    let imap_tag = r.read_tag().map_err(map_err("imap tag"))?;
    if imap_tag != Tag::IMAP {
        return Err(ArchiveError::map(format!(
            "expected 'imap' after the header, found '{imap_tag}'"
        )));
    }
    let imap_len = r.read_u32().map_err(map_err("imap length"))?;
    if imap_len < 12 {
        return Err(ArchiveError::map(format!(
            "imap of {imap_len} bytes is too short"
        )));
    }
    let map_version = r.read_u32().map_err(map_err("map version"))?;
    let raw_offset = r.read_u32().map_err(map_err("mmap offset"))? as usize;
    let archive_version = r.read_u32().map_err(map_err("archive version"))?;

    let mmap_offset = [base + raw_offset, format.payload_start() + raw_offset]
        .into_iter()
        .find(|&candidate| {
            let mut probe = ByteReader::new(data, format.endian);
            probe.seek(candidate);
            probe.read_tag().is_ok_and(|t| t == Tag::MMAP)
        })
        .ok_or_else(|| {
            ArchiveError::map(format!(
                "imap mmap offset {raw_offset:#x} does not point at an mmap chunk"
            ))
        })?;

    r.seek(mmap_offset + 8);
    let header = read_mmap_header(&mut r)?;
    if header.entry_size < MMAP_ENTRY_FIELDS {
        return Err(ArchiveError::map(format!(
            "mmap entry size {} is smaller than the {MMAP_ENTRY_FIELDS} bytes each entry needs",
            header.entry_size
        )));
    }

    let count = header.used_count.min(header.total_count);
    let mut entries = Vec::with_capacity(count.min(0x10000) as usize);
    for index in 0..count {
        let start = r.position();
        let tag = r.read_tag().map_err(map_err("mmap entry"))?;
        let size = r.read_u32().map_err(map_err("mmap entry"))?;
        let offset = r.read_u32().map_err(map_err("mmap entry"))?;
        let flags = r.read_u16().map_err(map_err("mmap entry"))?;
        let attributes = r.read_u16().map_err(map_err("mmap entry"))?;
        let next_free = r.read_i32().map_err(map_err("mmap entry"))?;
        entries.push(ResourceEntry {
            id: index as i32,
            tag,
            size,
            storage: Storage::Classic { offset },
            flags,
            attributes,
            next_free,
        });
        r.seek(start + header.entry_size as usize);
    }

    tracing::debug!(
        mmap_offset,
        map_version,
        archive_version,
        entries = entries.len(),
        "classic map"
    );
    Ok(ClassicMap {
        map_version,
        archive_version,
        mmap_offset,
        header,
        entries,
    })
}

fn read_mmap_header(r: &mut ByteReader<'_>) -> ArchiveResult<MmapHeader> {
    let header_size = r.read_u16().map_err(map_err("mmap header"))?;
    if header_size < MMAP_MIN_HEADER {
        return Err(ArchiveError::map(format!(
            "mmap header of {header_size} bytes is shorter than the required 12"
        )));
    }
    let entry_size = r.read_u16().map_err(map_err("mmap header"))?;
    let total_count = r.read_u32().map_err(map_err("mmap header"))?;
    let used_count = r.read_u32().map_err(map_err("mmap header"))?;

    let mut optional = [0u32; 3];
    let mut extra = (header_size - MMAP_MIN_HEADER) as usize;
    for slot in &mut optional {
        if extra < 4 {
            break;
        }
        *slot = r.read_u32().map_err(map_err("mmap header"))?;
        extra -= 4;
    }
    r.skip(extra).map_err(map_err("mmap header"))?;

    Ok(MmapHeader {
        header_size,
        entry_size,
        total_count,
        used_count,
        free_head: optional[0],
        free_terminator: optional[1],
        free_count: optional[2],
    })
}

/// Load a classic payload: skip the chunk's inline tag + size and read the map's declared size.
///
/// The map size wins over the inline repeat. Reads stop at the end of the input.
pub fn load_classic(data: &[u8], format: &ContainerFormat, entry: &ResourceEntry) -> Vec<u8> {
    let Storage::Classic { offset } = entry.storage else {
        return Vec::new();
    };
    let start = format.signature_offset + offset as usize + 8;
    let mut r = ByteReader::new(data, format.endian);
    r.seek(start);
    let bytes = r.read_bytes_clamped(entry.size as usize);
    if bytes.len() < entry.size as usize {
        tracing::warn!(
            id = entry.id,
            tag = %entry.tag,
            declared = entry.size,
            available = bytes.len(),
            "payload truncated by end of input"
        );
    }
    bytes.to_vec()
}

fn map_err(what: &'static str) -> impl Fn(ArchiveError) -> ArchiveError {
    move |e| ArchiveError::map(format!("{what}: {e}"))
}

#[cfg(test)]
#[path = "../../tests/unit/container/classic.rs"]
mod tests;
