use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    io::Read as _,
    rc::Rc,
};

use flate2::read::ZlibDecoder;

use crate::{
    container::header::ContainerFormat,
    foundation::error::{ArchiveError, ArchiveResult},
    io::{reader::ByteReader, tag::Tag},
    resources::entry::{CompressionDescriptor, CompressionKind, ResourceEntry, Storage},
};

/// Resource id of the inline-segment blob in `ABMP`.
pub const INLINE_SEGMENT_ID: i32 = 2;
/// Segment offset marking a resource stored in the inline-segment blob.
pub const INLINE_OFFSET: i64 = -1;

/// Upper bound for buffer pre-allocation from untrusted size hints.
const MAX_PREALLOC: usize = 16 << 20;

#[derive(Clone, Debug)]
/// Everything decoded from the `Fver`, `Fcdr`, `ABMP` and `FGEI` control chunks.
pub struct AfterburnerMap {
    /// `Fver` version number.
    pub fver: u32,
    /// `Fver` version string (present from version 0x501).
    pub version: Option<String>,
    /// Compression descriptors in `Fcdr` order.
    pub descriptors: Vec<CompressionDescriptor>,
    /// Resource entries in `ABMP` order.
    pub entries: Vec<ResourceEntry>,
    /// Inline segment bytes by resource id.
    pub inline_segments: HashMap<i32, Vec<u8>>,
    /// Absolute offset of the `FGEI` body; segment offsets are relative to it.
    pub body_offset: usize,
}

#[derive(Clone, Copy)]
struct ChunkHeader {
    len: usize,
    start: usize,
}

fn read_chunk_header(r: &mut ByteReader<'_>, expected: Tag) -> ArchiveResult<ChunkHeader> {
    let tag = r.read_tag().map_err(map_err(expected))?;
    if tag != expected {
        return Err(ArchiveError::map(format!(
            "expected chunk '{expected}' but found '{tag}'"
        )));
    }
    let len = r.read_varint().map_err(map_err(expected))? as usize;
    Ok(ChunkHeader {
        len,
        start: r.position(),
    })
}

fn map_err(tag: Tag) -> impl Fn(ArchiveError) -> ArchiveError {
    move |e| ArchiveError::map(format!("{tag}: {e}"))
}

/// Read the segmented directory that follows an `FGDM`/`FGDC` header.
///
/// Control chunks must appear in the order `Fver`, `Fcdr`, `ABMP`, `FGEI`; any deviation or
/// unreadable control data is structural.
#[tracing::instrument(skip(data, format), fields(len = data.len()))]
pub fn read_afterburner_map(data: &[u8], format: &ContainerFormat) -> ArchiveResult<AfterburnerMap> {
    let mut r = ByteReader::new(data, format.endian);
    r.seek(format.payload_start());

    let fver_chunk = read_chunk_header(&mut r, Tag::FVER)?;
    let (fver, version) = read_fver(&mut r, fver_chunk).map_err(map_err(Tag::FVER))?;
    r.seek(fver_chunk.start + fver_chunk.len);

    let fcdr_chunk = read_chunk_header(&mut r, Tag::FCDR)?;
    let descriptors = read_fcdr(&mut r, fcdr_chunk).map_err(map_err(Tag::FCDR))?;
    r.seek(fcdr_chunk.start + fcdr_chunk.len);

    let abmp_chunk = read_chunk_header(&mut r, Tag::ABMP)?;
    let entries = read_abmp(&mut r, abmp_chunk).map_err(map_err(Tag::ABMP))?;
    r.seek(abmp_chunk.start + abmp_chunk.len);

    let fgei_chunk = read_chunk_header(&mut r, Tag::FGEI)?;
    let inline_segments = read_fgei(&mut r, fgei_chunk, &entries)?;

    tracing::debug!(
        fver,
        version = version.as_deref().unwrap_or(""),
        descriptors = descriptors.len(),
        entries = entries.len(),
        inline = inline_segments.len(),
        "afterburner map"
    );
    Ok(AfterburnerMap {
        fver,
        version,
        descriptors,
        entries,
        inline_segments,
        body_offset: fgei_chunk.start,
    })
}

fn read_fver(r: &mut ByteReader<'_>, chunk: ChunkHeader) -> ArchiveResult<(u32, Option<String>)> {
    r.seek(chunk.start);
    let fver = r.read_varint()?;
    if fver >= 0x401 {
        r.read_varint()?;
        r.read_varint()?;
    }
    let version = if fver >= 0x501 {
        let len = r.read_u8()? as usize;
        let bytes = r.read_bytes(len)?;
        Some(String::from_utf8_lossy(bytes).into_owned())
    } else {
        None
    };
    Ok((fver, version))
}

fn read_fcdr(r: &mut ByteReader<'_>, chunk: ChunkHeader) -> ArchiveResult<Vec<CompressionDescriptor>> {
    r.seek(chunk.start);
    let compressed = r.read_bytes(chunk.len)?;
    let table = inflate(compressed, None)?;
    let mut t = ByteReader::new(&table, r.endian());
    let count = t.read_u16()?;
    let mut guids = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let mut guid = [0u8; 16];
        guid.copy_from_slice(t.read_bytes(16)?);
        guids.push(guid);
    }
    let mut descriptors = Vec::with_capacity(guids.len());
    for (id, guid) in guids.into_iter().enumerate() {
        let name = t.read_cstring()?;
        descriptors.push(CompressionDescriptor::new(id as u32, guid, name));
    }
    Ok(descriptors)
}

fn read_abmp(r: &mut ByteReader<'_>, chunk: ChunkHeader) -> ArchiveResult<Vec<ResourceEntry>> {
    r.seek(chunk.start);
    let mode = r.read_varint()?;
    let expected = r.read_varint()? as usize;
    let rest = (chunk.start + chunk.len).saturating_sub(r.position());
    let body = r.read_bytes(rest)?;
    let map = if mode == 0 {
        body.to_vec()
    } else {
        inflate(body, Some(expected))?
    };

    let mut m = ByteReader::new(&map, r.endian());
    m.read_varint()?;
    m.read_varint()?;
    let count = m.read_varint()?;
    let mut entries = Vec::with_capacity((count as usize).min(map.len()));
    for _ in 0..count {
        let id = m.read_varint()? as i32;
        let offset = m.read_varint()? as i32;
        let compressed_size = m.read_varint()?;
        let size = m.read_varint()?;
        let compression_id = m.read_varint()?;
        let tag = m.read_tag()?;
        entries.push(ResourceEntry {
            id,
            tag,
            size,
            storage: Storage::Segment {
                offset: i64::from(offset),
                compressed_size,
                compression_id,
            },
            flags: 0,
            attributes: 0,
            next_free: -1,
        });
    }
    Ok(entries)
}

fn read_fgei(
    r: &mut ByteReader<'_>,
    chunk: ChunkHeader,
    entries: &[ResourceEntry],
) -> ArchiveResult<HashMap<i32, Vec<u8>>> {
    let sizes: HashMap<i32, u32> = entries
        .iter()
        .filter_map(|e| match e.storage {
            Storage::Segment {
                compressed_size, ..
            } => Some((e.id, compressed_size)),
            Storage::Classic { .. } => None,
        })
        .collect();
    let Some(&inline_size) = sizes.get(&INLINE_SEGMENT_ID) else {
        return Err(ArchiveError::map(
            "afterburner map is missing the inline segment resource (id 2)",
        ));
    };

    let mut segments = HashMap::new();
    if inline_size == 0 {
        segments.insert(INLINE_SEGMENT_ID, Vec::new());
        return Ok(segments);
    }

    r.seek(chunk.start);
    let compressed = r
        .read_bytes(inline_size as usize)
        .map_err(map_err(Tag::FGEI))?;
    let blob = inflate(compressed, None).map_err(map_err(Tag::FGEI))?;

    let mut b = ByteReader::new(&blob, r.endian());
    while b.remaining() > 0 {
        let Ok(id) = b.read_varint().map(|v| v as i32) else {
            break;
        };
        let Some(&len) = sizes.get(&id) else {
            break;
        };
        let Ok(bytes) = b.read_bytes(len as usize) else {
            break;
        };
        segments.insert(id, bytes.to_vec());
    }
    Ok(segments)
}

/// Inflate a zlib stream.
pub fn inflate(bytes: &[u8], expected: Option<usize>) -> ArchiveResult<Vec<u8>> {
    let hint = expected.unwrap_or(bytes.len().saturating_mul(4));
    let mut out = Vec::with_capacity(hint.min(MAX_PREALLOC));
    ZlibDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(|e| ArchiveError::decompress(format!("zlib: {e}")))?;
    Ok(out)
}

/// Lazily inflated segment store for one read pass.
///
/// The cache is keyed by segment offset, so resources sharing a segment inflate it once.
/// It is deliberately `!Sync` and lives exactly as long as its read context.
#[derive(Debug)]
pub struct AfterburnerState {
    body_offset: usize,
    descriptors: HashMap<u32, CompressionDescriptor>,
    inline_segments: HashMap<i32, Vec<u8>>,
    cache: RefCell<HashMap<i64, Rc<Vec<u8>>>>,
    inflations: Cell<usize>,
}

impl AfterburnerState {
    /// Build the store from a decoded map.
    pub fn new(map: &AfterburnerMap) -> Self {
        Self {
            body_offset: map.body_offset,
            descriptors: map
                .descriptors
                .iter()
                .map(|d| (d.id, d.clone()))
                .collect(),
            inline_segments: map.inline_segments.clone(),
            cache: RefCell::new(HashMap::new()),
            inflations: Cell::new(0),
        }
    }

    /// Number of segments decoded so far (cache misses).
    pub fn inflation_count(&self) -> usize {
        self.inflations.get()
    }

    /// Load one resource's payload. Inline segments bypass decompression.
    pub fn load(&self, data: &[u8], entry: &ResourceEntry) -> ArchiveResult<Vec<u8>> {
        let Storage::Segment {
            offset,
            compressed_size,
            compression_id,
        } = entry.storage
        else {
            return Err(ArchiveError::decompress(format!(
                "resource {} is not stored in a segment",
                entry.id
            )));
        };

        if offset == INLINE_OFFSET {
            return self.inline_segments.get(&entry.id).cloned().ok_or_else(|| {
                ArchiveError::decompress(format!("no inline segment for resource {}", entry.id))
            });
        }

        if let Some(hit) = self.cache.borrow().get(&offset) {
            return Ok(hit.as_ref().clone());
        }

        let start = usize::try_from(offset)
            .ok()
            .and_then(|o| o.checked_add(self.body_offset))
            .ok_or_else(|| ArchiveError::decompress(format!("bad segment offset {offset}")))?;
        let mut r = ByteReader::big(data);
        r.seek(start);
        let stored = r.read_bytes(compressed_size as usize)?;

        let kind = self
            .descriptors
            .get(&compression_id)
            .map(|d| d.kind)
            .unwrap_or(CompressionKind::Unknown);
        let bytes = match kind {
            CompressionKind::Zlib => inflate(stored, Some(entry.size as usize))?,
            CompressionKind::Passthrough => stored.to_vec(),
            CompressionKind::Unknown => {
                return Err(ArchiveError::decompress(format!(
                    "unknown compression id {compression_id}"
                )));
            }
        };
        self.inflations.set(self.inflations.get() + 1);
        let bytes = Rc::new(bytes);
        self.cache.borrow_mut().insert(offset, Rc::clone(&bytes));
        Ok(bytes.as_ref().clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/afterburner.rs"]
mod tests;
