use crate::io::tag::Tag;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Where a resource's payload lives inside its container.
pub enum Storage {
    /// Classic map entry: absolute offset of the chunk header (tag + size precede the payload).
    Classic {
        /// Absolute byte offset of the chunk's tag.
        offset: u32,
    },
    /// Afterburner segment.
    Segment {
        /// Offset relative to the segment area start, or `-1` for an inline segment.
        offset: i64,
        /// Bytes stored on disk.
        compressed_size: u32,
        /// Id of the compression descriptor used for this segment.
        compression_id: u32,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Directory record locating one chunk's payload.
pub struct ResourceEntry {
    /// Resource id, unique within one read pass.
    pub id: i32,
    /// Chunk tag in reading order.
    pub tag: Tag,
    /// Declared (uncompressed) payload size.
    pub size: u32,
    /// Payload location.
    pub storage: Storage,
    /// Raw flags word from the map.
    pub flags: u16,
    /// Raw attributes word from the map.
    pub attributes: u16,
    /// Free-list link from the map.
    pub next_free: i32,
}

impl ResourceEntry {
    /// Whether this slot is free or junk. Free slots keep their id but are never exported.
    pub fn is_free(&self) -> bool {
        self.tag.is_free()
    }

    /// Whether this entry yields an exportable payload.
    pub fn is_exportable(&self) -> bool {
        !self.is_free() && self.size > 0
    }

    /// Export file name for this entry, `<tag>_<id:04>.<ext>`.
    ///
    /// The tag keeps its padding (`DIB _0004.bin`) so the name parses back to the same tag.
    pub fn file_name(&self, ext: &str) -> String {
        format!("{}_{:04}.{ext}", self.tag, self.id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
/// Key-table edge: `child_id` belongs to `parent_id` under `tag`.
pub struct ResourceKeyLink {
    /// Owned sub-resource.
    pub child_id: i32,
    /// Owning composite record.
    pub parent_id: i32,
    /// Tag of the child chunk.
    pub tag: Tag,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Codec family behind a compression descriptor.
pub enum CompressionKind {
    /// zlib stream.
    Zlib,
    /// Bytes stored as-is.
    Passthrough,
    /// Unrecognised codec; payloads using it load empty.
    Unknown,
}

/// Known descriptor GUIDs. Both Mac and Windows byte orders of the leading word occur.
const GUID_PREFIXES: &[([u8; 4], CompressionKind)] = &[
    ([0xAC, 0x99, 0xE9, 0x04], CompressionKind::Zlib),
    ([0x04, 0xE9, 0x99, 0xAC], CompressionKind::Zlib),
    ([0xAC, 0x99, 0x98, 0x2E], CompressionKind::Passthrough),
    ([0x2E, 0x98, 0x99, 0xAC], CompressionKind::Passthrough),
];

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Afterburner compression descriptor (`Fcdr` entry).
pub struct CompressionDescriptor {
    /// Descriptor id (its index in `Fcdr`).
    pub id: u32,
    /// Raw 16-byte class id.
    pub guid: [u8; 16],
    /// Human-readable codec name.
    pub name: String,
    /// Resolved codec family.
    pub kind: CompressionKind,
}

impl CompressionDescriptor {
    /// Build a descriptor, resolving its kind from the GUID first and its name second.
    pub fn new(id: u32, guid: [u8; 16], name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = resolve_kind(&guid, &name);
        Self {
            id,
            guid,
            name,
            kind,
        }
    }
}

fn resolve_kind(guid: &[u8; 16], name: &str) -> CompressionKind {
    if let Some((_, kind)) = GUID_PREFIXES.iter().find(|(p, _)| guid[..4] == p[..]) {
        return *kind;
    }
    let lower = name.to_ascii_lowercase();
    if lower.contains("zlib") || lower.contains("standard") {
        CompressionKind::Zlib
    } else if lower.contains("null") || lower.contains("none") || lower.contains("passthrough") {
        CompressionKind::Passthrough
    } else {
        CompressionKind::Unknown
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resources/entry.rs"]
mod tests;
