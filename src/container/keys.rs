use crate::{
    foundation::error::ArchiveResult,
    io::reader::{ByteReader, Endian},
    resources::entry::ResourceKeyLink,
};

/// Parse a `KEY*` payload: u16 header size, u16 entry size, u32 total, u32 used, then
/// `used` entries of (child id, parent id, tag) in container byte order.
pub fn parse_key_table(bytes: &[u8], endian: Endian) -> ArchiveResult<Vec<ResourceKeyLink>> {
    let mut r = ByteReader::new(bytes, endian);
    let header_size = r.read_u16()?;
    let entry_size = r.read_u16()?.max(12) as usize;
    let _total = r.read_u32()?;
    let used = r.read_u32()?;
    r.seek(usize::from(header_size).max(12));

    let mut links = Vec::with_capacity((used as usize).min(bytes.len() / 12));
    for _ in 0..used {
        let start = r.position();
        let child_id = r.read_i32()?;
        let parent_id = r.read_i32()?;
        let tag = r.read_tag()?;
        links.push(ResourceKeyLink {
            child_id,
            parent_id,
            tag,
        });
        r.seek(start + entry_size);
    }
    Ok(links)
}

#[cfg(test)]
#[path = "../../tests/unit/container/keys.rs"]
mod tests;
