use crate::{
    foundation::error::{ArchiveError, ArchiveResult},
    io::{reader::Endian, tag::Tag},
};

/// Projector stubs that prefix an embedded movie and store its offset right after the marker.
const PROJECTOR_MARKERS: [&[u8; 4]; 4] = [b"PJ93", b"PJ95", b"PJ00", b"PJ01"];

/// Byte order implied by a container signature as stored on disk.
pub fn signature_endian(raw: Tag) -> Option<Endian> {
    match raw {
        Tag::RIFX => Some(Endian::Big),
        Tag::XFIR => Some(Endian::Little),
        _ => None,
    }
}

fn is_signature_at(data: &[u8], offset: usize) -> bool {
    data.get(offset..offset.saturating_add(4))
        .and_then(|b| <[u8; 4]>::try_from(b).ok())
        .and_then(|b| signature_endian(Tag(b)))
        .is_some()
}

/// Find the container signature.
///
/// Tries offset 0, then a projector header's stored offset (little-endian first), then a
/// forward scan. Leading bytes before the signature are tolerated.
pub fn locate_signature(data: &[u8]) -> ArchiveResult<usize> {
    if data.len() < 4 {
        return Err(ArchiveError::signature(format!(
            "input of {} bytes is too small for a container header",
            data.len()
        )));
    }
    if is_signature_at(data, 0) {
        return Ok(0);
    }

    if PROJECTOR_MARKERS.iter().any(|m| data[..4] == m[..]) {
        if let Some(raw) = data.get(4..8) {
            let raw = [raw[0], raw[1], raw[2], raw[3]];
            for offset in [u32::from_le_bytes(raw), u32::from_be_bytes(raw)] {
                let offset = offset as usize;
                if offset < data.len() && is_signature_at(data, offset) {
                    tracing::debug!(offset, "container located through projector header");
                    return Ok(offset);
                }
            }
        }
        tracing::warn!("projector header offset does not point at a container, scanning");
    }

    (1..data.len().saturating_sub(3))
        .find(|&i| is_signature_at(data, i))
        .ok_or_else(|| ArchiveError::signature("no RIFX/XFIR signature found"))
}

#[cfg(test)]
#[path = "../../tests/unit/container/locate.rs"]
mod tests;
