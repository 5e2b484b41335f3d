//! Resource builders for single-member cast libraries.
//!
//! Every library uses the same id plan: `KEY*` 1, `CAS*` 2, the member's `CASt` 3, and any
//! payload children from 4 upwards, each linked to the member in the key table.
use crate::{
    build::container::ResourceFile,
    decode::{bitmap, member::CastMemberType, sound},
    foundation::error::{ArchiveError, ArchiveResult},
    io::{
        reader::Endian,
        tag::Tag,
        writer::{ByteWriter, encode_latin1},
    },
    resources::entry::ResourceKeyLink,
};

/// Id of the key table in a built library.
pub const KEY_TABLE_ID: i32 = 1;
/// Id of the cast table in a built library.
pub const CAST_TABLE_ID: i32 = 2;
/// Id of the member chunk in a built library.
pub const MEMBER_ID: i32 = 3;
/// First id handed to payload children.
pub const FIRST_CHILD_ID: i32 = 4;

const KEY_HEADER_SIZE: u16 = 12;
const KEY_ENTRY_SIZE: u16 = 12;

/// `KEY*` payload in container byte order.
pub fn key_table(endian: Endian, links: &[ResourceKeyLink]) -> ArchiveResult<Vec<u8>> {
    let count = u32::try_from(links.len())
        .map_err(|_| ArchiveError::validation("too many key-table links"))?;
    let mut w = ByteWriter::new(endian);
    w.write_u16(KEY_HEADER_SIZE);
    w.write_u16(KEY_ENTRY_SIZE);
    w.write_u32(count);
    w.write_u32(count);
    for link in links {
        if link.child_id <= 0 || link.parent_id <= 0 {
            return Err(ArchiveError::validation(format!(
                "key-table link {} -> {} needs positive ids",
                link.child_id, link.parent_id
            )));
        }
        w.write_i32(link.child_id);
        w.write_i32(link.parent_id);
        w.write_tag(link.tag);
    }
    Ok(w.into_bytes())
}

/// `CAS*` payload: one big-endian member id per slot, `0` for an empty slot.
pub fn cast_table(member_ids: &[i32]) -> ArchiveResult<Vec<u8>> {
    let mut w = ByteWriter::big();
    for &id in member_ids {
        if id < 0 {
            return Err(ArchiveError::validation(format!("cast slot id {id} is negative")));
        }
        w.write_i32(id);
    }
    Ok(w.into_bytes())
}

/// Info block holding only a member name: a two-item pointer table whose second item is
/// the name as a Pascal string.
pub fn name_info(name: &str) -> ArchiveResult<Vec<u8>> {
    let encoded = encode_latin1(name)?;
    let len = u8::try_from(encoded.len()).map_err(|_| {
        ArchiveError::validation(format!("member name of {} bytes exceeds 255", encoded.len()))
    })?;
    let mut items = vec![0u8, len];
    items.extend_from_slice(&encoded);

    let mut w = ByteWriter::big();
    w.write_u32(0);
    w.write_u16(2);
    w.write_u32(items.len() as u32);
    w.write_u32(0);
    w.write_u32(1);
    w.write_bytes(&items);
    Ok(w.into_bytes())
}

/// Modern `CASt` chunk: u32 type, u32 info length, u32 specific length, then both blocks.
pub fn member_chunk(member_type: CastMemberType, info: &[u8], specific: &[u8]) -> Vec<u8> {
    let mut w = ByteWriter::big();
    w.write_u32(member_type.code());
    w.write_u32(info.len() as u32);
    w.write_u32(specific.len() as u32);
    w.write_bytes(info);
    w.write_bytes(specific);
    w.into_bytes()
}

/// Modern `CASt` chunk carrying a name and an optional specific block.
pub fn cast_member_metadata(
    member_type: CastMemberType,
    name: &str,
    specific: &[u8],
) -> ArchiveResult<Vec<u8>> {
    Ok(member_chunk(member_type, &name_info(name)?, specific))
}

/// `KEY*` and `CAS*` resources for a library whose only member is [`MEMBER_ID`], plus the
/// member chunk and its children.
pub(crate) fn single_member_library(
    endian: Endian,
    member: Vec<u8>,
    children: Vec<(Tag, Vec<u8>)>,
) -> ArchiveResult<Vec<ResourceFile>> {
    let links: Vec<ResourceKeyLink> = children
        .iter()
        .zip(FIRST_CHILD_ID..)
        .map(|((tag, _), child_id)| ResourceKeyLink {
            child_id,
            parent_id: MEMBER_ID,
            tag: *tag,
        })
        .collect();
    let mut files = vec![
        ResourceFile::from_parts(Tag::KEY, KEY_TABLE_ID, key_table(endian, &links)?),
        ResourceFile::from_parts(Tag::CAS_STAR, CAST_TABLE_ID, cast_table(&[MEMBER_ID])?),
        ResourceFile::from_parts(Tag::CAST_MEMBER, MEMBER_ID, member),
    ];
    files.extend(
        children
            .into_iter()
            .zip(FIRST_CHILD_ID..)
            .map(|((tag, bytes), id)| ResourceFile::from_parts(tag, id, bytes)),
    );
    Ok(files)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Payloads of a bitmap member, written as children in this field order.
pub struct BitmapPayloads {
    /// Container-format image (`ediM`).
    pub media: Option<Vec<u8>>,
    /// Native bitmap data (`BITD`).
    pub bitd: Option<Vec<u8>>,
    /// Device-independent bitmap (`DIB `).
    pub dib: Option<Vec<u8>>,
    /// QuickDraw picture (`PICT`).
    pub pict: Option<Vec<u8>>,
    /// Alpha mask (`ALFA`).
    pub alpha: Option<Vec<u8>>,
    /// Thumbnail (`Thum`).
    pub thumbnail: Option<Vec<u8>>,
}

impl BitmapPayloads {
    fn into_children(self) -> Vec<(Tag, Vec<u8>)> {
        let slots = [
            self.media,
            self.bitd,
            self.dib,
            self.pict,
            self.alpha,
            self.thumbnail,
        ];
        bitmap::CHILD_PRIORITY
            .into_iter()
            .zip(slots)
            .filter_map(|(tag, bytes)| Some((tag, bytes?)))
            .collect()
    }
}

/// Library holding one named bitmap member. At least one payload is required.
pub fn bitmap_library(
    endian: Endian,
    name: &str,
    payloads: BitmapPayloads,
) -> ArchiveResult<Vec<ResourceFile>> {
    let children = payloads.into_children();
    if children.is_empty() {
        return Err(ArchiveError::validation("bitmap library needs at least one payload"));
    }
    let member = cast_member_metadata(CastMemberType::Bitmap, name, &[])?;
    single_member_library(endian, member, children)
}

/// Library holding one named sound member stored under `tag`.
pub fn sound_library(
    endian: Endian,
    name: &str,
    tag: Tag,
    bytes: Vec<u8>,
) -> ArchiveResult<Vec<ResourceFile>> {
    if !sound::CHILD_PRIORITY.contains(&tag) {
        return Err(ArchiveError::validation(format!("'{tag}' is not a sound tag")));
    }
    if bytes.is_empty() {
        return Err(ArchiveError::validation("sound library needs a payload"));
    }
    let member = cast_member_metadata(CastMemberType::Sound, name, &[])?;
    single_member_library(endian, member, vec![(tag, bytes)])
}

#[cfg(test)]
#[path = "../../tests/unit/build/library.rs"]
mod tests;
