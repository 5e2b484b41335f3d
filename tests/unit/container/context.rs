use super::*;
use crate::{
    build::container::{ContainerWriter, ResourceFile},
    io::{reader::Endian, writer::ByteWriter},
};

fn key_payload(endian: Endian, links: &[(i32, i32, Tag)]) -> Vec<u8> {
    let mut w = ByteWriter::new(endian);
    w.write_u16(12);
    w.write_u16(12);
    w.write_u32(links.len() as u32);
    w.write_u32(links.len() as u32);
    for (child, parent, tag) in links {
        w.write_i32(*child);
        w.write_i32(*parent);
        w.write_tag(*tag);
    }
    w.into_bytes()
}

fn movie(files: &[ResourceFile]) -> Vec<u8> {
    ContainerWriter::default().to_bytes(files).unwrap()
}

#[test]
fn key_table_links_children_to_owners() {
    let bytes = movie(&[
        ResourceFile::from_parts(Tag::BITD, 1, vec![7; 4]),
        ResourceFile::from_parts(Tag::CAST_MEMBER, 2, vec![0; 8]),
        ResourceFile::from_parts(Tag::KEY, 3, key_payload(Endian::Little, &[(1, 2, Tag::BITD)])),
    ]);
    let ctx = ReadContext::open(bytes, "linked.dir").unwrap();
    assert_eq!(ctx.name(), "linked.dir");
    assert_eq!(ctx.table().links().len(), 1);
    assert_eq!(ctx.graph().child_with_tag(2, Tag::BITD), Some(1));
    assert_eq!(ctx.graph().owner_of(1), 2);
    assert_eq!(ctx.load(1), vec![7; 4]);
}

#[test]
fn unreadable_key_table_leaves_entries_usable() {
    let bytes = movie(&[
        ResourceFile::from_parts(Tag::BITD, 1, vec![1, 2]),
        ResourceFile::from_parts(Tag::KEY, 2, vec![0, 12]),
    ]);
    let ctx = ReadContext::open(bytes, "broken-keys").unwrap();
    assert!(ctx.table().links().is_empty());
    assert!(ctx.graph().children_by_parent().is_empty());
    assert_eq!(ctx.load(1), vec![1, 2]);
}

#[test]
fn projector_prefix_is_skipped() {
    let inner = movie(&[ResourceFile::from_parts(Tag::STXT, 1, b"hello".to_vec())]);
    let mut data = b"PJ95".to_vec();
    data.extend_from_slice(&16u32.to_le_bytes());
    data.resize(16, 0);
    data.extend_from_slice(&inner);

    let ctx = ReadContext::open(data, "projector.exe").unwrap();
    assert_eq!(ctx.format().signature_offset, 16);
    assert_eq!(ctx.load(1), b"hello".to_vec());
}

#[test]
fn unknown_ids_load_empty() {
    let ctx = ReadContext::open(movie(&[]), "empty").unwrap();
    assert!(ctx.table().get(42).is_none());
    assert!(ctx.load(42).is_empty());
    assert!(ctx.afterburner().is_none());
}

#[test]
fn export_skips_free_and_empty_slots() {
    let bytes = movie(&[
        ResourceFile::from_parts(Tag::BITD, 2, vec![1, 2, 3]),
        ResourceFile::from_parts(Tag::DIB, 4, Vec::new()),
    ]);
    let ctx = ReadContext::open(bytes, "gaps").unwrap();
    assert!(ctx.table().get(0).unwrap().is_free());
    let exported = ctx.export_resources();
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0].id, 2);
    assert_eq!(exported[0].file_name, "BITD_0002.bin");
    assert_eq!(exported[0].bytes, vec![1, 2, 3]);
}

#[test]
fn garbage_is_a_structural_error() {
    let err = ReadContext::open(b"not a movie at all".to_vec(), "junk").unwrap_err();
    assert!(err.is_structural());
}
