use super::*;
use crate::io::{tag::Tag, writer::ByteWriter};

fn key_bytes(endian: Endian, links: &[(i32, i32, Tag)]) -> Vec<u8> {
    let mut w = ByteWriter::new(endian);
    w.write_u16(12);
    w.write_u16(12);
    w.write_u32(links.len() as u32 + 3);
    w.write_u32(links.len() as u32);
    for (child, parent, tag) in links {
        w.write_i32(*child);
        w.write_i32(*parent);
        w.write_tag(*tag);
    }
    w.into_bytes()
}

#[test]
fn links_read_in_either_byte_order() {
    for endian in [Endian::Big, Endian::Little] {
        let bytes = key_bytes(endian, &[(1, 2, Tag::BITD), (5, 2, Tag::THUM)]);
        let links = parse_key_table(&bytes, endian).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].child_id, 1);
        assert_eq!(links[0].parent_id, 2);
        assert_eq!(links[0].tag, Tag::BITD);
        assert_eq!(links[1].tag, Tag::THUM);
    }
}

#[test]
fn truncated_table_fails() {
    let mut bytes = key_bytes(Endian::Big, &[(1, 2, Tag::BITD)]);
    bytes.truncate(bytes.len() - 2);
    assert!(parse_key_table(&bytes, Endian::Big).is_err());
}
