use super::*;
use crate::io::writer::ByteWriter;

fn info_with_name(name: &str) -> Vec<u8> {
    let mut items = vec![0u8];
    items.push(name.len() as u8);
    items.extend_from_slice(name.as_bytes());

    let mut w = ByteWriter::big();
    w.write_u32(0);
    w.write_u16(2);
    w.write_u32(items.len() as u32);
    w.write_u32(0);
    w.write_u32(1);
    w.write_bytes(&items);
    w.into_bytes()
}

fn modern(code: u32, info: &[u8], specific: &[u8]) -> Vec<u8> {
    let mut w = ByteWriter::big();
    w.write_u32(code);
    w.write_u32(info.len() as u32);
    w.write_u32(specific.len() as u32);
    w.write_bytes(info);
    w.write_bytes(specific);
    w.into_bytes()
}

#[test]
fn type_codes_round_trip() {
    for code in 1..=15 {
        assert_eq!(CastMemberType::from_code(code).code(), code);
    }
    assert_eq!(CastMemberType::from_code(3), CastMemberType::Field);
    assert_eq!(CastMemberType::from_code(12), CastMemberType::Text);
    assert_eq!(CastMemberType::from_code(99), CastMemberType::Unknown);
    assert!(CastMemberType::Button.is_field_like());
    assert!(!CastMemberType::Text.is_field_like());
}

#[test]
fn modern_chunk_with_pointer_table_name() {
    let bytes = modern(1, &info_with_name("Logo"), &[1, 2, 3]);
    let chunk = MemberChunk::parse(&bytes, Some(DirectorVersion::D10)).unwrap();
    assert_eq!(chunk.member_type, CastMemberType::Bitmap);
    assert_eq!(chunk.layout, MemberLayout::Modern);
    assert_eq!(chunk.specific, vec![1, 2, 3]);
    assert_eq!(chunk.name(), "Logo");
}

#[test]
fn transitional_chunk_is_recognised_for_old_versions() {
    let info = info_with_name("Button 1");
    let mut w = ByteWriter::big();
    w.write_u16(3);
    w.write_u32(info.len() as u32);
    w.write_u8(7);
    w.write_bytes(&[0xAA, 0xBB]);
    w.write_bytes(&info);
    let bytes = w.into_bytes();

    for version in [Some(DirectorVersion::D4), None] {
        let chunk = MemberChunk::parse(&bytes, version).unwrap();
        assert_eq!(chunk.member_type, CastMemberType::Button);
        assert_eq!(chunk.layout, MemberLayout::Transitional);
        assert_eq!(chunk.specific, vec![0xAA, 0xBB]);
        assert_eq!(chunk.name(), "Button 1");
    }
}

#[test]
fn overlong_lengths_are_clamped() {
    let mut bytes = modern(6, &[0; 4], &[]);
    bytes[4..8].copy_from_slice(&1000u32.to_be_bytes());
    let chunk = MemberChunk::parse(&bytes, None).unwrap();
    assert_eq!(chunk.member_type, CastMemberType::Sound);
    assert_eq!(chunk.info.len(), 4);
    assert!(chunk.specific.is_empty());
}

#[test]
fn unknown_types_keep_the_modern_reading() {
    let chunk = MemberChunk::parse(&modern(77, &[], &[]), None).unwrap();
    assert_eq!(chunk.member_type, CastMemberType::Unknown);
    assert!(MemberChunk::parse(&[0, 0, 0, 1], None).is_none());
}

#[test]
fn name_falls_back_to_printable_scan() {
    assert_eq!(extract_name(&[0xFF, 0x00, 3, b'a', b'b', b'c']), "abc");
    assert_eq!(extract_name(&[2, 0x01, 0x02]), "");
    let mut info = vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x01];
    info.extend_from_slice(&[4, b'N', b'a', b'm', b'e']);
    assert_eq!(extract_name(&info), "Name");
}
