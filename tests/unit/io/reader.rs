use super::*;

#[test]
fn integers_follow_session_order() {
    let data = [0x12, 0x34, 0x56, 0x78];
    assert_eq!(ByteReader::big(&data).read_u32().unwrap(), 0x1234_5678);
    assert_eq!(
        ByteReader::new(&data, Endian::Little).read_u32().unwrap(),
        0x7856_3412
    );
    let mut r = ByteReader::new(&data, Endian::Little);
    assert_eq!(r.read_u16_be().unwrap(), 0x1234);
    assert_eq!(r.read_u16().unwrap(), 0x7856);
}

#[test]
fn overrun_reports_offset_and_need() {
    let data = [1u8, 2, 3];
    let mut r = ByteReader::big(&data);
    r.skip(2).unwrap();
    match r.read_u32() {
        Err(ArchiveError::UnexpectedEof { offset, need, have }) => {
            assert_eq!((offset, need, have), (2, 4, 1));
        }
        other => panic!("expected eof, got {other:?}"),
    }
    assert_eq!(r.position(), 2);
}

#[test]
fn clamped_reads_stop_at_end() {
    let data = [1u8, 2, 3];
    let mut r = ByteReader::big(&data);
    r.seek(1);
    assert_eq!(r.read_bytes_clamped(10), &[2, 3]);
    r.seek(9);
    assert!(r.read_bytes_clamped(4).is_empty());
}

#[test]
fn tags_reverse_in_little_endian_sessions() {
    let data = *b"tSAC";
    assert_eq!(
        ByteReader::new(&data, Endian::Little).read_tag().unwrap(),
        Tag::CAST_MEMBER
    );
    assert_eq!(ByteReader::big(&data).read_raw_tag().unwrap(), Tag(*b"tSAC"));
}

#[test]
fn varints_are_most_significant_first() {
    let data = [0x05, 0x81, 0x00, 0xFF, 0x7F];
    let mut r = ByteReader::big(&data);
    assert_eq!(r.read_varint().unwrap(), 5);
    assert_eq!(r.read_varint().unwrap(), 128);
    assert_eq!(r.read_varint().unwrap(), 0x3FFF);
}

#[test]
fn strings_decode_as_latin1() {
    let data = [b'h', 0xE9, 0, 3, b'a', b'b', b'c'];
    let mut r = ByteReader::big(&data);
    assert_eq!(r.read_cstring().unwrap(), "hé");
    assert_eq!(r.read_pascal_string().unwrap(), "abc");
    assert!(ByteReader::big(b"abc").read_cstring().is_err());
}

#[test]
fn absolute_helpers_return_none_past_end() {
    let data = [0, 0, 0, 7, 1];
    assert_eq!(be_u32_at(&data, 0), Some(7));
    assert_eq!(le_u32_at(&data, 1), Some(0x0107_0000));
    assert_eq!(be_u32_at(&data, 2), None);
    assert_eq!(be_u16_at(&data, usize::MAX), None);
    assert_eq!(u16_at(&data, 3, Endian::Little), Some(0x0107));
}
