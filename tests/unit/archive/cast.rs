use super::*;

#[test]
fn cast_table_reads_big_endian_ids() {
    assert_eq!(read_cast_table(&[0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 1, 0]), vec![3, 0, 256]);
    // A trailing partial id is ignored.
    assert_eq!(read_cast_table(&[0, 0, 0, 7, 0, 1]), vec![7]);
    assert!(read_cast_table(&[]).is_empty());
}

#[test]
fn new_member_has_no_payloads() {
    let m = CastMember::new(2, 9, CastMemberType::Shape, "box".into());
    assert_eq!(m.slot, 2);
    assert!(m.bitmap.is_none() && m.shape.is_none() && m.script.is_none());
}
