use super::*;
use crate::io::writer::ByteWriter;

fn pointer_info(number: i32, legacy_id: u32, text: &str, name: &str) -> Vec<u8> {
    let mut info = vec![0u8; INFO_POINTER_TEXT_START];
    info[INFO_RESOURCE_ID..INFO_RESOURCE_ID + 4].copy_from_slice(&legacy_id.to_be_bytes());
    info[INFO_SCRIPT_NUMBER..INFO_SCRIPT_NUMBER + 4].copy_from_slice(&number.to_be_bytes());
    info[INFO_TEXT_LENGTH..INFO_TEXT_LENGTH + 4]
        .copy_from_slice(&(text.len() as u32).to_le_bytes());
    info[INFO_POINTER_SLOT..INFO_POINTER_SLOT + 2]
        .copy_from_slice(&(INFO_POINTER_TEXT_START as u16).to_be_bytes());
    info.extend_from_slice(text.as_bytes());
    info.push(name.len() as u8);
    info.extend_from_slice(name.as_bytes());
    info
}

fn cast_member(info: &[u8], specific: &[u8]) -> Vec<u8> {
    let mut w = ByteWriter::big();
    w.write_u32(11);
    w.write_u32(info.len() as u32);
    w.write_u32(specific.len() as u32);
    w.write_bytes(info);
    w.write_bytes(specific);
    w.into_bytes()
}

fn context(ids: &[u32]) -> Vec<u8> {
    let mut w = ByteWriter::big();
    w.write_u32(0);
    w.write_u32(0);
    w.write_u32(ids.len() as u32);
    w.write_u32(ids.len() as u32);
    w.write_u16(0x2A);
    while w.len() < 0x2A {
        w.write_u8(0);
    }
    for id in ids {
        w.write_u32(0);
        w.write_u32(*id);
        w.write_u32(0);
    }
    w.into_bytes()
}

#[test]
fn selector_in_either_byte() {
    assert_eq!(detect_kind(&[0, 1]), ScriptKind::Behavior);
    assert_eq!(detect_kind(&[3, 0]), ScriptKind::Movie);
    assert_eq!(detect_kind(&[7, 7]), ScriptKind::Parent);
    assert_eq!(detect_kind(&[7]), ScriptKind::Parent);
    assert_eq!(detect_kind(&[9, 3]), ScriptKind::Movie);
    assert_eq!(detect_kind(&[]), ScriptKind::Unknown);
    assert_eq!(detect_kind(&[0, 0]), ScriptKind::Unknown);
}

#[test]
fn pointer_layout_text_and_name() {
    let info = pointer_info(2, 0, "on mouseUp\rbeep\rend", "Clicker");
    let src = read_source(&info, Some(DirectorVersion::D8_5));
    assert_eq!(src.layout, Some(InfoLayout::PointerTable));
    assert_eq!(src.text, "on mouseUp\rbeep\rend");
    assert_eq!(src.name, "Clicker");
    assert_eq!(script_number(&info), Some(2));
}

#[test]
fn legacy_layout_text() {
    let text = "on startMovie";
    let mut info = vec![0u8; INFO_LEGACY_TEXT_START];
    info[INFO_TEXT_LENGTH..INFO_TEXT_LENGTH + 4]
        .copy_from_slice(&(text.len() as u32).to_le_bytes());
    info.extend_from_slice(text.as_bytes());
    info.push(4);
    info.extend_from_slice(b"Main");

    let src = read_source(&info, Some(DirectorVersion::D4));
    assert_eq!(src.layout, Some(InfoLayout::Legacy));
    assert_eq!(src.text, text);
    assert_eq!(src.name, "Main");
}

#[test]
fn short_info_has_no_text() {
    assert_eq!(read_source(&[0; 8], None), ScriptSource::default());
    assert_eq!(script_number(&[0; 8]), None);
}

#[test]
fn context_table_lists_ids_in_order() {
    assert_eq!(read_context_table(&context(&[107, 108])), vec![107, 108]);
    assert!(read_context_table(&[0; 4]).is_empty());
    let mut truncated = context(&[5, 6]);
    truncated.truncate(truncated.len() - 6);
    assert_eq!(read_context_table(&truncated), vec![5]);
}

#[test]
fn context_wins_over_stale_info_id() {
    let bytes = cast_member(&pointer_info(3, 42, "", "s"), &[0, 3]);
    let desc = ScriptDescriptor::decode(20, &bytes, None).unwrap();
    assert_eq!(desc.kind, ScriptKind::Movie);
    assert_eq!(desc.script_number, Some(3));

    let live = [42, 107];
    let exists = |id| live.contains(&id);
    assert_eq!(desc.resolve_bytecode_id(&[100, 101, 107], exists), Some(107));
    // Context entry points nowhere: fall back to the info id.
    assert_eq!(desc.resolve_bytecode_id(&[100, 101, 999], exists), Some(42));
    assert_eq!(desc.resolve_bytecode_id(&[], |_| false), None);
}

#[test]
fn little_endian_info_id_fallback() {
    let bytes = cast_member(&pointer_info(0, 9u32.swap_bytes(), "", ""), &[1, 0]);
    let desc = ScriptDescriptor::decode(1, &bytes, None).unwrap();
    assert_eq!(desc.script_number, None);
    assert_eq!(desc.resolve_bytecode_id(&[], |id| id == 9), Some(9));
}

#[test]
fn non_script_members_are_skipped() {
    let mut bytes = cast_member(&[], &[]);
    bytes[3] = 1;
    assert!(ScriptDescriptor::decode(1, &bytes, None).is_none());
}

#[test]
fn decoding_is_repeatable() {
    let pointer = cast_member(&pointer_info(2, 0, "on mouseUp\rend", "Clicker"), &[0, 1]);
    let fallback = cast_member(&pointer_info(0, 9u32.swap_bytes(), "", ""), &[1, 0]);
    for (bytes, version) in [
        (pointer, Some(DirectorVersion::D8_5)),
        (fallback, None),
    ] {
        let first = ScriptDescriptor::decode(1, &bytes, version).unwrap();
        let second = ScriptDescriptor::decode(1, &bytes, version).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.resolve_bytecode_id(&[], |id| id == 9),
            second.resolve_bytecode_id(&[], |id| id == 9)
        );
    }
}
