use super::*;

fn entry(tag: Tag, size: u32) -> ResourceEntry {
    ResourceEntry {
        id: 7,
        tag,
        size,
        storage: Storage::Classic { offset: 100 },
        flags: 0,
        attributes: 0,
        next_free: -1,
    }
}

#[test]
fn free_and_empty_entries_are_not_exportable() {
    assert!(entry(Tag::BITD, 10).is_exportable());
    assert!(!entry(Tag::FREE, 10).is_exportable());
    assert!(!entry(Tag::BITD, 0).is_exportable());
}

#[test]
fn file_names_pad_ids_and_keep_tag_padding() {
    assert_eq!(entry(Tag::DIB, 1).file_name("bin"), "DIB _0007.bin");
    assert_eq!(entry(Tag::CAST_MEMBER, 1).file_name("bin"), "CASt_0007.bin");
}

#[test]
fn descriptors_resolve_by_guid_then_name() {
    let mut guid = [0u8; 16];
    guid[..4].copy_from_slice(&[0xAC, 0x99, 0xE9, 0x04]);
    assert_eq!(
        CompressionDescriptor::new(0, guid, "whatever").kind,
        CompressionKind::Zlib
    );
    assert_eq!(
        CompressionDescriptor::new(1, [0; 16], "NULL Compression").kind,
        CompressionKind::Passthrough
    );
    assert_eq!(
        CompressionDescriptor::new(2, [0; 16], "Sound Compression").kind,
        CompressionKind::Unknown
    );
}
