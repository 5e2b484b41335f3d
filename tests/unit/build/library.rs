use super::*;
use crate::{
    container::keys::parse_key_table,
    decode::member::{MemberChunk, extract_name},
};

fn names(files: &[ResourceFile]) -> Vec<&str> {
    files.iter().map(|f| f.name.as_str()).collect()
}

#[test]
fn key_table_parses_back_in_both_orders() {
    let links = [
        ResourceKeyLink {
            child_id: 4,
            parent_id: 3,
            tag: Tag::BITD,
        },
        ResourceKeyLink {
            child_id: 5,
            parent_id: 3,
            tag: Tag::THUM,
        },
    ];
    for endian in [Endian::Big, Endian::Little] {
        let bytes = key_table(endian, &links).unwrap();
        assert_eq!(parse_key_table(&bytes, endian).unwrap(), links);
    }
    let bad = ResourceKeyLink {
        child_id: 0,
        parent_id: 3,
        tag: Tag::BITD,
    };
    assert!(key_table(Endian::Big, &[bad]).is_err());
}

#[test]
fn cast_table_rejects_negative_ids() {
    assert_eq!(cast_table(&[3, 0]).unwrap(), vec![0, 0, 0, 3, 0, 0, 0, 0]);
    assert!(cast_table(&[-1]).is_err());
}

#[test]
fn member_metadata_carries_the_name() {
    let bytes = cast_member_metadata(CastMemberType::Bitmap, "Logo", &[]).unwrap();
    let chunk = MemberChunk::parse(&bytes, None).unwrap();
    assert_eq!(chunk.member_type, CastMemberType::Bitmap);
    assert_eq!(chunk.name(), "Logo");
    assert_eq!(extract_name(&name_info("x").unwrap()), "x");
    assert!(name_info(&"n".repeat(256)).is_err());
    assert!(name_info("\u{263A}").is_err());
}

#[test]
fn bitmap_library_links_children_in_priority_order() {
    let payloads = BitmapPayloads {
        bitd: Some(vec![1; 8]),
        thumbnail: Some(vec![2; 4]),
        media: Some(vec![3; 4]),
        ..BitmapPayloads::default()
    };
    let files = bitmap_library(Endian::Little, "pic", payloads).unwrap();
    assert_eq!(
        names(&files),
        [
            "KEY*_0001.bin",
            "CAS*_0002.bin",
            "CASt_0003.bin",
            "ediM_0004.bin",
            "BITD_0005.bin",
            "Thum_0006.bin"
        ]
    );
    let links = parse_key_table(&files[0].bytes, Endian::Little).unwrap();
    assert_eq!(links.len(), 3);
    assert!(links.iter().all(|l| l.parent_id == MEMBER_ID));
    assert_eq!(links[1].tag, Tag::BITD);

    assert!(bitmap_library(Endian::Little, "none", BitmapPayloads::default()).is_err());
}

#[test]
fn sound_library_checks_its_tag() {
    let files = sound_library(Endian::Big, "beep", Tag::SNDS, b"RIFF".to_vec()).unwrap();
    assert_eq!(files[3].name, "sndS_0004.bin");
    assert!(sound_library(Endian::Big, "beep", Tag::BITD, vec![1]).is_err());
    assert!(sound_library(Endian::Big, "beep", Tag::SNDS, Vec::new()).is_err());
}
