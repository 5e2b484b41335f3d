use super::*;

#[test]
fn archive_words_map_to_generations() {
    let cases = [
        (0u32, 4u16),
        (0x4C1, 5),
        (0x4C7, 6),
        (0x57E, 7),
        (0x708, 8),
        (0x742, 10),
        (0x782, 11),
        (0x79F, 12),
    ];
    for (word, major) in cases {
        assert_eq!(
            DirectorVersion::from_archive_version(word).major(),
            major,
            "word {word:#x}"
        );
    }
    assert_eq!(DirectorVersion::from_archive_version(0x200), DirectorVersion::D3);
}

#[test]
fn writer_markers_read_back_to_the_same_generation() {
    for v in [
        DirectorVersion::D4,
        DirectorVersion::D5,
        DirectorVersion::D6,
        DirectorVersion::D7,
        DirectorVersion::D8,
        DirectorVersion::D8_5,
        DirectorVersion::D10,
        DirectorVersion::D11,
        DirectorVersion::D11_5,
        DirectorVersion::D12,
    ] {
        assert_eq!(DirectorVersion::from_archive_version(v.archive_version()), v);
    }
}

#[test]
fn labels_use_major_number() {
    assert_eq!(DirectorVersion::D8_5.to_string(), "Director 8");
    assert_eq!(DirectorVersion::D10.to_string(), "Director 10");
}

#[test]
fn version_strings_parse_leading_number() {
    assert_eq!(
        DirectorVersion::from_version_string("8.5.1"),
        Some(DirectorVersion::D8_5)
    );
    assert_eq!(
        DirectorVersion::from_version_string("MX 10.1"),
        Some(DirectorVersion::D10)
    );
    assert_eq!(DirectorVersion::from_version_string("none"), None);
}

#[test]
fn predicates_split_at_expected_generations() {
    assert!(DirectorVersion::D3.uses_signed_shape_colors());
    assert!(!DirectorVersion::D4.uses_signed_shape_colors());
    assert!(!DirectorVersion::D4.uses_script_pointer_table());
    assert!(DirectorVersion::D5.uses_script_pointer_table());
    assert_eq!(DirectorVersion::D4.map_version(), 0);
    assert_eq!(DirectorVersion::D10.map_version(), 1);
}
