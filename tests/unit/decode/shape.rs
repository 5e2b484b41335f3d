use super::*;

const RECORD: [u8; RECORD_LEN] = [0, 1, 0, 10, 0, 20, 0, 110, 0, 220, 0, 0, 0xFF, 0, 1, 1, 0];

fn vintage() -> Vec<u8> {
    let mut b = vec![1 + 1 + RECORD_LEN as u8, SHAPE_TYPE, 0];
    b.extend_from_slice(&RECORD);
    b
}

fn modern_le(info: &[u8]) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(&8u32.to_le_bytes());
    b.extend_from_slice(&(info.len() as u32).to_le_bytes());
    b.extend_from_slice(&(RECORD_LEN as u32).to_le_bytes());
    b.extend_from_slice(info);
    b.extend_from_slice(&RECORD);
    b
}

fn transitional_be(info: &[u8]) -> Vec<u8> {
    let mut b = Vec::new();
    b.extend_from_slice(&(1 + 1 + RECORD_LEN as u16).to_be_bytes());
    b.extend_from_slice(&(info.len() as u32).to_be_bytes());
    b.push(SHAPE_TYPE);
    b.push(0);
    b.extend_from_slice(&RECORD);
    b.extend_from_slice(info);
    b
}

#[test]
fn headers_locate_the_record() {
    let cases = [
        (vintage(), ShapeLayout::Vintage, Endian::Big),
        (modern_le(b"info"), ShapeLayout::Modern, Endian::Little),
        (transitional_be(&[9; 10]), ShapeLayout::Transitional, Endian::Big),
    ];
    for (bytes, layout, endian) in cases {
        let found = locate(&bytes).unwrap();
        assert_eq!(found.layout, layout);
        assert_eq!(found.endian, endian);
        assert_eq!(found.record, RECORD);
    }
}

#[test]
fn declared_sizes_are_clamped_to_the_payload() {
    let mut vintage = vec![60, SHAPE_TYPE, 0];
    vintage.extend_from_slice(&RECORD);

    let mut modern = modern_le(b"info");
    modern[8..12].copy_from_slice(&400u32.to_le_bytes());

    let mut transitional = transitional_be(&[9; 10]);
    transitional[..2].copy_from_slice(&90u16.to_be_bytes());

    let cases = [
        (vintage, ShapeLayout::Vintage, Endian::Big),
        (modern, ShapeLayout::Modern, Endian::Little),
        (transitional, ShapeLayout::Transitional, Endian::Big),
    ];
    for (bytes, layout, endian) in cases {
        let found = locate(&bytes).unwrap();
        assert_eq!(found.layout, layout);
        assert_eq!(found.endian, endian);
        assert_eq!(found.record, RECORD);
    }
}

#[test]
fn exact_headers_beat_clamped_ones() {
    let mut bytes = vec![19, 0, 0, 0, 0, 0, SHAPE_TYPE, 0];
    bytes.extend_from_slice(&RECORD);
    let found = locate(&bytes).unwrap();
    assert_eq!(found.layout, ShapeLayout::Transitional);
    assert_eq!(found.endian, Endian::Little);
}

#[test]
fn record_accessors() {
    let shape = ShapeRecord::decode(4, &transitional_be(&[]), Some(DirectorVersion::D4)).unwrap();
    assert_eq!(shape.resource_id, 4);
    assert_eq!(shape.kind, ShapeKind::UnsignedColors);
    assert_eq!(shape.geometry(), ShapeGeometry::Rect);
    assert_eq!(shape.rect(), (10, 20, 110, 220));
    assert_eq!(shape.pattern(), 0);
    assert_eq!(shape.fore_color(), 255);
    assert_eq!(shape.back_color(), 0);
    assert!(shape.filled());
    assert_eq!(shape.line_thickness(), 1);
    assert_eq!(shape.line_direction(), 0);
}

#[test]
fn colour_signedness_follows_version() {
    let bytes = vintage();
    let unknown = ShapeRecord::decode(1, &bytes, None).unwrap();
    assert_eq!(unknown.kind, ShapeKind::SignedColors);
    assert_eq!(unknown.fore_color(), -1);

    let d5 = ShapeRecord::decode(1, &bytes, Some(DirectorVersion::D5)).unwrap();
    assert_eq!(d5.kind, ShapeKind::UnsignedColors);
    assert_eq!(d5.fore_color(), 255);

    let modern = ShapeRecord::decode(1, &modern_le(&[]), Some(DirectorVersion::D3)).unwrap();
    assert_eq!(modern.kind, ShapeKind::SignedColors);
}

#[test]
fn scoring_window_finds_a_misframed_record() {
    let mut bytes = vec![5, SHAPE_TYPE, 0, 0, 0, 0, 0, 0];
    bytes.extend_from_slice(&RECORD);
    let found = locate(&bytes).unwrap();
    assert_eq!(found.layout, ShapeLayout::Scored);
    assert_eq!(found.record, RECORD);
}

#[test]
fn hopeless_windows_fall_back_to_the_tail() {
    let mut bytes = vec![3, SHAPE_TYPE];
    bytes.extend_from_slice(&[0xFF; 20]);
    let found = locate(&bytes).unwrap();
    assert_eq!(found.layout, ShapeLayout::Scored);
    assert_eq!(found.record, [0xFF; RECORD_LEN]);
}

#[test]
fn payloads_without_a_shape_are_ignored() {
    assert!(locate(&[0; 40]).is_none());
    assert!(locate(&[0, SHAPE_TYPE, 1]).is_none());
    assert!(ShapeRecord::decode(1, &[], None).is_none());
}

#[test]
fn decoding_is_repeatable() {
    let mut scored = vec![5, SHAPE_TYPE, 0, 0, 0, 0, 0, 0];
    scored.extend_from_slice(&RECORD);
    for bytes in [scored, modern_le(b"info"), vintage()] {
        let first = ShapeRecord::decode(3, &bytes, None).unwrap();
        assert_eq!(Some(first), ShapeRecord::decode(3, &bytes, None));
    }
}
