use super::*;

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(image::RgbaImage::new(w, h))
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn tags_decide_before_magic_numbers() {
    let png = png_bytes(1, 1);
    assert_eq!(detect(Tag::BITD, &png), BitmapKind::Bitd);
    assert_eq!(detect(Tag::ALFA, &[0; 4]), BitmapKind::AlphaMask);
    assert_eq!(detect(Tag::THUM, &[]), BitmapKind::Thumbnail);
    assert_eq!(detect(Tag::MEDI, &png), BitmapKind::Png);
}

#[test]
fn magic_numbers_in_order() {
    let cases: &[(&[u8], BitmapKind)] = &[
        (&[0xFF, 0xD8, 0xFF, 0xE0], BitmapKind::Jpeg),
        (b"GIF89a..", BitmapKind::Gif),
        (b"GIF87a", BitmapKind::Gif),
        (b"BM\0\0", BitmapKind::Bmp),
        (&[0x28, 0, 0, 0, 1], BitmapKind::Dib),
        (&[0x7C, 0, 0, 0], BitmapKind::Dib),
        (b"MM\0*", BitmapKind::Tiff),
        (b"II*\0", BitmapKind::Tiff),
        (b"GIF90a", BitmapKind::Unknown),
        (&[0x29, 0, 0, 0], BitmapKind::Unknown),
    ];
    for (bytes, kind) in cases {
        assert_eq!(detect(Tag::MEDI, bytes), *kind, "{bytes:?}");
    }
}

#[test]
fn detection_is_deterministic() {
    let bytes = png_bytes(2, 2);
    assert_eq!(
        BitmapRecord::decode(4, Tag::MEDI, bytes.clone()),
        BitmapRecord::decode(4, Tag::MEDI, bytes)
    );
}

#[test]
fn retention_rules() {
    assert!(should_retain(Tag::BITD, BitmapKind::Unknown));
    assert!(!should_retain(Tag::MEDI, BitmapKind::Unknown));
    assert!(!should_retain(Tag::parse("PNG ").unwrap(), BitmapKind::Unknown));
    assert!(should_retain(Tag::MEDI, BitmapKind::Dib));
    assert!(!should_retain(Tag::parse("BMP ").unwrap(), BitmapKind::Dib));
    assert!(!should_retain(Tag::BITD, BitmapKind::AlphaMask));
    assert!(should_retain(Tag::parse("JPG ").unwrap(), BitmapKind::Jpeg));
}

#[test]
fn inspectable_tags() {
    assert!(is_inspectable(Tag::PICT));
    assert!(is_inspectable(Tag::parse("jpeg").unwrap()));
    assert!(is_inspectable(Tag::parse("Tiff").unwrap()));
    assert!(!is_inspectable(Tag::STXT));
    assert!(!is_inspectable(Tag::CAST_MEMBER));
}

#[test]
fn records_carry_dimensions() {
    let rec = BitmapRecord::decode(9, Tag::MEDI, png_bytes(5, 3)).unwrap();
    assert_eq!(rec.kind, BitmapKind::Png);
    assert_eq!(rec.dimensions, Some((5, 3)));

    let mut dib = vec![0u8; 40];
    dib[0] = 0x28;
    dib[4..8].copy_from_slice(&16i32.to_le_bytes());
    dib[8..12].copy_from_slice(&(-8i32).to_le_bytes());
    let rec = BitmapRecord::decode(3, Tag::DIB, dib).unwrap();
    assert_eq!(rec.dimensions, Some((16, 8)));

    assert!(BitmapRecord::decode(1, Tag::BITD, Vec::new()).is_none());
    assert!(BitmapRecord::decode(1, Tag::MEDI, vec![1, 2, 3]).is_none());
}

#[test]
fn auxiliary_kinds() {
    assert!(BitmapKind::AlphaMask.is_auxiliary());
    assert!(BitmapKind::Thumbnail.is_auxiliary());
    assert!(!BitmapKind::Bitd.is_auxiliary());
    assert_eq!(BitmapKind::Jpeg.extension(), "jpg");
}
