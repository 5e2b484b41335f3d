use std::io::Cursor;

use crate::io::{reader::le_u32_at, tag::Tag};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Bitmap payload classification.
pub enum BitmapKind {
    /// Not recognised.
    Unknown,
    /// Run-length encoded pixel data (`BITD`).
    Bitd,
    /// Windows device-independent bitmap.
    Dib,
    /// QuickDraw picture.
    Pict,
    /// Alpha channel mask (`ALFA`).
    AlphaMask,
    /// Cast thumbnail (`Thum`).
    Thumbnail,
    /// PNG stream.
    Png,
    /// JPEG stream.
    Jpeg,
    /// GIF stream.
    Gif,
    /// BMP file with its `BM` header.
    Bmp,
    /// TIFF stream.
    Tiff,
}

impl BitmapKind {
    /// Whether the kind is an auxiliary image rather than a member's main picture.
    pub fn is_auxiliary(self) -> bool {
        matches!(self, Self::AlphaMask | Self::Thumbnail)
    }

    /// File extension used when exporting this kind.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Bmp | Self::Dib => "bmp",
            Self::Tiff => "tif",
            Self::Pict => "pict",
            _ => "bin",
        }
    }
}

/// Child tags tried in order when resolving a composite record's bitmap.
pub const CHILD_PRIORITY: [Tag; 6] = [
    Tag::MEDI,
    Tag::BITD,
    Tag::DIB,
    Tag::PICT,
    Tag::ALFA,
    Tag::THUM,
];

/// Tags whose payload kind is implied without sniffing.
const TAG_KINDS: [(Tag, BitmapKind); 5] = [
    (Tag::BITD, BitmapKind::Bitd),
    (Tag::DIB, BitmapKind::Dib),
    (Tag::PICT, BitmapKind::Pict),
    (Tag::ALFA, BitmapKind::AlphaMask),
    (Tag::THUM, BitmapKind::Thumbnail),
];

/// Header size words of the known DIB header revisions.
const DIB_HEADER_SIZES: [u32; 5] = [0x0C, 0x28, 0x40, 0x6C, 0x7C];

type Sniffer = fn(&[u8]) -> bool;

/// Magic-number checks, first match wins.
const SNIFFERS: [(Sniffer, BitmapKind); 6] = [
    (is_png, BitmapKind::Png),
    (is_jpeg, BitmapKind::Jpeg),
    (is_gif, BitmapKind::Gif),
    (is_bmp, BitmapKind::Bmp),
    (is_dib, BitmapKind::Dib),
    (is_tiff, BitmapKind::Tiff),
];

/// Tag name prefixes of resources stored as plain image files.
const FILE_TAG_PREFIXES: [&str; 7] = ["PNG", "JPG", "JPEG", "JFIF", "GIF", "BMP", "TIF"];

fn is_png(b: &[u8]) -> bool {
    b.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
}

fn is_jpeg(b: &[u8]) -> bool {
    b.starts_with(&[0xFF, 0xD8, 0xFF])
}

fn is_gif(b: &[u8]) -> bool {
    b.starts_with(b"GIF87a") || b.starts_with(b"GIF89a")
}

fn is_bmp(b: &[u8]) -> bool {
    b.starts_with(b"BM")
}

fn is_dib(b: &[u8]) -> bool {
    le_u32_at(b, 0).is_some_and(|size| DIB_HEADER_SIZES.contains(&size))
}

fn is_tiff(b: &[u8]) -> bool {
    b.len() >= 4 && (b.starts_with(b"MM\0*") || b.starts_with(b"II*\0"))
}

/// Classify a payload: its tag first, then magic numbers.
pub fn detect(tag: Tag, bytes: &[u8]) -> BitmapKind {
    if let Some((_, kind)) = TAG_KINDS.iter().find(|(t, _)| *t == tag) {
        return *kind;
    }
    SNIFFERS
        .iter()
        .find(|(sniff, _)| sniff(bytes))
        .map(|(_, kind)| *kind)
        .unwrap_or(BitmapKind::Unknown)
}

/// Whether a canonical bitmap tag.
pub fn is_canonical(tag: Tag) -> bool {
    CHILD_PRIORITY.contains(&tag)
}

/// Whether resources with this tag may hold bitmap data at all.
pub fn is_inspectable(tag: Tag) -> bool {
    is_canonical(tag) || FILE_TAG_PREFIXES.iter().any(|p| tag.starts_with_ignore_case(p))
}

/// Whether a classified payload is kept as a bitmap record.
///
/// Sniffed DIB and PICT payloads only count under their own tag or authoring metadata, and
/// masks and thumbnails only under their own tag.
pub fn should_retain(tag: Tag, kind: BitmapKind) -> bool {
    match kind {
        BitmapKind::Unknown => tag != Tag::MEDI && is_canonical(tag),
        BitmapKind::Dib => tag == Tag::DIB || tag == Tag::MEDI,
        BitmapKind::Pict => tag == Tag::PICT || tag == Tag::MEDI,
        BitmapKind::AlphaMask => tag == Tag::ALFA,
        BitmapKind::Thumbnail => tag == Tag::THUM,
        _ => true,
    }
}

/// Pixel dimensions, when the payload carries a readable header.
pub fn dimensions(kind: BitmapKind, bytes: &[u8]) -> Option<(u32, u32)> {
    match kind {
        BitmapKind::Png
        | BitmapKind::Jpeg
        | BitmapKind::Gif
        | BitmapKind::Bmp
        | BitmapKind::Tiff => image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok(),
        BitmapKind::Dib => dib_dimensions(bytes),
        _ => None,
    }
}

fn dib_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    let size = le_u32_at(bytes, 0)?;
    if size == 0x0C {
        let w = u16::from_le_bytes([*bytes.get(4)?, *bytes.get(5)?]);
        let h = u16::from_le_bytes([*bytes.get(6)?, *bytes.get(7)?]);
        return Some((u32::from(w), u32::from(h)));
    }
    let w = le_u32_at(bytes, 4)? as i32;
    let h = le_u32_at(bytes, 8)? as i32;
    Some((w.unsigned_abs(), h.unsigned_abs()))
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Classified bitmap payload.
pub struct BitmapRecord {
    /// Id of the resource holding the pixels.
    pub resource_id: i32,
    /// Tag the payload was stored under.
    pub tag: Tag,
    /// Payload classification.
    pub kind: BitmapKind,
    /// Pixel size, when known.
    pub dimensions: Option<(u32, u32)>,
    /// Raw payload.
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl BitmapRecord {
    /// Classify a payload, returning `None` when it is empty or not retained as a bitmap.
    pub fn decode(resource_id: i32, tag: Tag, bytes: Vec<u8>) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        let kind = detect(tag, &bytes);
        if !should_retain(tag, kind) {
            return None;
        }
        Some(Self {
            resource_id,
            tag,
            kind,
            dimensions: dimensions(kind, &bytes),
            bytes,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/decode/bitmap.rs"]
mod tests;
