//! Shape cast members.
//!
//! A shape is a fixed 17-byte record embedded in a `CASt` chunk. Three header generations
//! wrap it, each readable in either byte order:
//!
//! - vintage: u8 entry size, u8 type, then the entry (record last)
//! - transitional: u16 specific size, u32 info size, u8 type, specific (record last), info
//! - modern: u32 type, u32 info size, u32 specific size, info, specific (record first)
//!
//! Declared sizes are clamped to the bytes present, so truncated payloads still parse.
//! Payloads that declare a shape but fit none of these are searched with a scoring window.
use crate::{
    foundation::version::DirectorVersion,
    io::reader::{Endian, u16_at, u32_at},
};

/// Size of a shape record.
pub const RECORD_LEN: usize = 17;
/// Member type code of a shape.
pub const SHAPE_TYPE: u8 = 8;

const VINTAGE_HEADER: usize = 2;
const TRANSITIONAL_HEADER: usize = 7;
const MODERN_HEADER: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Header generation wrapping a shape record.
pub enum ShapeLayout {
    /// 1-byte entry size header (Director 2 and 3).
    Vintage,
    /// 7-byte header (Director 4).
    Transitional,
    /// 12-byte header (Director 5 and later).
    Modern,
    /// No header parsed; record picked by the scoring window.
    Scored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// How the colour bytes of a record are interpreted.
pub enum ShapeKind {
    /// Undetermined.
    Unknown,
    /// Colour bytes are signed palette offsets.
    SignedColors,
    /// Colour bytes are unsigned palette indices.
    UnsignedColors,
}

impl ShapeKind {
    /// Kind implied by the header generation alone.
    pub fn from_layout(layout: ShapeLayout) -> Self {
        match layout {
            ShapeLayout::Vintage => Self::SignedColors,
            ShapeLayout::Transitional | ShapeLayout::Modern => Self::UnsignedColors,
            ShapeLayout::Scored => Self::Unknown,
        }
    }

    /// Final kind once the authoring version is known; an unknown version keeps `self`.
    pub fn resolve(self, version: Option<DirectorVersion>) -> Self {
        match version {
            Some(v) if v.uses_signed_shape_colors() => Self::SignedColors,
            Some(_) => Self::UnsignedColors,
            None => self,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Geometry stored in the record's first field.
pub enum ShapeGeometry {
    /// Unrecognised value.
    Unknown,
    /// Rectangle.
    Rect,
    /// Rounded rectangle.
    RoundRect,
    /// Oval.
    Oval,
    /// Line.
    Line,
}

impl ShapeGeometry {
    /// Map a stored geometry value.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::Rect,
            2 => Self::RoundRect,
            3 => Self::Oval,
            4 => Self::Line,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A 17-byte record located inside a payload.
pub struct LocatedRecord {
    /// Header generation that located the record.
    pub layout: ShapeLayout,
    /// Byte order of the header (and of the record's multi-byte fields).
    pub endian: Endian,
    /// The record bytes.
    pub record: [u8; RECORD_LEN],
}

/// Record offset, and whether the declared sizes fit without clamping.
type HeaderParser = fn(&[u8], Endian) -> Option<(usize, bool)>;

static HEADER_PARSERS: [(HeaderParser, ShapeLayout); 3] = [
    (modern_offset, ShapeLayout::Modern),
    (transitional_offset, ShapeLayout::Transitional),
    (vintage_offset, ShapeLayout::Vintage),
];

fn modern_offset(b: &[u8], e: Endian) -> Option<(usize, bool)> {
    if u32_at(b, 0, e)? != u32::from(SHAPE_TYPE) {
        return None;
    }
    let info_len = u32_at(b, 4, e)? as usize;
    let specific_len = u32_at(b, 8, e)? as usize;
    let start = MODERN_HEADER.checked_add(info_len)?;
    let available = b.len().checked_sub(start)?;
    (specific_len.min(available) >= RECORD_LEN).then_some((start, specific_len <= available))
}

fn transitional_offset(b: &[u8], e: Endian) -> Option<(usize, bool)> {
    let declared = usize::from(u16_at(b, 0, e)?).checked_sub(1)?;
    let info_len = u32_at(b, 2, e)? as usize;
    if *b.get(6)? != SHAPE_TYPE {
        return None;
    }
    // The info block trails the specific area; a short payload truncates the latter.
    let available = b
        .len()
        .checked_sub(TRANSITIONAL_HEADER)?
        .checked_sub(info_len)?;
    let area = declared.min(available);
    (area >= RECORD_LEN).then(|| (TRANSITIONAL_HEADER + area - RECORD_LEN, declared <= available))
}

fn vintage_offset(b: &[u8], _: Endian) -> Option<(usize, bool)> {
    let entry = usize::from(*b.first()?);
    if *b.get(1)? != SHAPE_TYPE {
        return None;
    }
    let declared = entry.checked_sub(1)?;
    let available = b.len().checked_sub(VINTAGE_HEADER)?;
    let area = declared.min(available);
    (area >= RECORD_LEN).then(|| (VINTAGE_HEADER + area - RECORD_LEN, declared <= available))
}

fn record_at(b: &[u8], offset: usize) -> Option<[u8; RECORD_LEN]> {
    b.get(offset..offset.checked_add(RECORD_LEN)?)?.try_into().ok()
}

/// Whether any header position declares the shape member type.
fn declares_shape(b: &[u8]) -> bool {
    b.get(1) == Some(&SHAPE_TYPE)
        || b.get(6) == Some(&SHAPE_TYPE)
        || [Endian::Big, Endian::Little]
            .into_iter()
            .any(|e| u32_at(b, 0, e) == Some(u32::from(SHAPE_TYPE)))
}

/// Plausibility score of a 17-byte window in one byte order.
fn score_window(w: &[u8], e: Endian) -> i32 {
    let field = |off| u16_at(w, off, e).map(|v| v as i16).unwrap_or(0);
    let (top, left, bottom, right) = (field(2), field(4), field(6), field(8));
    let mut score = if bottom >= top && right >= left { 4 } else { -4 };
    if bottom > top || right > left {
        score += 1;
    }
    let geometry = u16_at(w, 0, e).map(ShapeGeometry::from_code);
    score += if geometry == Some(ShapeGeometry::Unknown) { -2 } else { 2 };
    score += if w[14] <= 1 { 1 } else { -1 };
    score += if w[15] <= 16 { 1 } else { -1 };
    score += if w[16] <= 8 { 1 } else { -1 };
    score
}

/// Highest-scoring 17-byte window, or the last 17 bytes when every window scores negative.
fn best_window(b: &[u8]) -> Option<LocatedRecord> {
    let last = b.len().checked_sub(RECORD_LEN)?;
    let mut best: Option<(i32, usize, Endian)> = None;
    for offset in 0..=last {
        for e in [Endian::Big, Endian::Little] {
            let score = score_window(&b[offset..offset + RECORD_LEN], e);
            if best.is_none_or(|(s, _, _)| score > s) {
                best = Some((score, offset, e));
            }
        }
    }
    let (offset, endian) = match best {
        Some((score, offset, e)) if score >= 0 => (offset, e),
        _ => (last, Endian::Big),
    };
    Some(LocatedRecord {
        layout: ShapeLayout::Scored,
        endian,
        record: record_at(b, offset)?,
    })
}

/// Locate the shape record in a `CASt` payload.
///
/// Headers are tried big-endian first, modern before transitional before vintage. A header
/// whose declared sizes fit the payload wins over one that only parses once clamped. When no
/// header parses but one declares the shape type, the scoring window is used.
pub fn locate(bytes: &[u8]) -> Option<LocatedRecord> {
    let headers = || {
        [Endian::Big, Endian::Little]
            .into_iter()
            .flat_map(|e| HEADER_PARSERS.iter().map(move |(parse, layout)| (*parse, *layout, e)))
            .filter_map(|(parse, layout, endian)| {
                let (offset, fits) = parse(bytes, endian)?;
                let record = record_at(bytes, offset)?;
                Some((
                    fits,
                    LocatedRecord {
                        layout,
                        endian,
                        record,
                    },
                ))
            })
    };
    headers()
        .find(|(fits, _)| *fits)
        .or_else(|| headers().next())
        .map(|(_, located)| located)
        .or_else(|| declares_shape(bytes).then(|| best_window(bytes)).flatten())
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// A decoded shape member.
pub struct ShapeRecord {
    /// Id of the `CASt` resource.
    pub resource_id: i32,
    /// Header generation the record was found with.
    pub layout: ShapeLayout,
    /// Colour interpretation.
    pub kind: ShapeKind,
    /// Byte order of the record's multi-byte fields.
    #[serde(skip)]
    pub endian: Endian,
    /// The 17 record bytes.
    #[serde(skip)]
    pub record: [u8; RECORD_LEN],
}

impl ShapeRecord {
    /// Decode a `CASt` payload. Payloads without a recognisable shape yield `None`.
    pub fn decode(resource_id: i32, bytes: &[u8], version: Option<DirectorVersion>) -> Option<Self> {
        let located = locate(bytes)?;
        Some(Self {
            resource_id,
            layout: located.layout,
            kind: ShapeKind::from_layout(located.layout).resolve(version),
            endian: located.endian,
            record: located.record,
        })
    }

    fn u16(&self, offset: usize) -> u16 {
        u16_at(&self.record, offset, self.endian).unwrap_or(0)
    }

    fn color(&self, offset: usize) -> i16 {
        let b = self.record[offset];
        match self.kind {
            ShapeKind::SignedColors => i16::from(b as i8),
            _ => i16::from(b),
        }
    }

    /// Geometry.
    pub fn geometry(&self) -> ShapeGeometry {
        ShapeGeometry::from_code(self.u16(0))
    }

    /// Bounding rectangle as `(top, left, bottom, right)`.
    pub fn rect(&self) -> (i16, i16, i16, i16) {
        let f = |off| self.u16(off) as i16;
        (f(2), f(4), f(6), f(8))
    }

    /// Fill pattern id.
    pub fn pattern(&self) -> u16 {
        self.u16(10)
    }

    /// Foreground colour, signed or unsigned per [`ShapeKind`].
    pub fn fore_color(&self) -> i16 {
        self.color(12)
    }

    /// Background colour, signed or unsigned per [`ShapeKind`].
    pub fn back_color(&self) -> i16 {
        self.color(13)
    }

    /// Whether the shape is filled.
    pub fn filled(&self) -> bool {
        self.record[14] != 0
    }

    /// Pen thickness.
    pub fn line_thickness(&self) -> u8 {
        self.record[15]
    }

    /// Pattern direction.
    pub fn line_direction(&self) -> u8 {
        self.record[16]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/decode/shape.rs"]
mod tests;
