//! Styled text (`XMED`) scanner.
//!
//! The payload mixes a fixed little-endian header with ASCII-encoded records. The header
//! supplies defaults; a sequential scan then picks up font declarations (`40,` + colour byte
//! + name), 20-digit style records and `<len>,<text>` runs.
use crate::{
    decode::markup::{Alignment, Span},
    io::reader::{latin1, le_u32_at},
};

const OFF_WIDTH: usize = 0x18;
const OFF_STYLE: usize = 0x1C;
const OFF_ALIGN: usize = 0x1D;
const OFF_LINE_SPACING: usize = 0x3C;
const OFF_FONT_SIZE: usize = 0x40;
const OFF_TEXT_LENGTH: usize = 0x4C;
/// The alignment marker is only searched for near the header.
const ALIGN_MARKER_WINDOW: usize = 0x200;
/// Digits in a style descriptor or map entry: five 4-digit groups.
const STYLE_RECORD_DIGITS: usize = 20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Character style bits of a style record.
pub struct StyleFlags {
    /// Bit 0.
    pub bold: bool,
    /// Bit 1.
    pub italic: bool,
    /// Bit 2.
    pub underline: bool,
    /// Bit 3.
    pub strikeout: bool,
    /// Bit 4.
    pub subscript: bool,
    /// Bit 5.
    pub superscript: bool,
    /// Bit 6.
    pub tabbed: bool,
    /// Bit 7.
    pub editable: bool,
}

impl StyleFlags {
    /// Decode a style byte.
    pub fn from_byte(b: u8) -> Self {
        Self {
            bold: b & 0x01 != 0,
            italic: b & 0x02 != 0,
            underline: b & 0x04 != 0,
            strikeout: b & 0x08 != 0,
            subscript: b & 0x10 != 0,
            superscript: b & 0x20 != 0,
            tabbed: b & 0x40 != 0,
            editable: b & 0x80 != 0,
        }
    }
}

/// Alignment from the low two bits of an alignment byte.
fn alignment_from_bits(b: u8) -> Alignment {
    match b & 0x03 {
        0x01 => Alignment::Right,
        0x02 => Alignment::Left,
        0x03 => Alignment::Justify,
        _ => Alignment::Center,
    }
}

/// Alignment from a full alignment code; unlisted codes fall back to the low bits.
pub fn decode_alignment(b: u8) -> Alignment {
    match b {
        0x1A | 0x3B => Alignment::Left,
        0x15 | 0x77 => Alignment::Right,
        0x3F | 0x18 => Alignment::Center,
        _ => alignment_from_bits(b),
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// A declared text style.
pub struct XmedStyle {
    /// Style id (first digit group of a descriptor record).
    pub style_id: u16,
    /// Base style id.
    pub base_style_id: u16,
    /// Length of text using this style.
    pub text_length: u16,
    /// Font family.
    pub font_name: String,
    /// Palette index of the foreground colour.
    pub color_index: u8,
    /// Point size.
    pub font_size: u16,
    /// Character style.
    pub flags: StyleFlags,
    /// Paragraph alignment.
    pub alignment: Alignment,
    /// Word wrap disabled.
    pub wrap_off: bool,
    /// Tab stops present.
    pub has_tabs: bool,
}

impl XmedStyle {
    fn apply_alignment_byte(&mut self, b: u8) {
        self.wrap_off = b & 0x08 != 0;
        self.has_tabs = b & 0x10 != 0;
        self.alignment = decode_alignment(b);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Style-map record: five four-digit groups.
pub struct XmedMapEntry {
    /// Style id.
    pub style_id: u16,
    /// Second group, meaning unknown.
    pub f2: u16,
    /// Text length covered.
    pub text_length: u16,
    /// Fourth group, meaning unknown.
    pub f4: u16,
    /// Base style id.
    pub base_style_id: u16,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// A run of text with its resolved style.
pub struct XmedRun {
    /// Character offset in the document text.
    pub start: usize,
    /// Run text.
    pub text: String,
    /// Font family, empty when no style was active.
    pub font_name: String,
    /// Point size.
    pub font_size: u16,
    /// Palette index of the foreground colour, when a style was active.
    pub color_index: Option<u8>,
    /// Character style.
    pub flags: StyleFlags,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Decoded styled text.
pub struct XmedDocument {
    /// Concatenated run text.
    pub text: String,
    /// Text runs in order.
    pub runs: Vec<XmedRun>,
    /// Declared styles; the first is the header default.
    pub styles: Vec<XmedStyle>,
    /// Style-map records.
    pub map_entries: Vec<XmedMapEntry>,
    /// Box width.
    pub width: u32,
    /// Line spacing.
    pub line_spacing: u32,
    /// Declared text length.
    pub text_length: u32,
}

impl XmedDocument {
    /// Paragraph alignment from the header style.
    pub fn alignment(&self) -> Alignment {
        self.styles.first().map(|s| s.alignment).unwrap_or_default()
    }

    /// Runs as markup spans; palette indices map to grey levels.
    pub fn spans(&self) -> Vec<Span> {
        let align = self.alignment();
        self.runs
            .iter()
            .map(|run| Span {
                text: run.text.clone(),
                font: (!run.font_name.is_empty()).then(|| run.font_name.clone()),
                size: (run.font_size > 0).then_some(run.font_size),
                color: run.color_index.map(|c| [c, c, c]),
                align: Some(align),
                bold: run.flags.bold,
                italic: run.flags.italic,
                underline: run.flags.underline,
                strike: run.flags.strikeout,
            })
            .collect()
    }
}

fn is_printable(b: u8) -> bool {
    matches!(b, 0x20..=0x7E | b'\t' | b'\n' | b'\r' | 0x80..=0xFF)
}

fn hex_nibble(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

fn parse_u16(digits: &[u8]) -> u16 {
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

/// `<len>` of a text run: decimal when all digits are decimal, hexadecimal otherwise.
fn parse_run_length(digits: &[u8]) -> Option<usize> {
    let text = std::str::from_utf8(digits).ok()?;
    if digits.iter().all(u8::is_ascii_digit)
        && let Ok(v) = text.parse()
    {
        return Some(v);
    }
    usize::from_str_radix(text, 16).ok()
}

/// Font size at 0x40: two ASCII hex digits (low digit first) or a little-endian word.
fn header_font_size(data: &[u8]) -> u16 {
    let ascii = data
        .get(OFF_FONT_SIZE..OFF_FONT_SIZE + 2)
        .and_then(|b| Some((hex_nibble(b[1])? << 4) | hex_nibble(b[0])?));
    match ascii {
        Some(v) => u16::from(v),
        None => le_u32_at(data, OFF_FONT_SIZE).unwrap_or(0) as u16,
    }
}

/// Alignment marker: `0x02` followed by exactly two hex digits naming a known code.
fn detect_alignment_marker(data: &[u8]) -> Option<u8> {
    let end = data.len().min(ALIGN_MARKER_WINDOW);
    (0..end).find_map(|i| {
        if data[i] != 0x02 {
            return None;
        }
        let hi = hex_nibble(*data.get(i + 1).filter(|_| i + 1 < end)?)?;
        let lo = hex_nibble(*data.get(i + 2).filter(|_| i + 2 < end)?)?;
        if i + 3 < end && hex_nibble(data[i + 3]).is_some() {
            return None;
        }
        let code = (hi << 4) | lo;
        matches!(code, 0x3B | 0x3F | 0x77).then_some(code)
    })
}

/// Scan an `XMED` payload.
pub fn read_xmed(data: &[u8]) -> XmedDocument {
    let font_size = header_font_size(data);
    let mut doc = XmedDocument {
        width: le_u32_at(data, OFF_WIDTH).unwrap_or(0),
        line_spacing: le_u32_at(data, OFF_LINE_SPACING).unwrap_or(0),
        text_length: le_u32_at(data, OFF_TEXT_LENGTH).unwrap_or(0),
        ..XmedDocument::default()
    };

    let mut base = XmedStyle {
        font_size,
        flags: StyleFlags::from_byte(data.get(OFF_STYLE).copied().unwrap_or(0)),
        ..XmedStyle::default()
    };
    base.apply_alignment_byte(data.get(OFF_ALIGN).copied().unwrap_or(0));
    if let Some(code) = detect_alignment_marker(data) {
        base.alignment = decode_alignment(code);
    }
    let base_flags = base.flags;
    doc.styles.push(base);

    let end = data.len();
    let mut current: Option<usize> = None;
    let mut i = 0;
    while i < end {
        let b = data[i];

        if data[i..].starts_with(b"40,") && i + 3 < end {
            let color = data[i + 3];
            let name_start = i + 4;
            let mut j = name_start;
            while j < end && is_printable(data[j]) {
                j += 1;
            }
            let font = latin1(&data[name_start..j]);
            current = if font.is_empty() {
                None
            } else {
                doc.styles.push(XmedStyle {
                    font_name: font,
                    color_index: color,
                    font_size,
                    ..XmedStyle::default()
                });
                Some(doc.styles.len() - 1)
            };
            i = skip_nul(data, j);
            continue;
        }

        if hex_nibble(b).is_some() {
            let mut j = i;
            while j < end && hex_nibble(data[j]).is_some() {
                j += 1;
            }
            let digits = &data[i..j];

            if digits.len() == STYLE_RECORD_DIGITS && digits.iter().all(u8::is_ascii_digit) {
                let group = |k: usize| parse_u16(&digits[k * 4..k * 4 + 4]);
                let has_nul = data.get(j) == Some(&0);
                let font_after = j + 3 < end && &data[j + 1..j + 4] == b"40,";
                if has_nul && font_after && i >= 7 {
                    let name_start = (j + 5).min(end);
                    let mut k = name_start;
                    while k < end && is_printable(data[k]) {
                        k += 1;
                    }
                    let mut style = XmedStyle {
                        style_id: group(0),
                        text_length: group(2),
                        base_style_id: group(4),
                        font_name: latin1(&data[name_start..k]),
                        color_index: data.get(j + 4).copied().unwrap_or(0),
                        font_size,
                        flags: StyleFlags::from_byte(data[i - 7]),
                        ..XmedStyle::default()
                    };
                    style.apply_alignment_byte(data[i - 6]);
                    doc.styles.push(style);
                    current = Some(doc.styles.len() - 1);
                    i = skip_nul(data, k);
                } else {
                    doc.map_entries.push(XmedMapEntry {
                        style_id: group(0),
                        f2: group(1),
                        text_length: group(2),
                        f4: group(3),
                        base_style_id: group(4),
                    });
                    i = skip_nul(data, j);
                }
                continue;
            }

            if data.get(j) == Some(&b',')
                && let Some(len) = parse_run_length(digits)
                && let Some(next) = (j + 1).checked_add(len)
                && let Some(run) = data.get(j + 1..next)
            {
                let next = if matches!(data.get(next), Some(0x00 | 0x03)) {
                    next + 1
                } else {
                    next
                };
                if run.iter().all(|&c| is_printable(c)) {
                    let mut r = XmedRun {
                        start: doc.text.chars().count(),
                        text: latin1(run),
                        font_size,
                        flags: base_flags,
                        ..XmedRun::default()
                    };
                    if let Some(style) = current.and_then(|s| doc.styles.get(s)) {
                        r.font_name = style.font_name.clone();
                        r.color_index = Some(style.color_index);
                        if style.font_size != 0 {
                            r.font_size = style.font_size;
                        }
                        r.flags = style.flags;
                    }
                    doc.text.push_str(&r.text);
                    doc.runs.push(r);
                }
                i = next;
                continue;
            }

            // Only the run's tail can still start a record or a `40,` marker.
            i = (i + 1).max(j.saturating_sub(STYLE_RECORD_DIGITS));
            continue;
        }

        i += 1;
    }

    if doc.styles.len() > 1
        && let Some(first) = doc.runs.first_mut()
        && first.font_name.is_empty()
        && let Some(last) = doc.styles.last()
    {
        first.font_name = last.font_name.clone();
        first.color_index = Some(last.color_index);
    }
    doc
}

fn skip_nul(data: &[u8], i: usize) -> usize {
    if data.get(i) == Some(&0) { i + 1 } else { i }
}

#[cfg(test)]
#[path = "../../tests/unit/decode/xmed.rs"]
mod tests;
