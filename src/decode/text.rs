use crate::{
    decode::{
        markup::{self, Span},
        xmed::read_xmed,
    },
    io::{
        reader::{ByteReader, latin1},
        tag::Tag,
    },
};

/// Size of one `STXT` style run.
const STXT_RUN_LEN: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Text payload classification.
pub enum TextKind {
    /// Payload under a text tag that could not be decoded.
    Unknown,
    /// Plain fixed-layout text (`STXT`).
    Stxt,
    /// Styled text (`XMED`).
    Xmed,
}

impl TextKind {
    /// Merge rank: styled text outranks plain text.
    pub fn richness(self) -> u8 {
        match self {
            Self::Xmed => 2,
            Self::Stxt => 1,
            Self::Unknown => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// One `STXT` style run.
pub struct StxtRun {
    /// Character offset where the run starts.
    pub start: u32,
    /// Line height.
    pub height: u16,
    /// Ascent.
    pub ascent: u16,
    /// Font id.
    pub font_id: u16,
    /// Style bits (bold 0x01, italic 0x02, underline 0x04).
    pub style: u8,
    /// Point size.
    pub size: u16,
    /// 16-bit per channel foreground colour.
    pub color: [u16; 3],
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded `STXT` payload.
pub struct StxtDocument {
    /// Raw text (Latin-1, carriage-return line endings).
    pub text: String,
    /// Style runs in order.
    pub runs: Vec<StxtRun>,
}

impl StxtDocument {
    /// Text split into spans at run boundaries.
    pub fn spans(&self) -> Vec<Span> {
        let chars: Vec<char> = self.text.chars().collect();
        if self.runs.is_empty() {
            return vec![Span {
                text: self.text.clone(),
                ..Span::default()
            }];
        }
        let mut spans = Vec::with_capacity(self.runs.len() + 1);
        let first = (self.runs[0].start as usize).min(chars.len());
        if first > 0 {
            spans.push(Span {
                text: chars[..first].iter().collect(),
                ..Span::default()
            });
        }
        for (i, run) in self.runs.iter().enumerate() {
            let start = (run.start as usize).min(chars.len());
            let end = self
                .runs
                .get(i + 1)
                .map(|n| n.start as usize)
                .unwrap_or(chars.len())
                .clamp(start, chars.len());
            let [r, g, b] = run.color.map(|c| (c >> 8) as u8);
            spans.push(Span {
                text: chars[start..end].iter().collect(),
                font: None,
                size: (run.size > 0).then_some(run.size),
                color: Some([r, g, b]),
                align: None,
                bold: run.style & 0x01 != 0,
                italic: run.style & 0x02 != 0,
                underline: run.style & 0x04 != 0,
                strike: false,
            });
        }
        spans
    }
}

/// Decode an `STXT` payload: big-endian header length, text length and style length, then
/// the text and a style block (u16 run count, 20-byte runs).
pub fn read_stxt(bytes: &[u8]) -> Option<StxtDocument> {
    let mut r = ByteReader::big(bytes);
    let header_len = r.read_u32().ok()? as usize;
    let text_len = r.read_u32().ok()? as usize;
    let style_len = r.read_u32().ok()? as usize;
    if header_len < 12 || header_len > bytes.len() {
        return None;
    }
    r.seek(header_len);
    let text = latin1(r.read_bytes_clamped(text_len));

    let style = r.read_bytes_clamped(style_len);
    let mut runs = Vec::new();
    if style.len() >= 2 {
        let mut s = ByteReader::big(style);
        let count = usize::from(s.read_u16().ok()?);
        for _ in 0..count.min(s.remaining() / STXT_RUN_LEN) {
            let start = s.read_u32().ok()?;
            let height = s.read_u16().ok()?;
            let ascent = s.read_u16().ok()?;
            let font_id = s.read_u16().ok()?;
            let style = s.read_u8().ok()?;
            s.skip(1).ok()?;
            let size = s.read_u16().ok()?;
            let color = [s.read_u16().ok()?, s.read_u16().ok()?, s.read_u16().ok()?];
            runs.push(StxtRun {
                start,
                height,
                ascent,
                font_id,
                style,
                size,
                color,
            });
        }
    }
    Some(StxtDocument { text, runs })
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Decoded text or field payload, normalised to markup.
pub struct TextRecord {
    /// Id of the resource holding the text.
    pub resource_id: i32,
    /// Payload classification.
    pub kind: TextKind,
    /// Plain text with newline line endings.
    pub plain: String,
    /// Lightweight markup rendering.
    pub markup: String,
    /// Raw payload.
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// Whether `tag` holds text.
pub fn is_text_tag(tag: Tag) -> bool {
    tag == Tag::STXT || tag == Tag::XMED
}

impl TextRecord {
    /// Decode a text payload. Non-text tags and empty payloads yield `None`; an undecodable
    /// `STXT` payload yields an `Unknown` record with empty text.
    pub fn decode(resource_id: i32, tag: Tag, bytes: Vec<u8>) -> Option<Self> {
        if bytes.is_empty() || !is_text_tag(tag) {
            return None;
        }
        let (kind, spans) = if tag == Tag::XMED {
            (TextKind::Xmed, read_xmed(&bytes).spans())
        } else {
            match read_stxt(&bytes) {
                Some(doc) => (TextKind::Stxt, doc.spans()),
                None => (TextKind::Unknown, Vec::new()),
            }
        };
        Some(Self {
            resource_id,
            kind,
            plain: markup::plain_text(&spans),
            markup: markup::render(&spans),
            bytes,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/decode/text.rs"]
mod tests;
