use crate::{
    foundation::version::DirectorVersion,
    io::reader::{ByteReader, latin1},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Cast member type code stored in a `CASt` chunk.
pub enum CastMemberType {
    /// Unrecognised code.
    Unknown,
    /// Bitmap image.
    Bitmap,
    /// Film loop.
    FilmLoop,
    /// Editable plain-text field.
    Field,
    /// Colour palette.
    Palette,
    /// QuickDraw picture.
    Picture,
    /// Sound.
    Sound,
    /// Push button, check box or radio button.
    Button,
    /// Vector shape.
    Shape,
    /// Linked movie.
    Movie,
    /// Digital video.
    DigitalVideo,
    /// Script.
    Script,
    /// Rich text.
    Text,
    /// OLE object.
    Ole,
    /// Transition.
    Transition,
    /// Xtra-defined member.
    Xtra,
}

const TYPE_CODES: [(u32, CastMemberType); 15] = [
    (1, CastMemberType::Bitmap),
    (2, CastMemberType::FilmLoop),
    (3, CastMemberType::Field),
    (4, CastMemberType::Palette),
    (5, CastMemberType::Picture),
    (6, CastMemberType::Sound),
    (7, CastMemberType::Button),
    (8, CastMemberType::Shape),
    (9, CastMemberType::Movie),
    (10, CastMemberType::DigitalVideo),
    (11, CastMemberType::Script),
    (12, CastMemberType::Text),
    (13, CastMemberType::Ole),
    (14, CastMemberType::Transition),
    (15, CastMemberType::Xtra),
];

impl CastMemberType {
    /// Map a stored type code.
    pub fn from_code(code: u32) -> Self {
        TYPE_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, t)| *t)
            .unwrap_or(Self::Unknown)
    }

    /// Stored type code (`0` for `Unknown`).
    pub fn code(self) -> u32 {
        TYPE_CODES
            .iter()
            .find(|(_, t)| *t == self)
            .map(|(c, _)| *c)
            .unwrap_or(0)
    }

    /// Whether text attached to this member belongs in the field lookup.
    pub fn is_field_like(self) -> bool {
        matches!(self, Self::Field | Self::Button)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Header layout of a `CASt` chunk.
pub enum MemberLayout {
    /// Director 5 and later: u32 type, u32 info length, u32 specific length.
    Modern,
    /// Director 4: u16 specific length (type byte included), u32 info length, u8 type.
    Transitional,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A parsed `CASt` chunk: type code plus its info and type-specific blocks.
pub struct MemberChunk {
    /// Member type.
    pub member_type: CastMemberType,
    /// Header layout the chunk was read with.
    pub layout: MemberLayout,
    /// Info block (names, script text, pointer table).
    pub info: Vec<u8>,
    /// Type-specific data block.
    pub specific: Vec<u8>,
}

type LayoutParser = fn(&[u8]) -> Option<MemberChunk>;

impl MemberChunk {
    /// Parse a `CASt` payload, trying the layout that fits `version` first.
    ///
    /// When no layout yields a known type, the modern header is used as read with an
    /// `Unknown` type. Payloads shorter than a modern header yield `None`.
    pub fn parse(bytes: &[u8], version: Option<DirectorVersion>) -> Option<Self> {
        let strategies: [LayoutParser; 2] = match version {
            Some(v) if v < DirectorVersion::D5 => [parse_transitional, parse_modern],
            _ => [parse_modern, parse_transitional],
        };
        strategies
            .iter()
            .filter_map(|parse| parse(bytes))
            .find(|chunk| chunk.member_type != CastMemberType::Unknown)
            .or_else(|| parse_modern(bytes))
    }

    /// Member name from the info block.
    pub fn name(&self) -> String {
        extract_name(&self.info)
    }
}

fn parse_modern(bytes: &[u8]) -> Option<MemberChunk> {
    let mut r = ByteReader::big(bytes);
    let member_type = CastMemberType::from_code(r.read_u32().ok()?);
    let info_len = r.read_u32().ok()? as usize;
    let specific_len = r.read_u32().ok()? as usize;
    let info = r.read_bytes_clamped(info_len).to_vec();
    let specific = r.read_bytes_clamped(specific_len).to_vec();
    Some(MemberChunk {
        member_type,
        layout: MemberLayout::Modern,
        info,
        specific,
    })
}

fn parse_transitional(bytes: &[u8]) -> Option<MemberChunk> {
    let mut r = ByteReader::big(bytes);
    let specific_len = usize::from(r.read_u16().ok()?);
    let info_len = r.read_u32().ok()? as usize;
    let member_type = CastMemberType::from_code(u32::from(r.read_u8().ok()?));
    if info_len > r.remaining() {
        return None;
    }
    let specific = r.read_bytes_clamped(specific_len.saturating_sub(1)).to_vec();
    let info = r.read_bytes_clamped(info_len).to_vec();
    Some(MemberChunk {
        member_type,
        layout: MemberLayout::Transitional,
        info,
        specific,
    })
}

/// Member name from an info block.
///
/// The block starts with a u32, a u16 item count, a u32 items length and `count` u32 item
/// offsets; item 1 is the name as a Pascal string. When that table does not yield a name,
/// the first printable Pascal string anywhere in the block is used.
pub fn extract_name(info: &[u8]) -> String {
    table_name(info)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| scan_pascal_string(info))
}

fn table_name(info: &[u8]) -> Option<String> {
    if info.len() < 10 {
        return None;
    }
    let mut r = ByteReader::big(info);
    r.skip(4).ok()?;
    let count = usize::from(r.read_u16().ok()?);
    let items_len = r.read_u32().ok()? as usize;
    if count < 2 {
        return None;
    }
    let offsets = (0..count)
        .map(|_| r.read_u32().map(|o| o as usize))
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    let items = r.read_bytes_clamped(items_len);
    let start = offsets[1].min(items.len());
    let end = offsets.get(2).copied().unwrap_or(items_len).min(items.len());
    let item = items.get(start..end)?;
    let (&len, rest) = item.split_first()?;
    let len = usize::from(len);
    (len > 0 && len <= rest.len()).then(|| latin1(&rest[..len]))
}

/// First length-prefixed run of printable ASCII in `data`.
pub fn scan_pascal_string(data: &[u8]) -> String {
    (0..data.len())
        .find_map(|i| {
            let len = usize::from(data[i]);
            let run = data.get(i + 1..i + 1 + len)?;
            (len > 0 && run.iter().all(|b| (0x20..=0x7E).contains(b))).then(|| latin1(run))
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/decode/member.rs"]
mod tests;
