//! Script cast members.
//!
//! A script member's `CASt` chunk carries an info block (script number, optional source text
//! and name) and a specific block whose leading bytes select the script kind. Compiled
//! bytecode lives in a separate `Lscr` resource, found through the `Lctx` context table.
use crate::{
    decode::member::{CastMemberType, MemberChunk},
    foundation::version::DirectorVersion,
    io::reader::{be_u16_at, be_u32_at, latin1, le_u32_at},
};

/// Info-block offset of the compiled-script resource id (older archives).
pub const INFO_RESOURCE_ID: usize = 8;
/// Info-block offset of the big-endian script number.
pub const INFO_SCRIPT_NUMBER: usize = 16;
/// Info-block offset of the little-endian source text length.
pub const INFO_TEXT_LENGTH: usize = 0x1D;
/// Info-block offset of the big-endian text start pointer.
pub const INFO_POINTER_SLOT: usize = 0x68;
/// Text start written after the pointer slot.
pub const INFO_POINTER_TEXT_START: usize = 0x6A;
/// Text start of the older layout, right after the length field.
pub const INFO_LEGACY_TEXT_START: usize = INFO_TEXT_LENGTH + 4;

/// Offset of the first context-table entry's header length field.
const LCTX_HEADER_LEN: usize = 16;
const LCTX_ENTRY_LEN: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Script category.
pub enum ScriptKind {
    /// Unrecognised selector.
    Unknown,
    /// Sprite or frame behaviour.
    Behavior,
    /// Movie script.
    Movie,
    /// Parent script.
    Parent,
}

impl ScriptKind {
    /// Map a selector byte.
    pub fn from_selector(b: u8) -> Self {
        match b {
            1 => Self::Behavior,
            3 => Self::Movie,
            7 => Self::Parent,
            _ => Self::Unknown,
        }
    }

    /// Selector byte for this kind (`0` for `Unknown`).
    pub fn selector(self) -> u8 {
        match self {
            Self::Behavior => 1,
            Self::Movie => 3,
            Self::Parent => 7,
            Self::Unknown => 0,
        }
    }
}

/// Script kind from a specific-data block. The selector may sit in either of the first two
/// bytes, or appear in both.
pub fn detect_kind(specific: &[u8]) -> ScriptKind {
    match specific {
        [] => ScriptKind::Unknown,
        [b] | [0, b, ..] | [b, 0, ..] => ScriptKind::from_selector(*b),
        [a, b, ..] => match ScriptKind::from_selector(*b) {
            ScriptKind::Unknown => ScriptKind::from_selector(*a),
            kind => kind,
        },
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Where an info block keeps its source text.
pub enum InfoLayout {
    /// Text start read from the pointer slot at 0x68 (Director 5 and later).
    PointerTable,
    /// Text immediately after the length field.
    Legacy,
}

impl InfoLayout {
    /// Layouts to try, most likely first.
    pub fn candidates(version: Option<DirectorVersion>) -> [Self; 2] {
        match version {
            Some(v) if !v.uses_script_pointer_table() => [Self::Legacy, Self::PointerTable],
            _ => [Self::PointerTable, Self::Legacy],
        }
    }

    fn text_start(self, info: &[u8]) -> Option<usize> {
        match self {
            Self::PointerTable => be_u16_at(info, INFO_POINTER_SLOT)
                .map(usize::from)
                .filter(|&s| s >= INFO_POINTER_TEXT_START),
            Self::Legacy => Some(INFO_LEGACY_TEXT_START),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Source text and name pulled from an info block.
pub struct ScriptSource {
    /// Layout the text was found with.
    pub layout: Option<InfoLayout>,
    /// Source text.
    pub text: String,
    /// Script name.
    pub name: String,
}

/// Text and trailing name at a layout's text start, when the declared lengths fit.
fn read_source_at(info: &[u8], layout: InfoLayout) -> Option<ScriptSource> {
    let len = le_u32_at(info, INFO_TEXT_LENGTH)? as usize;
    let start = layout.text_start(info)?;
    let text_end = start.checked_add(len)?;
    let text = info.get(start..text_end)?;
    let name_len = usize::from(*info.get(text_end)?);
    let name = info.get(text_end + 1..text_end + 1 + name_len)?;
    Some(ScriptSource {
        layout: Some(layout),
        text: latin1(text),
        name: latin1(name),
    })
}

/// Source text and name, trying each layout in order. Never fails: an info block that fits
/// no layout yields empty text.
pub fn read_source(info: &[u8], version: Option<DirectorVersion>) -> ScriptSource {
    InfoLayout::candidates(version)
        .into_iter()
        .find_map(|layout| read_source_at(info, layout))
        .unwrap_or_default()
}

/// Script number (1-based) from an info block.
pub fn script_number(info: &[u8]) -> Option<i32> {
    be_u32_at(info, INFO_SCRIPT_NUMBER)
        .map(|n| n as i32)
        .filter(|&n| n > 0)
}

/// Compiled-script resource ids listed in an `Lctx` payload, in script-number order.
///
/// Layout: u32 entry count at 8, u16 header length at 16, then 12-byte entries holding the
/// resource id at +4, all big-endian.
pub fn read_context_table(bytes: &[u8]) -> Vec<i32> {
    let Some(count) = be_u32_at(bytes, 8) else {
        return Vec::new();
    };
    let Some(header_len) = be_u16_at(bytes, LCTX_HEADER_LEN) else {
        return Vec::new();
    };
    let header_len = usize::from(header_len);
    let fits = bytes.len().saturating_sub(header_len) / LCTX_ENTRY_LEN;
    (0..(count as usize).min(fits))
        .filter_map(|i| be_u32_at(bytes, header_len + i * LCTX_ENTRY_LEN + 4))
        .map(|id| id as i32)
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// A script member's descriptor, before its bytecode resource is resolved.
pub struct ScriptDescriptor {
    /// Id of the `CASt` resource.
    pub member_id: i32,
    /// Script category.
    pub kind: ScriptKind,
    /// Script number used to index the context table.
    pub script_number: Option<i32>,
    /// Source text and name.
    pub source: ScriptSource,
    /// Raw info block.
    #[serde(skip)]
    pub info: Vec<u8>,
}

impl ScriptDescriptor {
    /// Decode a `CASt` payload; non-script members yield `None`.
    pub fn decode(member_id: i32, bytes: &[u8], version: Option<DirectorVersion>) -> Option<Self> {
        let chunk = MemberChunk::parse(bytes, version)?;
        if chunk.member_type != CastMemberType::Script {
            return None;
        }
        Some(Self {
            member_id,
            kind: detect_kind(&chunk.specific),
            script_number: script_number(&chunk.info),
            source: read_source(&chunk.info, version),
            info: chunk.info,
        })
    }

    /// Resolve the compiled-script resource id.
    ///
    /// The script number is looked up in `context` first (number `n` is entry `n - 1`). When
    /// that yields nothing usable, the id stored at info offset 8 is tried big-endian, then
    /// little-endian. `exists` filters out ids with no live resource.
    pub fn resolve_bytecode_id(&self, context: &[i32], exists: impl Fn(i32) -> bool) -> Option<i32> {
        let from_context = self
            .script_number
            .and_then(|n| context.get(usize::try_from(n - 1).ok()?).copied());
        let raw = self.info.get(INFO_RESOURCE_ID..INFO_RESOURCE_ID + 4);
        let fallbacks = raw.map(|b| {
            let b = [b[0], b[1], b[2], b[3]];
            [i32::from_be_bytes(b), i32::from_le_bytes(b)]
        });
        from_context
            .into_iter()
            .chain(fallbacks.into_iter().flatten())
            .find(|&id| id > 0 && exists(id))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// A script member with its compiled-script payload.
pub struct ScriptRecord {
    /// Id of the owning `CASt` resource.
    pub member_id: i32,
    /// Id of the `Lscr` resource, when resolved.
    pub resource_id: Option<i32>,
    /// Script category.
    pub kind: ScriptKind,
    /// Script number.
    pub script_number: Option<i32>,
    /// Script name.
    pub name: String,
    /// Source text, when stored.
    pub text: String,
    /// Compiled bytecode payload.
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

#[cfg(test)]
#[path = "../../tests/unit/decode/script.rs"]
mod tests;
