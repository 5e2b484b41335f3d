//! Synthetic script members: `CASt` script chunks, `Lctx` context tables and a
//! single-behaviour library.
use crate::{
    build::{
        container::ResourceFile,
        library::{FIRST_CHILD_ID, member_chunk, single_member_library},
    },
    decode::{
        member::CastMemberType,
        script::{
            INFO_LEGACY_TEXT_START, INFO_POINTER_SLOT, INFO_POINTER_TEXT_START, INFO_RESOURCE_ID,
            INFO_SCRIPT_NUMBER, INFO_TEXT_LENGTH, InfoLayout, ScriptKind,
        },
    },
    foundation::error::{ArchiveError, ArchiveResult},
    io::{
        reader::Endian,
        tag::Tag,
        writer::{ByteWriter, encode_latin1},
    },
};

/// Header length written in `Lctx` payloads.
const LCTX_HEADER_LEN: u16 = 0x2A;

#[derive(Clone, Debug, PartialEq, Eq)]
/// A script member to write.
pub struct ScriptMember {
    /// 1-based script number, indexing the context table.
    pub script_number: i32,
    /// Id of the compiled `Lscr` resource, also stored in the info block.
    pub bytecode_id: i32,
    /// Script category.
    pub kind: ScriptKind,
    /// Source text.
    pub text: String,
    /// Script name.
    pub name: String,
    /// Info-block layout to produce.
    pub layout: InfoLayout,
}

/// Convert CRLF and LF line endings to the CR endings stored in info blocks.
pub fn normalize_script_text(text: &str) -> String {
    text.replace("\r\n", "\r").replace('\n', "\r")
}

impl ScriptMember {
    /// Behaviour with pointer-table layout.
    pub fn behavior(script_number: i32, bytecode_id: i32, text: &str, name: &str) -> Self {
        Self {
            script_number,
            bytecode_id,
            kind: ScriptKind::Behavior,
            text: text.to_string(),
            name: name.to_string(),
            layout: InfoLayout::PointerTable,
        }
    }

    fn validate(&self) -> ArchiveResult<()> {
        if self.script_number <= 0 {
            return Err(ArchiveError::validation(format!(
                "script number {} must be positive",
                self.script_number
            )));
        }
        if self.bytecode_id <= 0 {
            return Err(ArchiveError::validation(format!(
                "script resource id {} must be positive",
                self.bytecode_id
            )));
        }
        Ok(())
    }

    /// Info block: resource id at 8, script number at 16, LE text length at 0x1D, the text
    /// (behind a pointer slot at 0x68 for [`InfoLayout::PointerTable`]), then a Pascal name.
    pub fn info(&self) -> ArchiveResult<Vec<u8>> {
        self.validate()?;
        let text = encode_latin1(&normalize_script_text(&self.text))?;
        let name = encode_latin1(&self.name)?;
        let name_len = u8::try_from(name.len()).map_err(|_| {
            ArchiveError::validation(format!("script name of {} bytes exceeds 255", name.len()))
        })?;
        let text_len = u32::try_from(text.len())
            .map_err(|_| ArchiveError::validation("script text exceeds 4 GiB"))?;

        let start = match self.layout {
            InfoLayout::PointerTable => INFO_POINTER_TEXT_START,
            InfoLayout::Legacy => INFO_LEGACY_TEXT_START,
        };
        let mut info = vec![0u8; start];
        info[INFO_RESOURCE_ID..INFO_RESOURCE_ID + 4]
            .copy_from_slice(&self.bytecode_id.to_be_bytes());
        info[INFO_SCRIPT_NUMBER..INFO_SCRIPT_NUMBER + 4]
            .copy_from_slice(&self.script_number.to_be_bytes());
        info[INFO_TEXT_LENGTH..INFO_TEXT_LENGTH + 4].copy_from_slice(&text_len.to_le_bytes());
        if self.layout == InfoLayout::PointerTable {
            info[INFO_POINTER_SLOT..INFO_POINTER_SLOT + 2]
                .copy_from_slice(&(INFO_POINTER_TEXT_START as u16).to_be_bytes());
        }
        info.extend_from_slice(&text);
        info.push(name_len);
        info.extend_from_slice(&name);
        Ok(info)
    }

    /// Complete `CASt` chunk with the kind selector as the specific block.
    pub fn cast_chunk(&self) -> ArchiveResult<Vec<u8>> {
        let info = self.info()?;
        Ok(member_chunk(
            CastMemberType::Script,
            &info,
            &[0x00, self.kind.selector()],
        ))
    }
}

/// `Lctx` payload listing compiled-script ids; script number `n` maps to `ids[n - 1]`.
pub fn context_table(ids: &[i32]) -> ArchiveResult<Vec<u8>> {
    let count = u32::try_from(ids.len())
        .map_err(|_| ArchiveError::validation("too many context entries"))?;
    let mut w = ByteWriter::big();
    w.write_u32(0);
    w.write_u32(0);
    w.write_u32(count);
    w.write_u32(count);
    w.write_u16(LCTX_HEADER_LEN);
    while w.len() < usize::from(LCTX_HEADER_LEN) {
        w.write_u8(0);
    }
    for &id in ids {
        if id <= 0 {
            return Err(ArchiveError::validation(format!(
                "context entry id {id} must be positive"
            )));
        }
        w.write_u32(0);
        w.write_i32(id);
        w.write_u32(0);
    }
    Ok(w.into_bytes())
}

/// Library holding one behaviour: its `CASt` member, a placeholder `Lscr` linked to it,
/// and an `Lctx` table pointing at the `Lscr`.
pub fn behavior_library(
    endian: Endian,
    name: &str,
    text: &str,
) -> ArchiveResult<Vec<ResourceFile>> {
    let script_id = FIRST_CHILD_ID;
    let member = ScriptMember::behavior(1, script_id, text, name).cast_chunk()?;
    let mut files = single_member_library(endian, member, vec![(Tag::LSCR, vec![0x00])])?;
    files.push(ResourceFile::from_parts(
        Tag::LCTX,
        script_id + 1,
        context_table(&[script_id])?,
    ));
    Ok(files)
}

#[cfg(test)]
#[path = "../../tests/unit/build/script.rs"]
mod tests;
