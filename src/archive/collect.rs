//! Per-kind collection passes over a read context.
//!
//! Each pass walks composite records' children in tag-priority order, then picks up any
//! matching entries nothing claimed. Collection never fails: undecodable payloads are
//! skipped or kept as `Unknown`.
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    container::context::ReadContext,
    decode::{
        bitmap::{self, BitmapRecord},
        member::{CastMemberType, MemberChunk},
        script::{ScriptDescriptor, ScriptKind, ScriptRecord, read_context_table},
        shape::ShapeRecord,
        sound::{self, SoundKind, SoundRecord},
        text::{TextRecord, is_text_tag},
    },
    foundation::version::DirectorVersion,
    io::tag::Tag,
    resources::entry::ResourceEntry,
};

/// A `CASt` entry's payload and its parsed chunk.
#[derive(Clone, Debug)]
pub(crate) struct MemberPayload {
    pub(crate) bytes: Vec<u8>,
    pub(crate) chunk: Option<MemberChunk>,
}

impl MemberPayload {
    pub(crate) fn member_type(&self) -> CastMemberType {
        self.chunk
            .as_ref()
            .map(|c| c.member_type)
            .unwrap_or(CastMemberType::Unknown)
    }
}

/// Read-only view over one read pass used by every collection step.
pub(crate) struct Collector<'a> {
    ctx: &'a ReadContext,
    version: Option<DirectorVersion>,
    members: BTreeMap<i32, MemberPayload>,
}

fn is_member_tag(tag: Tag) -> bool {
    tag == Tag::CAST_MEMBER || tag == Tag::CAST_LEGACY
}

impl<'a> Collector<'a> {
    pub(crate) fn new(ctx: &'a ReadContext) -> Self {
        let version = ctx.format().director_version;
        let members = ctx
            .table()
            .entries()
            .iter()
            .filter(|e| is_member_tag(e.tag) && !e.is_free())
            .map(|e| {
                let bytes = ctx.load_entry(e);
                let chunk = MemberChunk::parse(&bytes, version);
                (e.id, MemberPayload { bytes, chunk })
            })
            .collect();
        Self {
            ctx,
            version,
            members,
        }
    }

    pub(crate) fn members(&self) -> &BTreeMap<i32, MemberPayload> {
        &self.members
    }

    fn live_entries(&self) -> impl Iterator<Item = &'a ResourceEntry> + 'a {
        self.ctx.table().entries().iter().filter(|e| !e.is_free())
    }

    fn tag_of(&self, id: i32, fallback: Tag) -> Tag {
        self.ctx.table().get(id).map(|e| e.tag).unwrap_or(fallback)
    }

    /// Children of every parent in `priority` order, then (when `extra` accepts them) any
    /// remaining children in key-table order.
    fn prioritised_children(
        &self,
        priority: &[Tag],
        extra: impl Fn(Tag) -> bool,
    ) -> Vec<(i32, Vec<(i32, Tag)>)> {
        self.ctx
            .graph()
            .children_by_parent()
            .iter()
            .map(|(&parent, links)| {
                let ranked = priority
                    .iter()
                    .flat_map(|tag| links.iter().filter(move |l| l.tag == *tag))
                    .chain(
                        links
                            .iter()
                            .filter(|l| !priority.contains(&l.tag) && extra(l.tag)),
                    )
                    .map(|l| (l.child_id, self.tag_of(l.child_id, l.tag)))
                    .collect();
                (parent, ranked)
            })
            .collect()
    }

    /// Every retained bitmap: composite children first, then unclaimed standalone entries.
    pub(crate) fn bitmaps(&self) -> Vec<BitmapRecord> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        let ranked = self.prioritised_children(&bitmap::CHILD_PRIORITY, bitmap::is_inspectable);
        for (_, children) in ranked {
            for (id, tag) in children {
                if seen.insert(id)
                    && let Some(record) = BitmapRecord::decode(id, tag, self.ctx.load(id))
                {
                    out.push(record);
                }
            }
        }
        for entry in self.live_entries() {
            if bitmap::is_inspectable(entry.tag)
                && seen.insert(entry.id)
                && let Some(record) =
                    BitmapRecord::decode(entry.id, entry.tag, self.ctx.load_entry(entry))
            {
                out.push(record);
            }
        }
        out
    }

    fn sound_at(&self, id: i32, tag: Tag) -> Option<SoundRecord> {
        let record = SoundRecord::decode(id, self.ctx.load(id))?;
        // `ediM` is generic media: only a recognised sound counts.
        (tag != Tag::MEDI || record.kind != SoundKind::Unknown).then_some(record)
    }

    /// One sound per composite record (first child in priority order that yields one), then
    /// unclaimed standalone sound entries.
    pub(crate) fn sounds(&self) -> Vec<SoundRecord> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for (_, children) in self.prioritised_children(&sound::CHILD_PRIORITY, |_| false) {
            for (id, tag) in children {
                if !seen.insert(id) {
                    continue;
                }
                if let Some(record) = self.sound_at(id, tag) {
                    out.push(record);
                    break;
                }
            }
        }
        for entry in self.live_entries() {
            if sound::CHILD_PRIORITY.contains(&entry.tag)
                && seen.insert(entry.id)
                && let Some(record) = self.sound_at(entry.id, entry.tag)
            {
                out.push(record);
            }
        }
        out
    }

    /// Every `STXT` and `XMED` payload.
    pub(crate) fn texts(&self) -> Vec<TextRecord> {
        self.live_entries()
            .filter(|e| is_text_tag(e.tag))
            .filter_map(|e| TextRecord::decode(e.id, e.tag, self.ctx.load_entry(e)))
            .collect()
    }

    /// Compiled-script ids from the first non-empty `Lctx` table.
    fn context_table(&self) -> Vec<i32> {
        self.ctx
            .table()
            .by_tag(Tag::LCTX)
            .map(|e| read_context_table(&self.ctx.load_entry(e)))
            .find(|ids| !ids.is_empty())
            .unwrap_or_default()
    }

    fn is_live_script(&self, id: i32) -> bool {
        self.ctx
            .table()
            .get(id)
            .is_some_and(|e| e.tag == Tag::LSCR && !e.is_free())
    }

    /// Script members with their resolved `Lscr` payloads, then unclaimed `Lscr` entries.
    ///
    /// Resolution order: context table, info-block id, then an `Lscr` child linked to the
    /// member in the key table.
    pub(crate) fn scripts(&self) -> Vec<ScriptRecord> {
        let context = self.context_table();
        let graph = self.ctx.graph();
        let mut claimed = BTreeSet::new();
        let mut out = Vec::new();
        for (&member_id, payload) in &self.members {
            let Some(desc) = ScriptDescriptor::decode(member_id, &payload.bytes, self.version)
            else {
                continue;
            };
            let resource_id = desc
                .resolve_bytecode_id(&context, |id| self.is_live_script(id))
                .or_else(|| graph.child_with_tag(member_id, Tag::LSCR));
            if let Some(id) = resource_id {
                claimed.insert(id);
            }
            out.push(ScriptRecord {
                member_id,
                resource_id,
                kind: desc.kind,
                script_number: desc.script_number,
                name: desc.source.name,
                text: desc.source.text,
                bytes: resource_id.map(|id| self.ctx.load(id)).unwrap_or_default(),
            });
        }
        for entry in self.ctx.table().by_tag(Tag::LSCR) {
            if claimed.contains(&entry.id) {
                continue;
            }
            out.push(ScriptRecord {
                member_id: graph.owner_of(entry.id),
                resource_id: Some(entry.id),
                kind: ScriptKind::Unknown,
                script_number: None,
                name: String::new(),
                text: String::new(),
                bytes: self.ctx.load_entry(entry),
            });
        }
        out
    }

    /// Shape records from every member chunk whose type is shape or unreadable.
    pub(crate) fn shapes(&self) -> Vec<ShapeRecord> {
        self.members
            .iter()
            .filter(|(_, p)| {
                matches!(
                    p.member_type(),
                    CastMemberType::Shape | CastMemberType::Unknown
                )
            })
            .filter_map(|(&id, p)| ShapeRecord::decode(id, &p.bytes, self.version))
            .collect()
    }
}
