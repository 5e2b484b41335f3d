use std::{
    collections::BTreeMap,
    io::{Read, Seek, SeekFrom},
    path::Path,
};

use crate::{
    archive::{
        cast::{CastLibrary, CastMember, read_cast_table},
        collect::Collector,
    },
    container::{
        context::{RawResource, ReadContext},
        header::ContainerFormat,
    },
    decode::{
        bitmap::BitmapRecord, member::CastMemberType, script::ScriptRecord, shape::ShapeRecord,
        sound::SoundRecord, text::TextRecord,
    },
    foundation::{error::ArchiveResult, version::DirectorVersion},
    io::tag::Tag,
    resources::{entry::ResourceKeyLink, graph::ResourceGraph},
};

/// Index of the record kept for each owner id.
type Lookup = BTreeMap<i32, usize>;

/// A fully assembled movie or cast archive.
///
/// Assembly reads every resource once, decodes each payload kind, then builds owner-keyed
/// lookups and cast libraries. The result is immutable.
#[derive(Clone, Debug)]
pub struct MovieArchive {
    file_name: String,
    format: ContainerFormat,
    graph: ResourceGraph,
    raw_resources: Vec<RawResource>,
    cast_libraries: Vec<CastLibrary>,
    bitmaps: Vec<BitmapRecord>,
    sounds: Vec<SoundRecord>,
    texts: Vec<TextRecord>,
    scripts: Vec<ScriptRecord>,
    shapes: Vec<ShapeRecord>,
    bitmap_by_owner: Lookup,
    sound_by_owner: Lookup,
    text_by_owner: Lookup,
    field_by_owner: Lookup,
    script_by_owner: Lookup,
    shape_by_owner: Lookup,
}

/// Keep the first record per owner.
fn first_wins<T>(records: &[T], owner: impl Fn(&T) -> Option<i32>) -> Lookup {
    let mut lookup = Lookup::new();
    for (i, record) in records.iter().enumerate() {
        if let Some(id) = owner(record) {
            lookup.entry(id).or_insert(i);
        }
    }
    lookup
}

/// Replace an owner's record only when the newcomer is strictly richer.
fn merge_richer(lookup: &mut Lookup, texts: &[TextRecord], owner: i32, index: usize) {
    let incoming = texts[index].kind.richness();
    match lookup.get(&owner) {
        Some(&kept) if texts[kept].kind.richness() >= incoming => {}
        _ => {
            lookup.insert(owner, index);
        }
    }
}

impl MovieArchive {
    /// Read and assemble the archive at `path`.
    pub fn open(path: impl AsRef<Path>) -> ArchiveResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(data, &name)
    }

    /// Read and assemble an archive from a seekable stream, starting at its beginning.
    pub fn read<R: Read + Seek>(mut reader: R, name: &str) -> ArchiveResult<Self> {
        reader.seek(SeekFrom::Start(0))?;
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data, name)
    }

    /// Assemble an archive from its complete bytes.
    #[tracing::instrument(skip(data), fields(len = data.len()))]
    pub fn from_bytes(data: Vec<u8>, name: &str) -> ArchiveResult<Self> {
        let ctx = ReadContext::open(data, name)?;
        Ok(Self::assemble(&ctx))
    }

    /// Assemble from an already opened read context.
    pub fn assemble(ctx: &ReadContext) -> Self {
        let collector = Collector::new(ctx);
        let graph = ctx.graph().clone();

        let bitmaps = collector.bitmaps();
        let sounds = collector.sounds();
        let texts = collector.texts();
        let scripts = collector.scripts();
        let shapes = collector.shapes();

        let bitmap_by_owner = first_wins(&bitmaps, |b| {
            graph.parent_of(b.resource_id).filter(|_| !b.kind.is_auxiliary())
        });
        let sound_by_owner = first_wins(&sounds, |s| graph.parent_of(s.resource_id));
        let script_by_owner = first_wins(&scripts, |s| Some(s.member_id));
        let shape_by_owner = first_wins(&shapes, |s| Some(s.resource_id));

        let mut text_by_owner = Lookup::new();
        let mut field_by_owner = Lookup::new();
        for (i, text) in texts.iter().enumerate() {
            let owner = graph.owner_of(text.resource_id);
            if owner <= 0 {
                continue;
            }
            let is_field = collector
                .members()
                .get(&owner)
                .is_some_and(|m| m.member_type().is_field_like());
            let lookup = if is_field {
                &mut field_by_owner
            } else {
                &mut text_by_owner
            };
            merge_richer(lookup, &texts, owner, i);
        }

        let mut archive = Self {
            file_name: ctx.name().to_string(),
            format: ctx.format().clone(),
            graph,
            raw_resources: ctx.export_resources(),
            cast_libraries: Vec::new(),
            bitmaps,
            sounds,
            texts,
            scripts,
            shapes,
            bitmap_by_owner,
            sound_by_owner,
            text_by_owner,
            field_by_owner,
            script_by_owner,
            shape_by_owner,
        };
        archive.cast_libraries = archive.build_cast_libraries(ctx, &collector);
        tracing::debug!(
            casts = archive.cast_libraries.len(),
            bitmaps = archive.bitmaps.len(),
            sounds = archive.sounds.len(),
            texts = archive.texts.len(),
            scripts = archive.scripts.len(),
            shapes = archive.shapes.len(),
            "archive assembled"
        );
        archive
    }

    /// One library per `CAS*` table. Containers without any table get a single implicit
    /// library (resource id 0) holding every member record in id order.
    fn build_cast_libraries(
        &self,
        ctx: &ReadContext,
        collector: &Collector<'_>,
    ) -> Vec<CastLibrary> {
        let libraries: Vec<CastLibrary> = ctx
            .table()
            .by_tag(Tag::CAS_STAR)
            .map(|entry| {
                let members = read_cast_table(&ctx.load_entry(entry))
                    .into_iter()
                    .enumerate()
                    .filter(|&(_, id)| id > 0)
                    .map(|(i, id)| self.cast_member(i as u32 + 1, id, collector))
                    .collect();
                CastLibrary {
                    resource_id: entry.id,
                    parent_id: self.graph.parent_of(entry.id),
                    members,
                }
            })
            .collect();
        if !libraries.is_empty() || collector.members().is_empty() {
            return libraries;
        }

        let members = collector
            .members()
            .keys()
            .zip(1..)
            .map(|(&id, slot)| self.cast_member(slot, id, collector))
            .collect();
        vec![CastLibrary {
            resource_id: 0,
            parent_id: None,
            members,
        }]
    }

    fn cast_member(&self, slot: u32, id: i32, collector: &Collector<'_>) -> CastMember {
        let chunk = collector.members().get(&id).and_then(|m| m.chunk.as_ref());
        let member_type = chunk
            .map(|c| c.member_type)
            .unwrap_or(CastMemberType::Unknown);
        let script = self.script(id).cloned();
        let name = script
            .as_ref()
            .map(|s| s.name.clone())
            .filter(|n| !n.is_empty())
            .or_else(|| chunk.map(|c| c.name()))
            .unwrap_or_default();
        CastMember {
            bitmap: self.bitmap(id).cloned(),
            text: self.text(id).cloned(),
            field: self.field(id).cloned(),
            sound: self.sound(id).cloned(),
            script,
            shape: self.shape(id).cloned(),
            ..CastMember::new(slot, id, member_type, name)
        }
    }

    /// Logical file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Container facts.
    pub fn format(&self) -> &ContainerFormat {
        &self.format
    }

    /// Detected authoring generation.
    pub fn director_version(&self) -> Option<DirectorVersion> {
        self.format.director_version
    }

    /// Every exportable resource as `<tag>_<id:04>.bin`.
    pub fn raw_resources(&self) -> &[RawResource] {
        &self.raw_resources
    }

    /// Cast libraries in map order.
    pub fn cast_libraries(&self) -> &[CastLibrary] {
        &self.cast_libraries
    }

    /// Key-table links grouped by parent.
    pub fn children_by_parent(&self) -> &BTreeMap<i32, Vec<ResourceKeyLink>> {
        self.graph.children_by_parent()
    }

    /// Owning parent of each linked child.
    pub fn parent_by_child(&self) -> &BTreeMap<i32, i32> {
        self.graph.parent_by_child()
    }

    /// All retained bitmaps.
    pub fn bitmaps(&self) -> &[BitmapRecord] {
        &self.bitmaps
    }

    /// All sounds.
    pub fn sounds(&self) -> &[SoundRecord] {
        &self.sounds
    }

    /// All text and field payloads.
    pub fn texts(&self) -> &[TextRecord] {
        &self.texts
    }

    /// All scripts.
    pub fn scripts(&self) -> &[ScriptRecord] {
        &self.scripts
    }

    /// All shapes.
    pub fn shapes(&self) -> &[ShapeRecord] {
        &self.shapes
    }

    /// Rich text owned by `owner_id`.
    pub fn text(&self, owner_id: i32) -> Option<&TextRecord> {
        self.text_by_owner.get(&owner_id).map(|&i| &self.texts[i])
    }

    /// Field text owned by `owner_id`.
    pub fn field(&self, owner_id: i32) -> Option<&TextRecord> {
        self.field_by_owner.get(&owner_id).map(|&i| &self.texts[i])
    }

    /// Primary bitmap owned by `owner_id` (alpha masks and thumbnails excluded).
    pub fn bitmap(&self, owner_id: i32) -> Option<&BitmapRecord> {
        self.bitmap_by_owner.get(&owner_id).map(|&i| &self.bitmaps[i])
    }

    /// Sound owned by `owner_id`.
    pub fn sound(&self, owner_id: i32) -> Option<&SoundRecord> {
        self.sound_by_owner.get(&owner_id).map(|&i| &self.sounds[i])
    }

    /// Script of member `owner_id`.
    pub fn script(&self, owner_id: i32) -> Option<&ScriptRecord> {
        self.script_by_owner.get(&owner_id).map(|&i| &self.scripts[i])
    }

    /// Shape of member `owner_id`.
    pub fn shape(&self, owner_id: i32) -> Option<&ShapeRecord> {
        self.shape_by_owner.get(&owner_id).map(|&i| &self.shapes[i])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/archive/movie.rs"]
mod tests;
