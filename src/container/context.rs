use crate::{
    container::{
        afterburner::{AfterburnerState, read_afterburner_map},
        classic::{load_classic, read_classic_map},
        header::{ContainerFormat, read_header},
        keys::parse_key_table,
        locate::locate_signature,
    },
    foundation::{error::ArchiveResult, version::DirectorVersion},
    io::tag::Tag,
    resources::{
        entry::{ResourceEntry, Storage},
        graph::ResourceGraph,
        table::ResourceTable,
    },
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// One exported raw resource.
pub struct RawResource {
    /// Resource id.
    pub id: i32,
    /// Chunk tag.
    pub tag: Tag,
    /// Export name, `<tag>_<id:04>.bin`.
    pub file_name: String,
    /// Payload bytes.
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// State of one read pass: the input bytes, header facts, resource table and graph, and
/// (for segmented containers) the lazily filled segment cache.
///
/// Construction either fully succeeds or fails structurally; a context is never half-built.
#[derive(Debug)]
pub struct ReadContext {
    name: String,
    data: Vec<u8>,
    format: ContainerFormat,
    table: ResourceTable,
    graph: ResourceGraph,
    afterburner: Option<AfterburnerState>,
}

impl ReadContext {
    /// Locate the container in `data` and read its map and key table.
    #[tracing::instrument(skip(data), fields(len = data.len()))]
    pub fn open(data: Vec<u8>, name: &str) -> ArchiveResult<Self> {
        let offset = locate_signature(&data)?;
        let mut format = read_header(&data, offset)?;
        let mut table = ResourceTable::new();

        let afterburner = if format.is_afterburner() {
            let map = read_afterburner_map(&data, &format)?;
            format.afterburner_fver = Some(map.fver);
            format.director_version = map
                .version
                .as_deref()
                .and_then(DirectorVersion::from_version_string);
            format.afterburner_version = map.version.clone();
            let state = AfterburnerState::new(&map);
            for entry in map.entries {
                table.push(entry);
            }
            Some(state)
        } else {
            let map = read_classic_map(&data, &format)?;
            format.map_version = map.map_version;
            format.archive_version = map.archive_version;
            format.director_version =
                Some(DirectorVersion::from_archive_version(map.archive_version));
            for entry in map.entries {
                table.push(entry);
            }
            None
        };

        let mut ctx = Self {
            name: name.to_string(),
            data,
            format,
            table,
            graph: ResourceGraph::default(),
            afterburner,
        };
        ctx.read_key_table();
        tracing::debug!(
            name,
            entries = ctx.table.len(),
            links = ctx.table.links().len(),
            version = ?ctx.format.director_version,
            "container opened"
        );
        Ok(ctx)
    }

    fn read_key_table(&mut self) {
        let key = self.table.by_tag(Tag::KEY).next().cloned();
        if let Some(key) = key {
            let bytes = self.load_entry(&key);
            match parse_key_table(&bytes, self.format.endian) {
                Ok(links) => {
                    for link in links {
                        self.table.push_link(link);
                    }
                }
                Err(e) => tracing::warn!(id = key.id, error = %e, "key table unreadable"),
            }
        }
        self.graph = self.table.graph();
    }

    /// Logical name supplied by the caller.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header and map facts.
    pub fn format(&self) -> &ContainerFormat {
        &self.format
    }

    /// Registered entries and links.
    pub fn table(&self) -> &ResourceTable {
        &self.table
    }

    /// Relationship graph derived from the key table.
    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    /// Segment store, for segmented containers.
    pub fn afterburner(&self) -> Option<&AfterburnerState> {
        self.afterburner.as_ref()
    }

    /// Payload for resource `id`; empty when the id is unknown or the payload unreadable.
    pub fn load(&self, id: i32) -> Vec<u8> {
        self.table
            .get(id)
            .map(|e| self.load_entry(e))
            .unwrap_or_default()
    }

    /// Payload for `entry`. Failures are logged and yield an empty payload.
    pub fn load_entry(&self, entry: &ResourceEntry) -> Vec<u8> {
        if entry.is_free() {
            return Vec::new();
        }
        match entry.storage {
            Storage::Classic { .. } => load_classic(&self.data, &self.format, entry),
            Storage::Segment { .. } => {
                let Some(state) = &self.afterburner else {
                    return Vec::new();
                };
                state.load(&self.data, entry).unwrap_or_else(|e| {
                    tracing::warn!(id = entry.id, tag = %entry.tag, error = %e, "segment unreadable");
                    Vec::new()
                })
            }
        }
    }

    /// Every exportable resource (free and zero-size entries skipped) with a non-empty payload.
    pub fn export_resources(&self) -> Vec<RawResource> {
        self.table
            .entries()
            .iter()
            .filter(|e| e.is_exportable())
            .filter_map(|e| {
                let bytes = self.load_entry(e);
                (!bytes.is_empty()).then(|| RawResource {
                    id: e.id,
                    tag: e.tag,
                    file_name: e.file_name("bin"),
                    bytes,
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/context.rs"]
mod tests;
