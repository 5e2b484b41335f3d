use std::collections::HashMap;

use crate::{
    io::tag::Tag,
    resources::{
        entry::{ResourceEntry, ResourceKeyLink},
        graph::ResourceGraph,
    },
};

/// Append-only registry of resource entries and key-table edges for one read pass.
#[derive(Clone, Debug, Default)]
pub struct ResourceTable {
    entries: Vec<ResourceEntry>,
    index: HashMap<i32, usize>,
    links: Vec<ResourceKeyLink>,
}

impl ResourceTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry. A duplicate id is logged and ignored; returns whether it was added.
    pub fn push(&mut self, entry: ResourceEntry) -> bool {
        if self.index.contains_key(&entry.id) {
            tracing::warn!(id = entry.id, tag = %entry.tag, "duplicate resource id ignored");
            return false;
        }
        self.index.insert(entry.id, self.entries.len());
        self.entries.push(entry);
        true
    }

    /// Register a key-table edge.
    pub fn push_link(&mut self, link: ResourceKeyLink) {
        self.links.push(link);
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    /// Key-table edges in registration order.
    pub fn links(&self) -> &[ResourceKeyLink] {
        &self.links
    }

    /// Entry by id.
    pub fn get(&self, id: i32) -> Option<&ResourceEntry> {
        self.index.get(&id).map(|&i| &self.entries[i])
    }

    /// Number of registered entries, free slots included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live entries carrying `tag`, in registration order.
    pub fn by_tag(&self, tag: Tag) -> impl Iterator<Item = &ResourceEntry> {
        self.entries
            .iter()
            .filter(move |e| e.tag == tag && !e.is_free())
    }

    /// Build the relationship graph from the registered edges.
    pub fn graph(&self) -> ResourceGraph {
        ResourceGraph::build(&self.links)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resources/table.rs"]
mod tests;
