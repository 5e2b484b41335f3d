use std::collections::BTreeMap;

use crate::{io::tag::Tag, resources::entry::ResourceKeyLink};

/// Parent/child relationship maps derived from the key table.
///
/// Built once per read pass and never patched afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ResourceGraph {
    children_by_parent: BTreeMap<i32, Vec<ResourceKeyLink>>,
    parent_by_child: BTreeMap<i32, i32>,
}

impl ResourceGraph {
    /// Derive both maps from `links`. A child linked twice keeps its first parent.
    pub fn build(links: &[ResourceKeyLink]) -> Self {
        let mut children_by_parent: BTreeMap<i32, Vec<ResourceKeyLink>> = BTreeMap::new();
        let mut parent_by_child = BTreeMap::new();
        for link in links {
            children_by_parent
                .entry(link.parent_id)
                .or_default()
                .push(*link);
            parent_by_child.entry(link.child_id).or_insert(link.parent_id);
        }
        Self {
            children_by_parent,
            parent_by_child,
        }
    }

    /// Links owned by `parent_id`, in key-table order.
    pub fn children(&self, parent_id: i32) -> &[ResourceKeyLink] {
        self.children_by_parent
            .get(&parent_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First child of `parent_id` carrying `tag`.
    pub fn child_with_tag(&self, parent_id: i32, tag: Tag) -> Option<i32> {
        self.children(parent_id)
            .iter()
            .find(|l| l.tag == tag)
            .map(|l| l.child_id)
    }

    /// Owning parent of `child_id`.
    pub fn parent_of(&self, child_id: i32) -> Option<i32> {
        self.parent_by_child.get(&child_id).copied()
    }

    /// Owning parent of `id`, or `id` itself when unlinked.
    pub fn owner_of(&self, id: i32) -> i32 {
        self.parent_of(id).unwrap_or(id)
    }

    /// Full children-by-parent map.
    pub fn children_by_parent(&self) -> &BTreeMap<i32, Vec<ResourceKeyLink>> {
        &self.children_by_parent
    }

    /// Full parent-by-child map.
    pub fn parent_by_child(&self) -> &BTreeMap<i32, i32> {
        &self.parent_by_child
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resources/graph.rs"]
mod tests;
