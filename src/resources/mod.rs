//! Resource table (ordered entry registry) and the key-table relationship graph.

pub(crate) mod entry;
pub(crate) mod graph;
pub(crate) mod table;
