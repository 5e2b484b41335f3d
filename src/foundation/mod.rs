//! Crate-wide error taxonomy and authoring-tool version model.

pub(crate) mod error;
pub(crate) mod version;
