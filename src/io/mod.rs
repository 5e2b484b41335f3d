//! Endian-aware byte-stream primitives shared by every reader and writer.

pub(crate) mod reader;
pub(crate) mod tag;
pub(crate) mod writer;
