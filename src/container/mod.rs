//! Container loaders: signature location, header, the classic `imap`/`mmap` map, the
//! segmented Afterburner directory, and the per-pass read context tying them together.

pub(crate) mod afterburner;
pub(crate) mod classic;
pub(crate) mod context;
pub(crate) mod header;
pub(crate) mod keys;
pub(crate) mod locate;
