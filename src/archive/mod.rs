//! Archive assembly: decoded payloads joined to their owners and grouped into cast
//! libraries.

pub(crate) mod cast;
pub(crate) mod collect;
pub(crate) mod movie;
