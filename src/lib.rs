//! rifxkit reads and writes legacy Director movie and cast archives.
//!
//! Both container families are supported: the classic `RIFX`/`XFIR` resource map and the
//! compressed Afterburner directory. The public surface is archive-oriented:
//!
//! - Open a [`MovieArchive`] from a path, stream or byte buffer
//! - Inspect its cast libraries and the decoded bitmap, text, sound, script and shape payloads
//! - Write resource lists back out with [`ContainerWriter`], or synthesise single-member
//!   libraries with the builders
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod archive;
mod build;
mod container;
mod decode;
mod foundation;
mod io;
mod resources;

pub use crate::foundation::error::{ArchiveError, ArchiveResult};
pub use crate::foundation::version::DirectorVersion;

pub use crate::io::reader::{ByteReader, Endian, latin1};
pub use crate::io::tag::Tag;
pub use crate::io::writer::{ByteWriter, encode_latin1};

pub use crate::resources::entry::{
    CompressionDescriptor, CompressionKind, ResourceEntry, ResourceKeyLink, Storage,
};
pub use crate::resources::graph::ResourceGraph;
pub use crate::resources::table::ResourceTable;

pub use crate::container::afterburner::inflate;
pub use crate::container::context::{RawResource, ReadContext};
pub use crate::container::header::{Codec, ContainerFormat};

pub use crate::decode::bitmap::{BitmapKind, BitmapRecord};
pub use crate::decode::markup::{Alignment, Span};
pub use crate::decode::member::{CastMemberType, MemberChunk, MemberLayout};
pub use crate::decode::script::{InfoLayout, ScriptDescriptor, ScriptKind, ScriptRecord};
pub use crate::decode::shape::{ShapeGeometry, ShapeKind, ShapeLayout, ShapeRecord};
pub use crate::decode::sound::{SoundKind, SoundRecord};
pub use crate::decode::text::{StxtDocument, TextKind, TextRecord, read_stxt};
pub use crate::decode::xmed::{XmedDocument, read_xmed};

pub use crate::archive::cast::{CastLibrary, CastMember};
pub use crate::archive::movie::MovieArchive;

pub use crate::build::container::{ContainerWriter, ResourceFile, parse_resource_name};
pub use crate::build::library::{
    BitmapPayloads, bitmap_library, cast_member_metadata, cast_table, key_table, sound_library,
};
pub use crate::build::options::WriterOptions;
pub use crate::build::script::{ScriptMember, behavior_library, context_table};
pub use crate::build::shape::ShapeWriter;
