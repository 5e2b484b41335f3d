use crate::{
    container::locate::signature_endian,
    foundation::{
        error::{ArchiveError, ArchiveResult},
        version::DirectorVersion,
    },
    io::{
        reader::{ByteReader, Endian},
        tag::Tag,
    },
};

/// Size of the signature + length + codec header.
pub const HEADER_LEN: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// Codec tag stored after the container length.
pub enum Codec {
    /// `MV93`: classic movie or cast.
    Mv93,
    /// `MC95`: classic protected movie or cast.
    Mc95,
    /// `APPL`: classic Mac projector payload.
    Appl,
    /// `FGDM`: Afterburner movie.
    Fgdm,
    /// `FGDC`: Afterburner cast.
    Fgdc,
    /// Any other tag; treated as classic.
    Other(Tag),
}

impl Codec {
    /// Classify a codec tag.
    pub fn from_tag(tag: Tag) -> Self {
        match tag {
            Tag::MV93 => Self::Mv93,
            Tag::MC95 => Self::Mc95,
            Tag::APPL => Self::Appl,
            Tag::FGDM => Self::Fgdm,
            Tag::FGDC => Self::Fgdc,
            other => Self::Other(other),
        }
    }

    /// Tag written for this codec.
    pub fn tag(self) -> Tag {
        match self {
            Self::Mv93 => Tag::MV93,
            Self::Mc95 => Tag::MC95,
            Self::Appl => Tag::APPL,
            Self::Fgdm => Tag::FGDM,
            Self::Fgdc => Tag::FGDC,
            Self::Other(tag) => tag,
        }
    }

    /// Whether the container uses the segmented (compressed) map.
    pub fn is_afterburner(self) -> bool {
        matches!(self, Self::Fgdm | Self::Fgdc)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Container-level facts established by the header and map.
pub struct ContainerFormat {
    /// Offset of the signature inside the input (non-zero behind a projector stub).
    pub signature_offset: usize,
    /// Byte order implied by the signature spelling.
    pub endian: Endian,
    /// Payload length declared in the header.
    pub declared_size: u32,
    /// Codec tag.
    pub codec: Codec,
    /// Classic `imap` map version (0 for Afterburner).
    pub map_version: u32,
    /// Classic `imap` archive-version word (0 for Afterburner).
    pub archive_version: u32,
    /// Afterburner `Fver` version number.
    pub afterburner_fver: Option<u32>,
    /// Afterburner `Fver` version string.
    pub afterburner_version: Option<String>,
    /// Derived tool generation, when it can be determined.
    pub director_version: Option<DirectorVersion>,
}

impl ContainerFormat {
    /// Offset of the first byte after the 12-byte header.
    pub fn payload_start(&self) -> usize {
        self.signature_offset + HEADER_LEN
    }

    /// Whether the container uses the segmented map.
    pub fn is_afterburner(&self) -> bool {
        self.codec.is_afterburner()
    }
}

/// Read the 12-byte header at `offset`. Map-derived fields start zeroed.
pub fn read_header(data: &[u8], offset: usize) -> ArchiveResult<ContainerFormat> {
    let mut r = ByteReader::big(data);
    r.seek(offset);
    let raw = r
        .read_raw_tag()
        .map_err(|_| ArchiveError::signature("container header is truncated"))?;
    let endian = signature_endian(raw)
        .ok_or_else(|| ArchiveError::signature(format!("'{raw}' is not a container signature")))?;
    r.set_endian(endian);
    let declared_size = r
        .read_u32()
        .map_err(|_| ArchiveError::signature("container header is truncated"))?;
    let codec = Codec::from_tag(
        r.read_tag()
            .map_err(|_| ArchiveError::signature("container header is truncated"))?,
    );
    tracing::debug!(offset, ?endian, ?codec, declared_size, "container header");
    Ok(ContainerFormat {
        signature_offset: offset,
        endian,
        declared_size,
        codec,
        map_version: 0,
        archive_version: 0,
        afterburner_fver: None,
        afterburner_version: None,
        director_version: None,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/container/header.rs"]
mod tests;
