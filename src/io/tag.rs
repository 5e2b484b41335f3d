use std::fmt;

use crate::foundation::error::{ArchiveError, ArchiveResult};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Four-character chunk identifier, stored in reading order (`b"CASt"`).
///
/// Little-endian containers store tags byte-reversed on disk; [`crate::ByteReader`] and
/// [`crate::ByteWriter`] apply the reversal so a `Tag` is always in reading order.
pub struct Tag(pub [u8; 4]);

impl Tag {
    /// Big-endian container signature.
    pub const RIFX: Self = Self(*b"RIFX");
    /// Little-endian container signature, as read literally from disk.
    pub const XFIR: Self = Self(*b"XFIR");
    /// Movie codec.
    pub const MV93: Self = Self(*b"MV93");
    /// Protected movie / cast codec.
    pub const MC95: Self = Self(*b"MC95");
    /// Classic Mac codec.
    pub const APPL: Self = Self(*b"APPL");
    /// Afterburner movie codec.
    pub const FGDM: Self = Self(*b"FGDM");
    /// Afterburner cast codec.
    pub const FGDC: Self = Self(*b"FGDC");
    /// Initial map.
    pub const IMAP: Self = Self(*b"imap");
    /// Memory map.
    pub const MMAP: Self = Self(*b"mmap");
    /// Key table (child to parent links).
    pub const KEY: Self = Self(*b"KEY*");
    /// Free map slot.
    pub const FREE: Self = Self(*b"free");
    /// Junk map slot.
    pub const JUNK: Self = Self(*b"junk");
    /// Afterburner version chunk.
    pub const FVER: Self = Self(*b"Fver");
    /// Afterburner compression descriptor chunk.
    pub const FCDR: Self = Self(*b"Fcdr");
    /// Afterburner resource map.
    pub const ABMP: Self = Self(*b"ABMP");
    /// Afterburner segment area.
    pub const FGEI: Self = Self(*b"FGEI");
    /// Cast table.
    pub const CAS_STAR: Self = Self(*b"CAS*");
    /// Cast member record.
    pub const CAST_MEMBER: Self = Self(*b"CASt");
    /// Legacy cast member record.
    pub const CAST_LEGACY: Self = Self(*b"CAST");
    /// Compiled script bytecode.
    pub const LSCR: Self = Self(*b"Lscr");
    /// Script context table.
    pub const LCTX: Self = Self(*b"Lctx");
    /// Plain styled text.
    pub const STXT: Self = Self(*b"STXT");
    /// Rich text (styled runs).
    pub const XMED: Self = Self(*b"XMED");
    /// Run-length bitmap pixels.
    pub const BITD: Self = Self(*b"BITD");
    /// Windows device-independent bitmap.
    pub const DIB: Self = Self(*b"DIB ");
    /// QuickDraw picture.
    pub const PICT: Self = Self(*b"PICT");
    /// Alpha mask.
    pub const ALFA: Self = Self(*b"ALFA");
    /// Thumbnail image.
    pub const THUM: Self = Self(*b"Thum");
    /// Authoring media metadata.
    pub const MEDI: Self = Self(*b"ediM");
    /// Sound samples.
    pub const SNDS: Self = Self(*b"sndS");
    /// Sound (upper case).
    pub const SND_UPPER: Self = Self(*b"SND ");
    /// Sound (lower case).
    pub const SND_LOWER: Self = Self(*b"snd ");

    /// Build a tag from a string of exactly four ASCII characters.
    pub fn parse(text: &str) -> ArchiveResult<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != 4 || !text.is_ascii() {
            return Err(ArchiveError::validation(format!(
                "tag '{text}' must be exactly 4 ASCII characters"
            )));
        }
        Ok(Self([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Tag bytes reversed (on-disk order in little-endian containers).
    pub fn reversed(self) -> Self {
        let [a, b, c, d] = self.0;
        Self([d, c, b, a])
    }

    /// Tag as text, with non-ASCII bytes replaced.
    pub fn as_string(self) -> String {
        self.0
            .iter()
            .map(|&b| if b.is_ascii() { b as char } else { '?' })
            .collect()
    }

    /// Tag text with surrounding whitespace removed, for use in file names.
    pub fn file_stem(self) -> String {
        self.as_string().trim().to_string()
    }

    /// Whether this tag marks a free or junk map slot.
    pub fn is_free(self) -> bool {
        self == Self::FREE || self == Self::JUNK
    }

    /// Case-insensitive prefix test.
    pub fn starts_with_ignore_case(self, prefix: &str) -> bool {
        let text = self.as_string().to_ascii_uppercase();
        text.starts_with(&prefix.to_ascii_uppercase())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?})", self.as_string())
    }
}

impl serde::Serialize for Tag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_string())
    }
}

impl<'de> serde::Deserialize<'de> for Tag {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/tag.rs"]
mod tests;
