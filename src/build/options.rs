use crate::{
    foundation::version::DirectorVersion,
    io::{reader::Endian, tag::Tag},
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Container writer configuration.
///
/// Deserialises from JSON with every field optional:
/// `{"endian": "big", "codec": "MC95", "director_version": 850}`.
pub struct WriterOptions {
    /// Byte order; selects the `RIFX` or `XFIR` signature.
    pub endian: Endian,
    /// Codec tag written after the container length.
    pub codec: Tag,
    /// Generation recorded in the `imap` map and archive version words.
    pub director_version: DirectorVersion,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            endian: Endian::Little,
            codec: Tag::MV93,
            director_version: DirectorVersion::D10,
        }
    }
}

impl WriterOptions {
    /// Defaults for an output file extension: `dct`/`dxr` (protected) use `MC95`, everything
    /// else `MV93`.
    pub fn for_extension(ext: &str) -> Self {
        let codec = match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "dct" | "dxr" => Tag::MC95,
            _ => Tag::MV93,
        };
        Self {
            codec,
            ..Self::default()
        }
    }

    /// Same options with the given byte order.
    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/build/options.rs"]
mod tests;
