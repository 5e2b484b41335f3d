use crate::io::{reader::be_u16_at, tag::Tag};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
/// Sound payload classification.
pub enum SoundKind {
    /// Not recognised.
    Unknown,
    /// RIFF WAVE.
    Wave,
    /// AIFF or AIFF-C.
    Aiff,
    /// MPEG audio, with or without an ID3 tag.
    Mp3,
    /// Ogg container.
    Ogg,
    /// Classic Mac `snd ` resource.
    MacSnd,
}

impl SoundKind {
    /// File extension used when exporting this kind.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Wave => "wav",
            Self::Aiff => "aif",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::MacSnd => "snd",
            Self::Unknown => "bin",
        }
    }
}

/// Child tags tried in order when resolving a composite record's sound; standalone
/// entries with these tags are collected too.
pub const CHILD_PRIORITY: [Tag; 4] = [Tag::MEDI, Tag::SNDS, Tag::SND_UPPER, Tag::SND_LOWER];

type Sniffer = fn(&[u8]) -> bool;

const SNIFFERS: [(Sniffer, SoundKind); 5] = [
    (is_wave, SoundKind::Wave),
    (is_aiff, SoundKind::Aiff),
    (is_ogg, SoundKind::Ogg),
    (is_mp3, SoundKind::Mp3),
    (is_mac_snd, SoundKind::MacSnd),
];

fn is_wave(b: &[u8]) -> bool {
    b.len() >= 12 && &b[..4] == b"RIFF" && &b[8..12] == b"WAVE"
}

fn is_aiff(b: &[u8]) -> bool {
    b.len() >= 12 && &b[..4] == b"FORM" && (&b[8..12] == b"AIFF" || &b[8..12] == b"AIFC")
}

fn is_ogg(b: &[u8]) -> bool {
    b.starts_with(b"OggS")
}

fn is_mp3(b: &[u8]) -> bool {
    b.starts_with(b"ID3") || (b.len() >= 2 && b[0] == 0xFF && b[1] & 0xE0 == 0xE0)
}

/// Format 1 carries a data-format count, format 2 a reference count; both stay small.
fn is_mac_snd(b: &[u8]) -> bool {
    b.len() >= 10
        && matches!(be_u16_at(b, 0), Some(1 | 2))
        && be_u16_at(b, 2).is_some_and(|n| n <= 8)
}

/// Classify sound bytes from their header.
pub fn detect(bytes: &[u8]) -> SoundKind {
    SNIFFERS
        .iter()
        .find(|(sniff, _)| sniff(bytes))
        .map(|(_, kind)| *kind)
        .unwrap_or(SoundKind::Unknown)
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Classified sound payload.
pub struct SoundRecord {
    /// Id of the resource holding the samples.
    pub resource_id: i32,
    /// Payload classification.
    pub kind: SoundKind,
    /// Raw payload.
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl SoundRecord {
    /// Classify a payload; empty payloads yield `None`.
    pub fn decode(resource_id: i32, bytes: Vec<u8>) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        Some(Self {
            resource_id,
            kind: detect(&bytes),
            bytes,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/decode/sound.rs"]
mod tests;
