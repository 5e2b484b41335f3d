use crate::{
    decode::{
        bitmap::BitmapRecord, member::CastMemberType, script::ScriptRecord, shape::ShapeRecord,
        sound::SoundRecord, text::TextRecord,
    },
    io::reader::ByteReader,
};

/// Member ids listed in a `CAS*` payload, one big-endian u32 per slot.
pub fn read_cast_table(bytes: &[u8]) -> Vec<i32> {
    let mut r = ByteReader::big(bytes);
    std::iter::from_fn(|| r.read_u32().ok())
        .map(|id| id as i32)
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// One populated slot of a cast library.
pub struct CastMember {
    /// 1-based slot number inside the library.
    pub slot: u32,
    /// Id of the member's `CASt` resource.
    pub resource_id: i32,
    /// Member type.
    pub member_type: CastMemberType,
    /// Member name, empty when none is stored.
    pub name: String,
    /// Bitmap payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitmap: Option<BitmapRecord>,
    /// Rich-text payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextRecord>,
    /// Field payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<TextRecord>,
    /// Sound payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<SoundRecord>,
    /// Script payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<ScriptRecord>,
    /// Shape record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<ShapeRecord>,
}

impl CastMember {
    /// Member with no payloads attached yet.
    pub fn new(slot: u32, resource_id: i32, member_type: CastMemberType, name: String) -> Self {
        Self {
            slot,
            resource_id,
            member_type,
            name,
            bitmap: None,
            text: None,
            field: None,
            sound: None,
            script: None,
            shape: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// A cast library (`CAS*`) and its members in slot order.
pub struct CastLibrary {
    /// Id of the `CAS*` resource, or 0 for the implicit library of a container without one.
    pub resource_id: i32,
    /// Owning resource from the key table.
    pub parent_id: Option<i32>,
    /// Populated slots.
    pub members: Vec<CastMember>,
}

#[cfg(test)]
#[path = "../../tests/unit/archive/cast.rs"]
mod tests;
