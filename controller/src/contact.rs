//! Contacts reported by the host's physics

use crate::player::{AMMO_TAG, LAVA_TAG, MEDKIT_TAG};
use crate::signals::ObjectId;

/// What kind of object was touched
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContactTag {
    Ammo,
    MedKit,
    Lava,
    Other(String),
}

impl ContactTag {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            AMMO_TAG => ContactTag::Ammo,
            MEDKIT_TAG => ContactTag::MedKit,
            LAVA_TAG => ContactTag::Lava,
            other => ContactTag::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ContactTag::Ammo => AMMO_TAG,
            ContactTag::MedKit => MEDKIT_TAG,
            ContactTag::Lava => LAVA_TAG,
            ContactTag::Other(tag) => tag,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactPhase {
    /// First tick of touching
    Begin,
    /// Still touching
    Persist,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactEvent {
    pub tag: ContactTag,
    pub object: ObjectId,
    pub phase: ContactPhase,
}

impl ContactEvent {
    pub fn new(tag: ContactTag, object: ObjectId, phase: ContactPhase) -> Self {
        Self { tag, object, phase }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_names() {
        for tag in ["Ammo", "MedKit", "Lava", "Crate"] {
            assert_eq!(ContactTag::from_tag(tag).as_str(), tag);
        }
        assert_eq!(ContactTag::from_tag("ammo"), ContactTag::Other("ammo".into()));
    }
}
