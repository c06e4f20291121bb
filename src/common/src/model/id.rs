use std::fmt::Display;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier shared by players, rounds and matches.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub struct Id(pub Uuid);

impl Id {
    pub fn new() -> Self {
        Id(Uuid::new_v4())
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let uuid = Uuid::parse_str(&s).map_err(serde::de::Error::custom)?;
        Ok(Id(uuid))
    }
}
impl Serialize for Id {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_string() {
        let id = Id::new();
        let json = serde_json::to_string(&id).expect("Failed to serialize id");
        assert_eq!(json, format!("\"{}\"", id));

        let parsed: Id = serde_json::from_str(&json).expect("Failed to parse id");
        assert_eq!(parsed, id);
    }

    #[test]
    fn rejects_malformed_uuid() {
        assert!(serde_json::from_str::<Id>("\"not-a-uuid\"").is_err());
    }
}
