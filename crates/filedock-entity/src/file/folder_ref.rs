//! The owning-folder reference as it travels over the wire.
//!
//! Clients address the root level with the literal `"root"`. Inside the
//! crate that is `None`; in PostgreSQL it is `NULL`.

use serde::{Deserialize, Deserializer, Serializer};
use uuid::Uuid;

/// The wire value naming the root level.
pub const ROOT: &str = "root";

/// Parse a folder reference. `"root"`, the empty string and `"null"` all
/// name the root level.
pub fn parse(value: &str) -> Result<Option<Uuid>, uuid::Error> {
    let value = value.trim();
    if value.is_empty() || value == ROOT || value == "null" {
        return Ok(None);
    }
    Uuid::parse_str(value).map(Some)
}

/// Serialize `None` as `"root"` and `Some(id)` as the id string.
pub fn serialize<S>(folder: &Option<Uuid>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match folder {
        Some(id) => serializer.collect_str(id),
        None => serializer.serialize_str(ROOT),
    }
}

/// Accept `"root"`, `null`, or a UUID string.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(value) => parse(&value).map_err(serde::de::Error::custom),
    }
}

/// Same as the module-level functions, for `Option<Option<Uuid>>` fields
/// where an absent field means "unchanged".
pub mod optional {
    use serde::{Deserialize, Deserializer};
    use uuid::Uuid;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<Uuid>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(Some(None)),
            Some(value) => super::parse(&value)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
