//! Serde support for patch DTOs.

use serde::{Deserialize, Deserializer};

/// Deserializer for clearable patch fields.
///
/// A plain `Option<T>` cannot tell JSON `null` from an absent key, so
/// a nullable column could never be cleared through a patch. Fields
/// where clearing matters are declared `Option<Option<T>>` instead:
/// absent maps to `None` (leave untouched), `null` to `Some(None)`
/// (clear), and a value to `Some(Some(v))` (set). Annotate them with
/// `#[serde(default, deserialize_with = "patch::clearable")]`.
pub fn clearable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
