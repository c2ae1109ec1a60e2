//! Field-level diff computation for the change log.
//!
//! Admin and owner edits record one append-only change row per field
//! whose new value differs from the stored one. Old and new values
//! are serialized to JSON text so the log can hold any field type.

use serde::Serialize;

/// One recorded field change: the field name plus serialized old and
/// new values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub old_value: String,
    pub new_value: String,
}

/// Accumulates [`FieldChange`]s while a patch is applied.
///
/// Call [`record`](Self::record) for each field present in the patch;
/// equal values are skipped so untouched fields never produce rows.
#[derive(Debug, Default)]
pub struct ChangeSet {
    changes: Vec<FieldChange>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change for `field` if `new` differs from `old`.
    ///
    /// Returns whether a change was recorded, so callers can decide
    /// whether to apply the new value.
    pub fn record<T: Serialize + PartialEq>(
        &mut self,
        field: &'static str,
        old: &T,
        new: &T,
    ) -> bool {
        if old == new {
            return false;
        }
        self.changes.push(FieldChange {
            field,
            old_value: serialize(old),
            new_value: serialize(new),
        });
        true
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn into_changes(self) -> Vec<FieldChange> {
        self.changes
    }
}

/// Serialize a field value to JSON text for storage.
///
/// Serialization of plain field values (strings, numbers, bools,
/// options) cannot fail; a failure would indicate a non-serializable
/// field type, which is a programming error surfaced as `"null"`.
fn serialize<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}
