use serde::{Deserialize, Serialize};

/// A catalog character as held in the local store.
///
/// Snapshots are plain values: mutating one never touches the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Identifier assigned by the catalog service.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Portrait URL.
    pub photo: String,

    /// Whether the catalog marks this character as a favorite.
    pub favorite: bool,

    /// Free-form description.
    pub description: String,
}

/// Structured predicate for store queries. Empty filter matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterFilter {
    /// Exact id match.
    pub id: Option<String>,

    /// Substring match on the name, case- and accent-insensitive.
    pub name_contains: Option<String>,
}

impl CharacterFilter {
    /// Filter on the exact character id.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name_contains: None,
        }
    }

    /// Filter on names containing `fragment`.
    pub fn name_contains(fragment: impl Into<String>) -> Self {
        Self {
            id: None,
            name_contains: Some(fragment.into()),
        }
    }
}

/// Sort directive for name-ordered queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}
