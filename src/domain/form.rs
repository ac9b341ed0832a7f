use serde::{Deserialize, Serialize};

/// A transformation a character can take, as held in the local store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: String,

    /// Form name, unique per character in practice but not enforced.
    pub name: String,

    /// Free-form description.
    pub info: String,

    /// Artwork URL.
    pub photo: String,

    /// Owning character, when the form could be linked to one.
    pub character_id: Option<String>,
}
