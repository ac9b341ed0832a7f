// src/remote/records.rs
//
// Wire payloads as the catalog API serves them. Every field is
// optional: the API makes no promises, so absence is handled at
// insert time, not at parse time.

use serde::Deserialize;

/// One catalog character.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CharacterRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub photo: Option<String>,
    pub favorite: Option<bool>,
    pub description: Option<String>,
}

/// One sighting. The API spells several fields in Spanish and nests
/// the owning character under `hero`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocationRecord {
    pub id: Option<String>,

    #[serde(rename = "dateShow")]
    pub date: Option<String>,

    #[serde(rename = "latitud")]
    pub latitude: Option<String>,

    #[serde(rename = "longitud")]
    pub longitude: Option<String>,

    #[serde(rename = "hero")]
    pub character: Option<CharacterRecord>,
}

/// One transformation, nested owner under `hero` like locations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub photo: Option<String>,

    #[serde(rename = "hero")]
    pub character: Option<CharacterRecord>,
}
