// src/store/character_store.rs
//
// Character persistence over pooled SQLite connections.
//
// Steady-state operations never fail outward: a broken disk or a
// poisoned row is logged and answered with "nothing here", because a
// read-through cache that errors on reads is worse than an empty one.
// Opening the store is the exception; a store that cannot be created
// is reported as such.

use std::sync::Arc;

use rusqlite::{params, Connection, Row};
use tracing::{debug, error, warn};

use crate::db::{create_connection_pool, initialize_database, ConnectionPool, StoreMode};
use crate::domain::{Character, CharacterFilter, Form, Location, SortOrder};
use crate::error::AppResult;
use crate::remote::records::{CharacterRecord, FormRecord, LocationRecord};

/// Local persistence for characters and their dependent records.
///
/// Insertions take wire records as-is; queries return domain
/// snapshots. Each mutating call is one transaction.
pub trait CharacterStore: Send + Sync {
    /// Upsert a batch of characters by id. Records without an id are
    /// skipped.
    fn insert_characters(&self, records: &[CharacterRecord]);

    /// Upsert a batch of sightings, linking each to its owning
    /// character when that character is already stored.
    fn insert_locations(&self, records: &[LocationRecord]);

    /// Upsert a batch of forms, linking like [`insert_locations`].
    ///
    /// [`insert_locations`]: CharacterStore::insert_locations
    fn insert_forms(&self, records: &[FormRecord]);

    /// Characters matching `filter`, name-ordered per `order`.
    fn query_characters(&self, filter: &CharacterFilter, order: SortOrder) -> Vec<Character>;

    /// The character with this exact id, if stored.
    fn character_by_id(&self, id: &str) -> Option<Character>;

    /// Sightings linked to a character, in insertion order.
    fn locations_for(&self, character_id: &str) -> Vec<Location>;

    /// Forms linked to a character, in insertion order.
    fn forms_for(&self, character_id: &str) -> Vec<Form>;

    /// Delete every stored row, children first, in one transaction.
    fn wipe(&self);
}

pub struct SqliteCharacterStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteCharacterStore {
    /// Open a store in the given mode, creating the schema if needed.
    pub fn open(mode: StoreMode) -> AppResult<Self> {
        let pool = create_connection_pool(&mode)?;
        let conn = pool.get()?;
        initialize_database(&conn)?;
        drop(conn);

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Open a throwaway in-memory store.
    pub fn open_in_memory() -> AppResult<Self> {
        Self::open(StoreMode::InMemory)
    }

    /// Open the durable store at the platform's default location.
    pub fn open_default() -> AppResult<Self> {
        let path = crate::db::default_database_path()?;
        Self::open(StoreMode::OnDisk(path))
    }

    fn row_to_character(row: &Row) -> Result<Character, rusqlite::Error> {
        Ok(Character {
            id: row.get("id")?,
            name: row.get("name")?,
            photo: row.get("photo")?,
            favorite: row.get("favorite")?,
            description: row.get("description")?,
        })
    }

    fn row_to_location(row: &Row) -> Result<Location, rusqlite::Error> {
        Ok(Location {
            id: row.get("id")?,
            date: row.get("date")?,
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
            character_id: row.get("character_id")?,
        })
    }

    fn row_to_form(row: &Row) -> Result<Form, rusqlite::Error> {
        Ok(Form {
            id: row.get("id")?,
            name: row.get("name")?,
            info: row.get("info")?,
            photo: row.get("photo")?,
            character_id: row.get("character_id")?,
        })
    }

    fn character_exists(conn: &Connection, id: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM characters WHERE id = ?1",
            params![id],
            |row| row.get::<_, i64>(0),
        )
        .map(|count| count > 0)
        .unwrap_or(false)
    }

    /// The id of the owning character, but only when that character is
    /// already stored; anything else stores as an unlinked row.
    fn resolve_owner<'a>(conn: &Connection, record_owner: Option<&'a str>) -> Option<&'a str> {
        let owner_id = record_owner?;
        if Self::character_exists(conn, owner_id) {
            Some(owner_id)
        } else {
            debug!(owner_id, "owner not stored; inserting unlinked");
            None
        }
    }

    fn try_insert_characters(&self, records: &[CharacterRecord]) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        for record in records {
            let id = match record.id.as_deref() {
                Some(id) => id,
                None => {
                    warn!("skipping character record without id");
                    continue;
                }
            };

            let name = record.name.as_deref().unwrap_or_default();

            // ON CONFLICT instead of INSERT OR REPLACE: REPLACE deletes
            // the old row first, which would null out every child link
            // on each refresh.
            tx.execute(
                "INSERT INTO characters (id, name, name_fold, photo, favorite, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     name_fold = excluded.name_fold,
                     photo = excluded.photo,
                     favorite = excluded.favorite,
                     description = excluded.description",
                params![
                    id,
                    name,
                    fold_name(name),
                    record.photo.as_deref().unwrap_or_default(),
                    record.favorite.unwrap_or(false),
                    record.description.as_deref().unwrap_or_default(),
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn try_insert_locations(&self, records: &[LocationRecord]) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        for record in records {
            let id = match record.id.as_deref() {
                Some(id) => id,
                None => {
                    warn!("skipping location record without id");
                    continue;
                }
            };

            let record_owner = record.character.as_ref().and_then(|c| c.id.as_deref());
            let owner = Self::resolve_owner(&tx, record_owner);

            tx.execute(
                "INSERT INTO locations (id, date, latitude, longitude, character_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                     date = excluded.date,
                     latitude = excluded.latitude,
                     longitude = excluded.longitude,
                     character_id = excluded.character_id",
                params![
                    id,
                    record.date.as_deref().unwrap_or_default(),
                    record.latitude.as_deref().unwrap_or_default(),
                    record.longitude.as_deref().unwrap_or_default(),
                    owner,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn try_insert_forms(&self, records: &[FormRecord]) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        for record in records {
            let id = match record.id.as_deref() {
                Some(id) => id,
                None => {
                    warn!("skipping form record without id");
                    continue;
                }
            };

            let record_owner = record.character.as_ref().and_then(|c| c.id.as_deref());
            let owner = Self::resolve_owner(&tx, record_owner);

            tx.execute(
                "INSERT INTO forms (id, name, info, photo, character_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                     name = excluded.name,
                     info = excluded.info,
                     photo = excluded.photo,
                     character_id = excluded.character_id",
                params![
                    id,
                    record.name.as_deref().unwrap_or_default(),
                    record.description.as_deref().unwrap_or_default(),
                    record.photo.as_deref().unwrap_or_default(),
                    owner,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn try_query_characters(
        &self,
        filter: &CharacterFilter,
        order: SortOrder,
    ) -> AppResult<Vec<Character>> {
        let conn = self.pool.get()?;

        let sql = match order {
            SortOrder::Ascending => {
                "SELECT id, name, photo, favorite, description
                 FROM characters
                 WHERE (?1 IS NULL OR id = ?1)
                   AND (?2 IS NULL OR name_fold LIKE ?2 ESCAPE '\\')
                 ORDER BY name ASC, id ASC"
            }
            SortOrder::Descending => {
                "SELECT id, name, photo, favorite, description
                 FROM characters
                 WHERE (?1 IS NULL OR id = ?1)
                   AND (?2 IS NULL OR name_fold LIKE ?2 ESCAPE '\\')
                 ORDER BY name DESC, id DESC"
            }
        };

        let pattern = filter
            .name_contains
            .as_deref()
            .map(|fragment| like_pattern(&fold_name(fragment)));

        let mut stmt = conn.prepare(sql)?;
        let characters: Vec<Character> = stmt
            .query_map(params![filter.id, pattern], Self::row_to_character)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(characters)
    }

    fn try_character_by_id(&self, id: &str) -> AppResult<Option<Character>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, name, photo, favorite, description
             FROM characters WHERE id = ?1",
        )?;

        match stmt.query_row(params![id], Self::row_to_character) {
            Ok(character) => Ok(Some(character)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn try_locations_for(&self, character_id: &str) -> AppResult<Vec<Location>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, date, latitude, longitude, character_id
             FROM locations
             WHERE character_id = ?1
             ORDER BY rowid",
        )?;

        let locations: Vec<Location> = stmt
            .query_map(params![character_id], Self::row_to_location)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(locations)
    }

    fn try_forms_for(&self, character_id: &str) -> AppResult<Vec<Form>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, name, info, photo, character_id
             FROM forms
             WHERE character_id = ?1
             ORDER BY rowid",
        )?;

        let forms: Vec<Form> = stmt
            .query_map(params![character_id], Self::row_to_form)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(forms)
    }

    fn try_wipe(&self) -> AppResult<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        // Children first so no link ever dangles mid-transaction
        tx.execute("DELETE FROM locations", [])?;
        tx.execute("DELETE FROM forms", [])?;
        tx.execute("DELETE FROM characters", [])?;

        tx.commit()?;
        Ok(())
    }
}

impl CharacterStore for SqliteCharacterStore {
    fn insert_characters(&self, records: &[CharacterRecord]) {
        if let Err(e) = self.try_insert_characters(records) {
            error!(error = %e, "character insert failed; batch dropped");
        }
    }

    fn insert_locations(&self, records: &[LocationRecord]) {
        if let Err(e) = self.try_insert_locations(records) {
            error!(error = %e, "location insert failed; batch dropped");
        }
    }

    fn insert_forms(&self, records: &[FormRecord]) {
        if let Err(e) = self.try_insert_forms(records) {
            error!(error = %e, "form insert failed; batch dropped");
        }
    }

    fn query_characters(&self, filter: &CharacterFilter, order: SortOrder) -> Vec<Character> {
        match self.try_query_characters(filter, order) {
            Ok(characters) => characters,
            Err(e) => {
                error!(error = %e, "character query failed; returning empty");
                Vec::new()
            }
        }
    }

    fn character_by_id(&self, id: &str) -> Option<Character> {
        match self.try_character_by_id(id) {
            Ok(character) => character,
            Err(e) => {
                error!(error = %e, "character lookup failed; treating as absent");
                None
            }
        }
    }

    fn locations_for(&self, character_id: &str) -> Vec<Location> {
        match self.try_locations_for(character_id) {
            Ok(locations) => locations,
            Err(e) => {
                error!(error = %e, "location query failed; returning empty");
                Vec::new()
            }
        }
    }

    fn forms_for(&self, character_id: &str) -> Vec<Form> {
        match self.try_forms_for(character_id) {
            Ok(forms) => forms,
            Err(e) => {
                error!(error = %e, "form query failed; returning empty");
                Vec::new()
            }
        }
    }

    fn wipe(&self) {
        if let Err(e) = self.try_wipe() {
            error!(error = %e, "wipe failed; store left as-is");
        }
    }
}

/// Lowercase and strip the accents this catalog actually uses, so
/// "Kamé" and "KAME" land on the same bytes.
fn fold_name(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' | 'ã' | 'å' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            _ => c,
        })
        .collect()
}

/// Wrap a fragment in `%...%`, escaping LIKE wildcards in the input.
fn like_pattern(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len() + 2);
    escaped.push('%');
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
