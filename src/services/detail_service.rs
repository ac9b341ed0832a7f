// src/services/detail_service.rs
//
// Per-character detail relations (sightings and forms), cache-aside
// per relation. Details are only served for characters the store
// already knows; the catalog flow is what gets them there.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{Character, Form, Location};
use crate::error::{AppError, AppResult};
use crate::remote::RemoteClient;
use crate::services::flight::FlightGroup;
use crate::store::CharacterStore;

pub struct DetailService {
    store: Arc<dyn CharacterStore>,
    remote: Arc<dyn RemoteClient>,

    // One lock per character id and relation, so a stampede on Goku's
    // sightings never blocks Vegeta's forms
    locations_flight: FlightGroup<String>,
    forms_flight: FlightGroup<String>,
}

impl DetailService {
    pub fn new(store: Arc<dyn CharacterStore>, remote: Arc<dyn RemoteClient>) -> Self {
        Self {
            store,
            remote,
            locations_flight: FlightGroup::new(),
            forms_flight: FlightGroup::new(),
        }
    }

    /// The cached character, or [`AppError::CharacterNotFound`]. Never
    /// consults the remote: an id the store has not seen has no detail
    /// view to offer.
    pub fn character(&self, character_id: &str) -> AppResult<Character> {
        self.store
            .character_by_id(character_id)
            .ok_or_else(|| AppError::CharacterNotFound(character_id.to_string()))
    }

    /// Sightings for one character, fetched and cached on first use.
    /// Returned in the order the store holds them.
    pub async fn load_locations(&self, character_id: &str) -> AppResult<Vec<Location>> {
        let character = self.character(character_id)?;

        let cached = self.store.locations_for(&character.id);
        if !cached.is_empty() {
            debug!(count = cached.len(), "locations served from store");
            return Ok(cached);
        }

        let lock = self.locations_flight.lock_for(&character.id);
        let guard = lock.lock().await;

        let cached = self.store.locations_for(&character.id);
        if !cached.is_empty() {
            debug!(count = cached.len(), "locations populated while waiting");
            return Ok(cached);
        }

        let records = self.remote.fetch_locations(&character.id).await?;
        debug!(count = records.len(), "locations fetched");
        self.store.insert_locations(&records);
        let locations = self.store.locations_for(&character.id);

        drop(guard);
        drop(lock);
        self.locations_flight.prune(&character.id);

        Ok(locations)
    }

    /// Forms for one character, fetched and cached on first use.
    /// Always sorted by name ascending, cached or not.
    pub async fn load_forms(&self, character_id: &str) -> AppResult<Vec<Form>> {
        let character = self.character(character_id)?;

        let mut cached = self.store.forms_for(&character.id);
        if !cached.is_empty() {
            debug!(count = cached.len(), "forms served from store");
            cached.sort_by(|a, b| a.name.cmp(&b.name));
            return Ok(cached);
        }

        let lock = self.forms_flight.lock_for(&character.id);
        let guard = lock.lock().await;

        let mut cached = self.store.forms_for(&character.id);
        if !cached.is_empty() {
            debug!(count = cached.len(), "forms populated while waiting");
            cached.sort_by(|a, b| a.name.cmp(&b.name));
            return Ok(cached);
        }

        let records = self.remote.fetch_forms(&character.id).await?;
        debug!(count = records.len(), "forms fetched");
        self.store.insert_forms(&records);
        let mut forms = self.store.forms_for(&character.id);
        forms.sort_by(|a, b| a.name.cmp(&b.name));

        drop(guard);
        drop(lock);
        self.forms_flight.prune(&character.id);

        Ok(forms)
    }
}
