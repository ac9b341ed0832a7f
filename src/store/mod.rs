// src/store/mod.rs
//
// Store layer
//
// CRITICAL RULES:
// - Stores are data mappers, not business logic
// - Steady-state operations absorb their own failures (log + empty)
// - Explicit SQL only
// - NO cross-store calls

pub mod character_store;

pub use character_store::{CharacterStore, SqliteCharacterStore};
