// src/lib.rs
// Herodex - Local-first Dragon Ball character catalog
//
// Architecture:
// - Cache-aside: the store answers first, the API fills misses
// - Explicit: no implicit behavior, no magic
// - Local-first: every fetched record lands in SQLite before use

pub mod db;
pub mod domain;
pub mod error;
pub mod remote;
pub mod services;
pub mod session;
pub mod store;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    // Character
    Character,
    CharacterFilter,
    // Location
    Coordinate,
    // Form
    Form,
    Location,
    SortOrder,
    MAX_LATITUDE,
    MAX_LONGITUDE,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{
    create_connection_pool, default_database_path, initialize_database, ConnectionPool, StoreMode,
};

// ============================================================================
// PUBLIC API - Store
// ============================================================================

pub use store::{CharacterStore, SqliteCharacterStore};

// ============================================================================
// PUBLIC API - Remote Client
// ============================================================================

pub use remote::{
    CharacterRecord, FormRecord, HttpRemoteClient, LocationRecord, RemoteClient, API_HOST,
};

// ============================================================================
// PUBLIC API - Session
// ============================================================================

pub use session::{FileSessionStore, MemorySessionStore, SessionData, SessionStore};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    // Auth Service
    AuthService,
    // Catalog Service
    CatalogService,
    // Detail Service
    DetailService,
    FlightGroup,
    // Form Service
    FormService,
};
