// src/domain/mod.rs
//
// Domain root. Everything the rest of the crate knows about
// characters, sightings and forms is re-exported from here;
// other modules import `crate::domain::*`, never a submodule.

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod character;
pub mod form;
pub mod location;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use character::{Character, CharacterFilter, SortOrder};

pub use location::{Coordinate, Location, MAX_LATITUDE, MAX_LONGITUDE};

pub use form::Form;
