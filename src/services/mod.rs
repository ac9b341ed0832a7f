// src/services/mod.rs
//
// Use-case orchestration over the store, the remote client and the
// session.

pub mod auth_service;
pub mod catalog_service;
pub mod detail_service;
pub mod flight;
pub mod form_service;

#[cfg(test)]
mod detail_service_tests;

// Re-export all services
pub use auth_service::AuthService;
pub use catalog_service::CatalogService;
pub use detail_service::DetailService;
pub use flight::FlightGroup;
pub use form_service::FormService;
