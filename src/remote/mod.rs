// src/remote/mod.rs
//
// Remote catalog access: the client trait, its HTTP implementation
// and the wire record types.

pub mod client;
pub mod records;

pub use client::{HttpRemoteClient, RemoteClient, API_HOST};
pub use records::{CharacterRecord, FormRecord, LocationRecord};

#[cfg(test)]
pub use client::MockRemoteClient;
