// src/db/mod.rs
//
// Connection pooling and schema initialization.

pub mod connection;
pub mod migrations;

pub use connection::{
    create_connection_pool, create_test_connection, default_database_path, get_connection,
    ConnectionPool, PooledConn, StoreMode,
};

pub use migrations::initialize_database;
