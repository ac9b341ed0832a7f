// src/error/types.rs
use thiserror::Error;

/// Everything that can go wrong between the remote catalog, the local
/// store and the callers sitting on top of them. The set is closed on
/// purpose: embedders switch on it to decide what to show.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Request could not be built")]
    BadRequest,

    #[error("No session token stored")]
    SessionTokenMissing,

    #[error("Server error: {0}")]
    Server(#[source] reqwest::Error),

    #[error("API error: status {0}")]
    Api(u16),

    #[error("No data received")]
    NoDataReceived,

    #[error("Parsing error: {0}")]
    Parsing(#[from] serde_json::Error),

    #[error("Character not found: {0}")]
    CharacterNotFound(String),

    #[error("Form '{name}' not found for character {character_id}")]
    FormNotFound { character_id: String, name: String },

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
