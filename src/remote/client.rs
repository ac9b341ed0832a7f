// src/remote/client.rs
//
// Catalog API client.
//
// ARCHITECTURE:
// - One trait, one HTTP implementation
// - Maps wire payloads to records (NO domain mutation)
// - Classifies every outcome into the crate error set
//
// AUTHENTICATION:
// - Catalog endpoints want `Bearer <token>`; the token comes from the
//   session store and a missing one fails before any I/O
// - Login is the odd one out: `Basic base64(user:password)`, and the
//   response body is the raw token, not JSON

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::remote::records::{CharacterRecord, FormRecord, LocationRecord};
use crate::session::SessionStore;

/// Host serving the catalog API.
pub const API_HOST: &str = "https://dragonball.keepcoding.education";

const CHARACTERS_PATH: &str = "/api/heros/all";
const LOCATIONS_PATH: &str = "/api/heros/locations";
// The API spells the path this way; do not correct it.
const FORMS_PATH: &str = "/api/heros/tranformations";
const LOGIN_PATH: &str = "/api/auth/login";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Remote side of the catalog. Every call is single-shot: no retries,
/// no cancellation, one typed outcome.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Characters whose name contains `name_filter`; the empty string
    /// returns the complete catalog.
    async fn fetch_characters(&self, name_filter: &str) -> AppResult<Vec<CharacterRecord>>;

    /// Sightings recorded for one character.
    async fn fetch_locations(&self, character_id: &str) -> AppResult<Vec<LocationRecord>>;

    /// Forms recorded for one character.
    async fn fetch_forms(&self, character_id: &str) -> AppResult<Vec<FormRecord>>;

    /// Exchange credentials for a session token. On success the token
    /// is persisted through the session store before this returns.
    async fn login(&self, user: &str, password: &str) -> AppResult<String>;
}

pub struct HttpRemoteClient {
    base_url: String,
    http_client: Client,
    session: Arc<dyn SessionStore>,
}

impl HttpRemoteClient {
    /// Client against the production host.
    pub fn new(session: Arc<dyn SessionStore>) -> AppResult<Self> {
        Self::with_base_url(API_HOST, session)
    }

    /// Client against a different host (staging, local stub).
    pub fn with_base_url(
        base_url: impl Into<String>,
        session: Arc<dyn SessionStore>,
    ) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(AppError::Server)?;

        Ok(Self {
            base_url: base_url.into(),
            http_client,
            session,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body with the stored bearer token and decode the
    /// response as a list of records.
    async fn post_authorized<T>(&self, path: &str, body: serde_json::Value) -> AppResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let token = self.session.token().ok_or(AppError::SessionTokenMissing)?;
        let url = self.endpoint(path);

        debug!(%url, "catalog request");

        let response = self
            .http_client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(%url, status = status.as_u16(), "catalog request rejected");
            return Err(AppError::Api(status.as_u16()));
        }

        let payload = response.bytes().await.map_err(AppError::Server)?;
        if payload.is_empty() {
            return Err(AppError::NoDataReceived);
        }

        let records = serde_json::from_slice(&payload)?;
        Ok(records)
    }
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn fetch_characters(&self, name_filter: &str) -> AppResult<Vec<CharacterRecord>> {
        self.post_authorized(CHARACTERS_PATH, json!({ "name": name_filter }))
            .await
    }

    async fn fetch_locations(&self, character_id: &str) -> AppResult<Vec<LocationRecord>> {
        self.post_authorized(LOCATIONS_PATH, json!({ "id": character_id }))
            .await
    }

    async fn fetch_forms(&self, character_id: &str) -> AppResult<Vec<FormRecord>> {
        self.post_authorized(FORMS_PATH, json!({ "id": character_id }))
            .await
    }

    async fn login(&self, user: &str, password: &str) -> AppResult<String> {
        let url = self.endpoint(LOGIN_PATH);

        debug!(%url, "login request");

        let response = self
            .http_client
            .post(&url)
            .header(
                header::AUTHORIZATION,
                format!("Basic {}", basic_credentials(user, password)),
            )
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(%url, status = status.as_u16(), "login rejected");
            return Err(AppError::Api(status.as_u16()));
        }

        // The body is the token itself, as plain text
        let token = response.text().await.map_err(AppError::Server)?;
        if token.is_empty() {
            return Err(AppError::NoDataReceived);
        }

        // Persist first: success implies the token is retrievable
        self.session.save_token(&token)?;
        Ok(token)
    }
}

/// `user:password` encoded for a Basic Authorization header.
fn basic_credentials(user: &str, password: &str) -> String {
    BASE64.encode(format!("{}:{}", user, password))
}

fn request_error(e: reqwest::Error) -> AppError {
    if e.is_builder() {
        AppError::BadRequest
    } else {
        AppError::Server(e)
    }
}
