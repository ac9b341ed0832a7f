// src/services/auth_service.rs
//
// Login and logout on top of the remote client, the session store and
// the character store.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::remote::RemoteClient;
use crate::session::SessionStore;
use crate::store::CharacterStore;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 4;

pub struct AuthService {
    remote: Arc<dyn RemoteClient>,
    session: Arc<dyn SessionStore>,
    store: Arc<dyn CharacterStore>,
}

impl AuthService {
    pub fn new(
        remote: Arc<dyn RemoteClient>,
        session: Arc<dyn SessionStore>,
        store: Arc<dyn CharacterStore>,
    ) -> Self {
        Self {
            remote,
            session,
            store,
        }
    }

    /// Validate credentials locally, then exchange them for a session
    /// token. Validation failures never reach the network. On success
    /// the remote client has already persisted the token.
    pub async fn login(&self, user: &str, password: &str) -> AppResult<String> {
        validate_credentials(user, password)?;

        let token = self.remote.login(user, password).await?;
        debug!("login succeeded");
        Ok(token)
    }

    /// Drop the session token and every cached row. The next catalog
    /// load starts cold.
    pub fn logout(&self) -> AppResult<()> {
        self.session.clear()?;
        self.store.wipe();
        info!("logged out; local cache wiped");
        Ok(())
    }
}

fn validate_credentials(user: &str, password: &str) -> AppResult<()> {
    if user.is_empty() || !user.contains('@') {
        return Err(AppError::InvalidCredentials(
            "user must be an email address".to_string(),
        ));
    }

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidCredentials(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_validation_rules() {
        assert!(validate_credentials("goku@kame.house", "kamehame").is_ok());
        assert!(validate_credentials("goku@kame.house", "1234").is_ok());

        assert!(validate_credentials("", "kamehame").is_err());
        assert!(validate_credentials("no-at-sign", "kamehame").is_err());
        assert!(validate_credentials("goku@kame.house", "123").is_err());
        assert!(validate_credentials("goku@kame.house", "").is_err());
    }
}
