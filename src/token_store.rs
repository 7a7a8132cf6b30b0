//! Token storage on top of client-local key/value storage

use crate::storage::{MemoryStorage, Storage};
use crate::types::{parse_timestamp, AccessToken};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const TOKEN_EXPIRES_AT_KEY: &str = "token_expires_at";
pub const USER_ROLES_KEY: &str = "user_roles";

/// Source of the bearer token attached to outgoing requests
///
/// Injected into the client so that request pipelines can be exercised
/// without touching shared state.
pub trait TokenProvider: Send + Sync + 'static {
    fn get(&self) -> Option<AccessToken>;

    fn set(&self, token: &AccessToken);

    /// Forget the token, its expiry and any stored roles
    fn clear(&self);

    fn roles(&self) -> Vec<String>;

    fn set_roles(&self, roles: &[String]);

    /// A usable token is present and has not expired at `now`
    fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        self.get().is_some_and(|token| !token.is_expired(now))
    }

    fn has_role(&self, role: &str) -> bool {
        self.roles().iter().any(|r| r == role)
    }
}

/// Provider for unauthenticated use; never holds a token
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTokenProvider;

impl NoopTokenProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

impl TokenProvider for NoopTokenProvider {
    fn get(&self) -> Option<AccessToken> {
        None
    }

    fn set(&self, _token: &AccessToken) {}

    fn clear(&self) {}

    fn roles(&self) -> Vec<String> {
        Vec::new()
    }

    fn set_roles(&self, _roles: &[String]) {}
}

/// Token store persisted under the `access_token` / `token_expires_at` keys
///
/// Clones share the same underlying storage.
pub struct TokenStore<S: Storage = MemoryStorage> {
    storage: Arc<S>,
}

impl<S: Storage> Clone for TokenStore<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl TokenStore<MemoryStorage> {
    /// Create a token store backed by process memory
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }
}

impl<S: Storage> TokenStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl Default for TokenStore<MemoryStorage> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<S: Storage> TokenProvider for TokenStore<S> {
    fn get(&self) -> Option<AccessToken> {
        let access_token = self.storage.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty())?;

        let expires_at = self.storage.get(TOKEN_EXPIRES_AT_KEY).and_then(|raw| {
            let parsed = parse_timestamp(&raw);
            if parsed.is_none() {
                warn!(value = %raw, "Ignoring unparseable token expiry");
            }
            parsed
        });

        Some(AccessToken {
            access_token,
            expires_at,
        })
    }

    fn set(&self, token: &AccessToken) {
        self.storage.set(ACCESS_TOKEN_KEY, &token.access_token);
        match token.expires_at {
            Some(at) => self.storage.set(TOKEN_EXPIRES_AT_KEY, &at.to_rfc3339()),
            None => self.storage.remove(TOKEN_EXPIRES_AT_KEY),
        }
        debug!(expires_at = ?token.expires_at, "Stored access token");
    }

    fn clear(&self) {
        self.storage.remove(ACCESS_TOKEN_KEY);
        self.storage.remove(TOKEN_EXPIRES_AT_KEY);
        self.storage.remove(USER_ROLES_KEY);
        debug!("Cleared access token");
    }

    fn roles(&self) -> Vec<String> {
        self.storage
            .get(USER_ROLES_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn set_roles(&self, roles: &[String]) {
        match serde_json::to_string(roles) {
            Ok(raw) => self.storage.set(USER_ROLES_KEY, &raw),
            Err(e) => warn!(error = %e, "Failed to encode roles"),
        }
    }
}
