//! Authentication hook for validating player identity.
//!
//! feralhost doesn't issue game sessions itself; the account service in
//! front of it does. The servers only see the session token the client
//! presents when it connects, and ask an [`Authenticator`] who it
//! belongs to.
//!
//! [`TokenDirectory`] is a ready-made in-memory authenticator for
//! embedding and tests: tokens are issued with
//! [`TokenDirectory::issue`] and stay valid until revoked.

use std::collections::HashMap;
use std::sync::Arc;

use feralhost_protocol::AccountId;
use parking_lot::RwLock;

use crate::{SessionError, generate_token};

/// Validates a client's session token and returns their account.
///
/// # Trait bounds
///
/// - `Send + Sync`: one authenticator is shared by every connection task.
/// - `'static`: it lives as long as the server.
///
/// # Example
///
/// ```rust
/// use feralhost_protocol::AccountId;
/// use feralhost_session::{Authenticator, SessionError};
///
/// /// Treats the token itself as the account id.
/// /// Only for development!
/// struct DevAuthenticator;
///
/// impl Authenticator for DevAuthenticator {
///     async fn authenticate(&self, token: &str) -> Result<AccountId, SessionError> {
///         if token.is_empty() {
///             return Err(SessionError::AuthFailed("empty token".into()));
///         }
///         Ok(AccountId::from(token))
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Validates the given token and returns the account it belongs to.
    ///
    /// # Returns
    /// - `Ok(AccountId)`: the token is valid
    /// - `Err(SessionError::AuthFailed)`: it isn't
    fn authenticate(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<AccountId, SessionError>> + Send;
}

impl<A: Authenticator> Authenticator for Arc<A> {
    async fn authenticate(&self, token: &str) -> Result<AccountId, SessionError> {
        (**self).authenticate(token).await
    }
}

/// An in-memory token table.
#[derive(Debug, Default)]
pub struct TokenDirectory {
    tokens: RwLock<HashMap<String, AccountId>>,
}

impl TokenDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh random token for `account`.
    pub fn issue(&self, account: AccountId) -> String {
        let mut tokens = self.tokens.write();
        let mut token = generate_token();
        while tokens.contains_key(&token) {
            token = generate_token();
        }
        tracing::debug!(%account, "session token issued");
        tokens.insert(token.clone(), account);
        token
    }

    /// Registers a token chosen by the caller.
    pub fn insert(&self, token: impl Into<String>, account: AccountId) {
        self.tokens.write().insert(token.into(), account);
    }

    /// Invalidates a token. Returns `true` if it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.tokens.write().remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}

impl Authenticator for TokenDirectory {
    async fn authenticate(&self, token: &str) -> Result<AccountId, SessionError> {
        self.tokens
            .read()
            .get(token)
            .cloned()
            .ok_or_else(|| SessionError::AuthFailed("unknown session token".into()))
    }
}
