//! Application token authorizer
//!
//! Resolves a bearer secret to a token, rejects inactive tokens, and enforces
//! the token's IP access-control rules against the caller's address.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, warn};

use dogma_common::APP_USER_PREFIX;

use crate::ip_access::first_matching_rule;
use crate::model::Token;

/// Source of tokens keyed by their secret
#[async_trait]
pub trait TokenLookup: Send + Sync {
    async fn find_by_secret(&self, secret: &str) -> Option<Token>;
}

#[async_trait]
impl<F> TokenLookup for F
where
    F: Fn(&str) -> Option<Token> + Send + Sync,
{
    async fn find_by_secret(&self, secret: &str) -> Option<Token> {
        self(secret)
    }
}

/// Token lookup backed by a map, keyed by secret
#[derive(Default)]
pub struct InMemoryTokenLookup {
    tokens: RwLock<HashMap<String, Token>>,
}

impl InMemoryTokenLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token; tokens without a secret cannot be looked up and are ignored
    pub fn insert(&self, token: Token) -> bool {
        let Some(secret) = token.secret().map(str::to_string) else {
            return false;
        };
        self.tokens.write().insert(secret, token);
        true
    }

    pub fn remove(&self, secret: &str) -> Option<Token> {
        self.tokens.write().remove(secret)
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }
}

#[async_trait]
impl TokenLookup for InMemoryTokenLookup {
    async fn find_by_secret(&self, secret: &str) -> Option<Token> {
        self.tokens.read().get(secret).cloned()
    }
}

/// Address the request came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteAddress {
    /// An IP socket peer
    Inet(SocketAddr),
    /// Any other transport, such as a unix domain socket
    Other(String),
}

impl RemoteAddress {
    /// The peer IP, with IPv4-mapped IPv6 addresses unwrapped
    pub fn ip(&self) -> Option<IpAddr> {
        match self {
            RemoteAddress::Inet(addr) => Some(addr.ip().to_canonical()),
            RemoteAddress::Other(_) => None,
        }
    }
}

impl From<SocketAddr> for RemoteAddress {
    fn from(addr: SocketAddr) -> Self {
        RemoteAddress::Inet(addr)
    }
}

/// Reasons an application token is refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizeError {
    #[error("unknown application token")]
    TokenNotFound,

    #[error("application token '{app_id}' is inactive")]
    Inactive { app_id: String },

    #[error("application token '{app_id}' is not allowed from {ip}")]
    IpDenied { app_id: String, ip: IpAddr },
}

/// Result of a successful authorization
#[derive(Debug, Clone)]
pub struct AuthenticatedApp {
    /// Name recorded as the authenticated user, `app/<appId>`
    pub user: String,
    /// The token, with its secret stripped
    pub token: Token,
}

/// Authorizer for requests carrying an application token
pub struct ApplicationTokenAuthorizer<L> {
    lookup: L,
}

impl<L: TokenLookup> ApplicationTokenAuthorizer<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// Resolve and check `secret` for a request coming from `remote`
    pub async fn authenticate(
        &self,
        remote: &RemoteAddress,
        secret: &str,
    ) -> Result<AuthenticatedApp, AuthorizeError> {
        let token = self
            .lookup
            .find_by_secret(secret)
            .await
            .ok_or(AuthorizeError::TokenNotFound)?;

        if !token.is_active() {
            return Err(AuthorizeError::Inactive {
                app_id: token.app_id().to_string(),
            });
        }

        match remote.ip() {
            Some(ip) => {
                if let Some(rule) = first_matching_rule(ip, token.ip_access_control_rules())
                    && !rule.action().is_allow()
                {
                    warn!(
                        app_id = token.app_id(),
                        client_ip = %ip,
                        rule = %rule,
                        "Application token denied by IP access control"
                    );
                    return Err(AuthorizeError::IpDenied {
                        app_id: token.app_id().to_string(),
                        ip,
                    });
                }
            }
            None => {
                debug!(
                    app_id = token.app_id(),
                    remote = ?remote,
                    "Remote address is not an IP socket, skipping IP access control"
                );
            }
        }

        Ok(AuthenticatedApp {
            user: format!("{}{}", APP_USER_PREFIX, token.app_id()),
            token: token.without_secret(),
        })
    }

    /// `true` if the request may proceed
    pub async fn authorize(&self, remote: &RemoteAddress, secret: &str) -> bool {
        match self.authenticate(remote, secret).await {
            Ok(app) => {
                debug!(user = %app.user, "Application token authorized");
                true
            }
            Err(e) => {
                debug!("Application token rejected: {}", e);
                false
            }
        }
    }
}
