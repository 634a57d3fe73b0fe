//! HTTP client with bearer authentication and server failover
//!
//! Every call is attempted once. A transport failure moves the client to the
//! next configured server so that the following call goes elsewhere; the
//! failed call itself is reported to the caller.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{
    sync::RwLock,
    time::{Duration, Instant},
};
use tracing::{debug, error, warn};

use crate::constants::{DEFAULT_TOKEN_TTL_SECS, TOKEN_REFRESH_MARGIN_SECS, api_path};
use crate::error::MaintainerError;

/// Configuration for the HTTP client
#[derive(Clone, Debug)]
pub struct HttpClientConfig {
    /// List of server addresses to connect to
    pub server_addrs: Vec<String>,
    /// Username for password login
    pub username: String,
    /// Password for password login
    pub password: String,
    /// Pre-issued bearer token
    pub access_token: Option<String>,
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds
    pub read_timeout_ms: u64,
    /// Context path (e.g., "/dogma")
    pub context_path: String,
    /// Auth endpoint path (default: "/api/v1/login")
    pub auth_endpoint: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            server_addrs: vec!["http://127.0.0.1:36462".to_string()],
            username: String::new(),
            password: String::new(),
            access_token: None,
            connect_timeout_ms: 5000,
            read_timeout_ms: 30000,
            context_path: String::new(),
            auth_endpoint: api_path::LOGIN.to_string(),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config with a single server address
    pub fn new(server_addr: &str) -> Self {
        Self {
            server_addrs: vec![server_addr.to_string()],
            ..Default::default()
        }
    }

    /// Create a config with multiple server addresses
    pub fn with_servers(server_addrs: Vec<String>) -> Self {
        Self {
            server_addrs,
            ..Default::default()
        }
    }

    /// Set login credentials
    pub fn with_auth(mut self, username: &str, password: &str) -> Self {
        self.username = username.to_string();
        self.password = password.to_string();
        self
    }

    /// Use a pre-issued bearer token instead of logging in
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    /// Set timeouts
    pub fn with_timeouts(mut self, connect_ms: u64, read_ms: u64) -> Self {
        self.connect_timeout_ms = connect_ms;
        self.read_timeout_ms = read_ms;
        self
    }

    /// Set context path
    pub fn with_context_path(mut self, path: &str) -> Self {
        self.context_path = path.to_string();
        self
    }

    /// Set auth endpoint path
    pub fn with_auth_endpoint(mut self, endpoint: &str) -> Self {
        self.auth_endpoint = endpoint.to_string();
        self
    }

    fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }
}

/// Token info for authentication
#[derive(Clone, Debug)]
struct TokenInfo {
    access_token: String,
    // None for pre-issued tokens
    expires_at: Option<Instant>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// HTTP client with authentication and failover support
pub struct DogmaHttpClient {
    client: Client,
    config: HttpClientConfig,
    current_server_index: RwLock<usize>,
    token: RwLock<Option<TokenInfo>>,
}

impl DogmaHttpClient {
    /// Create a new HTTP client; login, if configured, happens on first use
    pub fn new(config: HttpClientConfig) -> Result<Self, MaintainerError> {
        if config.server_addrs.is_empty() {
            return Err(MaintainerError::NoServer);
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .build()?;

        let token = config.access_token.clone().map(|access_token| TokenInfo {
            access_token,
            expires_at: None,
        });

        Ok(Self {
            client,
            config,
            current_server_index: RwLock::new(0),
            token: RwLock::new(token),
        })
    }

    /// Get the current server URL
    fn current_server(&self) -> String {
        let index = *self
            .current_server_index
            .read()
            .unwrap_or_else(|e| e.into_inner());
        self.config.server_addrs[index].clone()
    }

    /// Switch to the next server (for failover)
    fn switch_to_next_server(&self) {
        let mut index = self
            .current_server_index
            .write()
            .unwrap_or_else(|e| e.into_inner());
        *index = (*index + 1) % self.config.server_addrs.len();
        debug!("Switched to server index: {}", *index);
    }

    /// Build full URL with context path
    fn build_url(&self, path: &str) -> String {
        let base_url = self.current_server();
        let base_url = base_url.trim_end_matches('/');
        let context_path = self.config.context_path.trim_matches('/');

        if context_path.is_empty() {
            format!("{}{}", base_url, path)
        } else {
            format!("{}/{}{}", base_url, context_path, path)
        }
    }

    /// Get the current access token if it is still usable
    fn get_token(&self) -> Option<String> {
        let token_guard = self.token.read().unwrap_or_else(|e| e.into_inner());
        token_guard.as_ref().and_then(|t| match t.expires_at {
            Some(expires_at)
                if expires_at <= Instant::now() + Duration::from_secs(TOKEN_REFRESH_MARGIN_SECS) =>
            {
                None
            }
            _ => Some(t.access_token.clone()),
        })
    }

    fn set_token(&self, access_token: String, ttl_seconds: u64) {
        let expires_at = Instant::now() + Duration::from_secs(ttl_seconds);
        let mut token_guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *token_guard = Some(TokenInfo {
            access_token,
            expires_at: Some(expires_at),
        });
    }

    /// Forget a login token so the next call logs in again
    fn clear_token(&self) {
        if self.config.access_token.is_some() {
            return;
        }
        let mut token_guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *token_guard = None;
    }

    /// Log in with the configured username and password
    ///
    /// Returns the fresh access token, which is also cached for later calls.
    pub async fn authenticate(&self) -> Result<String, MaintainerError> {
        if !self.config.has_credentials() {
            return Err(MaintainerError::AuthFailed(
                "no credentials configured".to_string(),
            ));
        }

        let url = self.build_url(&self.config.auth_endpoint);
        debug!("Authenticating with server: {}", url);

        let response = match self
            .client
            .post(&url)
            .form(&[
                ("username", &self.config.username),
                ("password", &self.config.password),
            ])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Login request failed: {}, switching to next server", e);
                self.switch_to_next_server();
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Authentication rejected with status {}", status);
            return Err(MaintainerError::AuthFailed(if body.is_empty() {
                status.to_string()
            } else {
                body
            }));
        }

        let login: LoginResponse = response.json().await?;
        let ttl = login.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        self.set_token(login.access_token.clone(), ttl);
        debug!(
            "Authentication successful, token expires in {} seconds",
            ttl
        );
        Ok(login.access_token)
    }

    /// Ensure we have a valid token, logging in if needed
    ///
    /// Returns `None` when neither a token nor credentials are configured.
    async fn ensure_token(&self) -> Result<Option<String>, MaintainerError> {
        if let Some(token) = self.get_token() {
            return Ok(Some(token));
        }
        if !self.config.has_credentials() {
            return Ok(None);
        }

        // A short-lived login token is used as is, even inside the refresh margin
        self.authenticate().await.map(Some)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, MaintainerError> {
        self.request_once(path, |client, url| client.get(url)).await
    }

    /// Make a POST request with form data
    pub async fn post_form<T: DeserializeOwned, F: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &F,
    ) -> Result<T, MaintainerError> {
        self.request_once(path, |client, url| client.post(url).form(form))
            .await
    }

    /// Send a single authenticated request
    async fn request_once<T, F>(&self, path: &str, build: F) -> Result<T, MaintainerError>
    where
        T: DeserializeOwned,
        F: FnOnce(&Client, String) -> RequestBuilder,
    {
        let url = self.build_url(path);
        let token = self.ensure_token().await?;

        let mut request = build(&self.client, url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        match request.send().await {
            Ok(response) => {
                if response.status() == StatusCode::UNAUTHORIZED {
                    warn!("Request to {} was unauthorized", path);
                    self.clear_token();
                    let body = response.text().await.unwrap_or_default();
                    return Err(MaintainerError::AuthFailed(body));
                }
                self.handle_response(response).await
            }
            Err(e) => {
                warn!("Request failed: {}, switching to next server", e);
                self.switch_to_next_server();
                Err(e.into())
            }
        }
    }

    /// Handle response and parse JSON
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, MaintainerError> {
        let status = response.status();

        if status.is_success() {
            let result = response.json::<T>().await?;
            Ok(result)
        } else {
            let body = response.text().await.unwrap_or_default();
            error!("Request failed with status {}: {}", status, body);
            Err(MaintainerError::RequestFailed {
                status: status.as_u16(),
                body,
            })
        }
    }
}
