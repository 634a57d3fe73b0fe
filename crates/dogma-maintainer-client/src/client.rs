// MaintainerClient - facade for the token admin API

use tracing::info;

use crate::{
    config::MaintainerClientConfig,
    constants::api_path,
    error::MaintainerError,
    http::{DogmaHttpClient, HttpClientConfig},
    model::{CreateTokenForm, TokenDetail, UserInfo},
};

/// Admin HTTP client for the Dogma token service
pub struct MaintainerClient {
    http_client: DogmaHttpClient,
}

impl MaintainerClient {
    /// Create a new MaintainerClient with the given configuration
    pub fn new(config: MaintainerClientConfig) -> Result<Self, MaintainerError> {
        let http_config = HttpClientConfig::with_servers(config.server_addrs)
            .with_auth(&config.username, &config.password)
            .with_access_token(config.access_token)
            .with_timeouts(config.connect_timeout_ms, config.read_timeout_ms)
            .with_context_path(&config.context_path)
            .with_auth_endpoint(api_path::LOGIN);

        let http_client = DogmaHttpClient::new(http_config)?;
        Ok(Self { http_client })
    }

    /// Create a new MaintainerClient from a single server address
    pub fn from_server_addr(
        addr: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, MaintainerError> {
        Self::new(MaintainerClientConfig::new(addr).with_auth(username, password))
    }

    // ============================================================================
    // Token APIs
    // ============================================================================

    /// Issue a new application token; the response carries its secret
    pub async fn create_token(&self, form: &CreateTokenForm) -> Result<TokenDetail, MaintainerError> {
        let token: TokenDetail = self.http_client.post_form(api_path::TOKENS, form).await?;
        info!(
            app_id = %token.app_id,
            system_admin = token.system_admin,
            "Application token created"
        );
        Ok(token)
    }

    // ============================================================================
    // User APIs
    // ============================================================================

    /// The user the client is authenticated as
    pub async fn current_user(&self) -> Result<UserInfo, MaintainerError> {
        self.http_client.get(api_path::USERS_ME).await
    }
}
