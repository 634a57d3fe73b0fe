// Configuration for MaintainerClient

/// Configuration for the maintainer HTTP client
#[derive(Clone, Debug)]
pub struct MaintainerClientConfig {
    /// Server addresses (e.g. ["http://127.0.0.1:36462"])
    pub server_addrs: Vec<String>,
    /// Username for password login
    pub username: String,
    /// Password for password login
    pub password: String,
    /// Pre-issued bearer token; when set, no login is performed
    pub access_token: Option<String>,
    /// Connection timeout in milliseconds (default: 5000)
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds (default: 30000)
    pub read_timeout_ms: u64,
    /// Context path (default: empty)
    pub context_path: String,
}

impl Default for MaintainerClientConfig {
    fn default() -> Self {
        Self {
            server_addrs: vec!["http://127.0.0.1:36462".to_string()],
            username: String::new(),
            password: String::new(),
            access_token: None,
            connect_timeout_ms: 5000,
            read_timeout_ms: 30000,
            context_path: String::new(),
        }
    }
}

impl MaintainerClientConfig {
    pub fn new(server_addr: &str) -> Self {
        Self {
            server_addrs: vec![server_addr.to_string()],
            ..Default::default()
        }
    }

    pub fn with_servers(server_addrs: Vec<String>) -> Self {
        Self {
            server_addrs,
            ..Default::default()
        }
    }

    pub fn with_auth(mut self, username: &str, password: &str) -> Self {
        self.username = username.to_string();
        self.password = password.to_string();
        self
    }

    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    pub fn with_timeouts(mut self, connect_ms: u64, read_ms: u64) -> Self {
        self.connect_timeout_ms = connect_ms;
        self.read_timeout_ms = read_ms;
        self
    }

    pub fn with_context_path(mut self, path: &str) -> Self {
        self.context_path = path.to_string();
        self
    }
}
