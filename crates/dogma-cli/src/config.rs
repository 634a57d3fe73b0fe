//! Configuration for the token CLI
//!
//! Sources, lowest precedence first: built-in defaults, the optional
//! configuration file, `DOGMA__*` environment variables, then command line
//! flags.

use config::{Config, Environment};

use dogma_maintainer_client::MaintainerClientConfig;

use crate::args::Cli;

pub const SERVER_ADDRS: &str = "server_addrs";
pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";
pub const ACCESS_TOKEN: &str = "access_token";
pub const CONTEXT_PATH: &str = "context_path";
pub const CONNECT_TIMEOUT_MS: &str = "connect_timeout_ms";
pub const READ_TIMEOUT_MS: &str = "read_timeout_ms";

const DEFAULT_SERVER_ADDR: &str = "http://127.0.0.1:36462";
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;
const DEFAULT_READ_TIMEOUT_MS: u64 = 30000;

/// Application configuration loaded from file, environment and flags
#[derive(Clone, Debug)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut builder = Config::builder()
            .set_default(SERVER_ADDRS, vec![DEFAULT_SERVER_ADDR])?
            .set_default(CONTEXT_PATH, "")?
            .set_default(CONNECT_TIMEOUT_MS, DEFAULT_CONNECT_TIMEOUT_MS)?
            .set_default(READ_TIMEOUT_MS, DEFAULT_READ_TIMEOUT_MS)?;

        if let Some(path) = &cli.config_file {
            builder = builder.add_source(config::File::from(path.as_path()));
        }

        builder = builder.add_source(
            Environment::with_prefix("DOGMA")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key(SERVER_ADDRS)
                .try_parsing(true),
        );

        if !cli.servers.is_empty() {
            builder = builder.set_override(SERVER_ADDRS, cli.servers.clone())?;
        }
        if let Some(v) = &cli.username {
            builder = builder.set_override(USERNAME, v.as_str())?;
        }
        if let Some(v) = &cli.password {
            builder = builder.set_override(PASSWORD, v.as_str())?;
        }
        if let Some(v) = &cli.access_token {
            builder = builder.set_override(ACCESS_TOKEN, v.as_str())?;
        }

        Ok(Configuration {
            config: builder.build()?,
        })
    }

    pub fn server_addrs(&self) -> Vec<String> {
        self.config
            .get::<Vec<String>>(SERVER_ADDRS)
            .unwrap_or_else(|_| vec![DEFAULT_SERVER_ADDR.to_string()])
    }

    pub fn username(&self) -> String {
        self.config.get_string(USERNAME).unwrap_or_default()
    }

    pub fn password(&self) -> String {
        self.config.get_string(PASSWORD).unwrap_or_default()
    }

    pub fn access_token(&self) -> Option<String> {
        self.config
            .get_string(ACCESS_TOKEN)
            .ok()
            .filter(|t| !t.is_empty())
    }

    pub fn context_path(&self) -> String {
        self.config.get_string(CONTEXT_PATH).unwrap_or_default()
    }

    pub fn connect_timeout_ms(&self) -> u64 {
        self.config
            .get::<u64>(CONNECT_TIMEOUT_MS)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS)
    }

    pub fn read_timeout_ms(&self) -> u64 {
        self.config
            .get::<u64>(READ_TIMEOUT_MS)
            .unwrap_or(DEFAULT_READ_TIMEOUT_MS)
    }

    pub fn client_config(&self) -> MaintainerClientConfig {
        MaintainerClientConfig {
            server_addrs: self.server_addrs(),
            username: self.username(),
            password: self.password(),
            access_token: self.access_token(),
            connect_timeout_ms: self.connect_timeout_ms(),
            read_timeout_ms: self.read_timeout_ms(),
            context_path: self.context_path(),
        }
    }
}
