//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

use dogma_common::IpAccessAction;

/// Create a Dogma application token
#[derive(Debug, Parser)]
#[command(name = "dogma-token", version)]
pub struct Cli {
    /// Application ID of the new token
    #[arg(long = "app-id")]
    pub app_id: String,

    /// Issue a system administrator-level token (requires LEVEL_SYSTEM_ADMIN)
    #[arg(long = "system-admin")]
    pub system_admin: bool,

    /// IP access-control rule, evaluated in the given order
    #[arg(long = "rule", value_name = "ACTION,CIDR[,DESCRIPTION]", value_parser = parse_rule_arg)]
    pub rules: Vec<RuleArg>,

    /// Server address; may be repeated or comma separated
    #[arg(short = 's', long = "server", value_delimiter = ',')]
    pub servers: Vec<String>,

    #[arg(short = 'u', long = "username", env = "DOGMA_USERNAME")]
    pub username: Option<String>,

    #[arg(short = 'p', long = "password", env = "DOGMA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Pre-issued bearer token, used instead of username and password
    #[arg(long = "access-token", env = "DOGMA_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Configuration file (YAML, TOML or JSON)
    #[arg(short = 'c', long = "config", env = "DOGMA_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Print the created token as JSON
    #[arg(long = "json")]
    pub json: bool,
}

/// A rule as given on the command line; the CIDR is checked by the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleArg {
    pub action: IpAccessAction,
    pub cidr: String,
    pub description: Option<String>,
}

impl std::fmt::Display for RuleArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.action, self.cidr)?;
        if let Some(description) = &self.description {
            write!(f, ",{}", description)?;
        }
        Ok(())
    }
}

/// Parse `ACTION,CIDR[,DESCRIPTION]`; the action is case-insensitive
pub fn parse_rule_arg(value: &str) -> Result<RuleArg, String> {
    let mut parts = value.splitn(3, ',');
    let action = parts.next().unwrap_or_default().trim();
    let cidr = parts
        .next()
        .ok_or_else(|| format!("expected ACTION,CIDR[,DESCRIPTION], got '{}'", value))?;

    let action = action
        .to_uppercase()
        .parse::<IpAccessAction>()
        .map_err(|_| format!("action must be ALLOW or DENY, got '{}'", action))?;

    Ok(RuleArg {
        action,
        cidr: cidr.to_string(),
        description: parts.next().filter(|d| !d.is_empty()).map(str::to_string),
    })
}
