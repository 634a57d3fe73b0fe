//! Application token and IP access-control rule models
//!
//! Both types validate their contents on construction and on deserialization,
//! so a value that exists is always well formed.

use std::net::IpAddr;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};

use dogma_common::{DogmaError, IpAccessAction, UserAndTimestamp, validate_file_name};

use crate::ip_access::{IpAccessError, parse_network, validate_cidr};

/// A single allow/deny rule attached to a token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawIpAccessControlRule")]
pub struct IpAccessControlRule {
    action: IpAccessAction,
    cidr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing)]
    network: IpNet,
}

#[derive(Deserialize)]
struct RawIpAccessControlRule {
    action: IpAccessAction,
    cidr: String,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<RawIpAccessControlRule> for IpAccessControlRule {
    type Error = IpAccessError;

    fn try_from(raw: RawIpAccessControlRule) -> Result<Self, Self::Error> {
        Self::new(raw.action, &raw.cidr, raw.description)
    }
}

impl IpAccessControlRule {
    /// Create a rule, validating and normalizing `cidr`
    pub fn new(
        action: IpAccessAction,
        cidr: &str,
        description: Option<String>,
    ) -> Result<Self, IpAccessError> {
        let cidr = validate_cidr(cidr)?;
        let network = parse_network(&cidr)?;
        Ok(Self {
            action,
            cidr,
            description,
            network,
        })
    }

    pub fn action(&self) -> IpAccessAction {
        self.action
    }

    /// Normalized CIDR notation (always carries a prefix length)
    pub fn cidr(&self) -> &str {
        &self.cidr
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Whether `addr` falls inside this rule's range
    pub fn contains(&self, addr: IpAddr) -> bool {
        self.network.contains(&addr)
    }
}

impl std::fmt::Display for IpAccessControlRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "IpAccessControlRule{{action={}, cidr={}, description={}}}",
            self.action,
            self.cidr,
            self.description.as_deref().unwrap_or("null")
        )
    }
}

/// An application token
///
/// The secret is only present right after creation or when read by the token
/// owner; it is never printed by `Debug` or `Display`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawToken")]
pub struct Token {
    app_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    secret: Option<String>,
    #[serde(rename = "systemAdmin")]
    is_system_admin: bool,
    allow_guest_access: bool,
    creation: UserAndTimestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    deactivation: Option<UserAndTimestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deletion: Option<UserAndTimestamp>,
    ip_access_control_rules: Vec<IpAccessControlRule>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawToken {
    app_id: String,
    #[serde(default)]
    secret: Option<String>,
    // Older records only carry `admin`.
    #[serde(default)]
    admin: Option<bool>,
    #[serde(default)]
    system_admin: Option<bool>,
    #[serde(default)]
    allow_guest_access: Option<bool>,
    creation: UserAndTimestamp,
    #[serde(default)]
    deactivation: Option<UserAndTimestamp>,
    #[serde(default)]
    deletion: Option<UserAndTimestamp>,
    #[serde(default)]
    ip_access_control_rules: Option<Vec<IpAccessControlRule>>,
}

impl TryFrom<RawToken> for Token {
    type Error = DogmaError;

    fn try_from(raw: RawToken) -> Result<Self, Self::Error> {
        let is_system_admin = raw.system_admin.or(raw.admin).ok_or_else(|| {
            DogmaError::IllegalArgument("either systemAdmin or admin must be set".to_string())
        })?;
        validate_file_name(&raw.app_id, "appId")?;
        if let Some(secret) = &raw.secret {
            validate_file_name(secret, "secret")?;
        }

        Ok(Self {
            app_id: raw.app_id,
            secret: raw.secret,
            is_system_admin,
            allow_guest_access: raw.allow_guest_access.unwrap_or(true),
            creation: raw.creation,
            deactivation: raw.deactivation,
            deletion: raw.deletion,
            ip_access_control_rules: raw.ip_access_control_rules.unwrap_or_default(),
        })
    }
}

impl Token {
    /// Create an active token
    pub fn new(
        app_id: &str,
        secret: &str,
        is_system_admin: bool,
        allow_guest_access: bool,
        creation: UserAndTimestamp,
    ) -> Result<Self, DogmaError> {
        validate_file_name(app_id, "appId")?;
        validate_file_name(secret, "secret")?;
        Ok(Self {
            app_id: app_id.to_string(),
            secret: Some(secret.to_string()),
            is_system_admin,
            allow_guest_access,
            creation,
            deactivation: None,
            deletion: None,
            ip_access_control_rules: Vec::new(),
        })
    }

    pub fn with_ip_access_control_rules(mut self, rules: Vec<IpAccessControlRule>) -> Self {
        self.ip_access_control_rules = rules;
        self
    }

    pub fn with_deactivation(mut self, deactivation: UserAndTimestamp) -> Self {
        self.deactivation = Some(deactivation);
        self
    }

    pub fn with_deletion(mut self, deletion: UserAndTimestamp) -> Self {
        self.deletion = Some(deletion);
        self
    }

    pub fn id(&self) -> &str {
        &self.app_id
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    pub fn is_system_admin(&self) -> bool {
        self.is_system_admin
    }

    pub fn allow_guest_access(&self) -> bool {
        self.allow_guest_access
    }

    pub fn creation(&self) -> &UserAndTimestamp {
        &self.creation
    }

    pub fn deactivation(&self) -> Option<&UserAndTimestamp> {
        self.deactivation.as_ref()
    }

    pub fn deletion(&self) -> Option<&UserAndTimestamp> {
        self.deletion.as_ref()
    }

    /// A token is active until it is deactivated or deleted
    pub fn is_active(&self) -> bool {
        self.deactivation.is_none() && self.deletion.is_none()
    }

    pub fn is_deleted(&self) -> bool {
        self.deletion.is_some()
    }

    pub fn ip_access_control_rules(&self) -> &[IpAccessControlRule] {
        &self.ip_access_control_rules
    }

    /// Copy of this token with the secret stripped
    pub fn without_secret(&self) -> Self {
        Self {
            secret: None,
            ..self.clone()
        }
    }

    /// Copy of this token with the given system admin privilege
    pub fn with_system_admin(&self, is_system_admin: bool) -> Self {
        Self {
            is_system_admin,
            ..self.clone()
        }
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("app_id", &self.app_id)
            .field("is_system_admin", &self.is_system_admin)
            .field("allow_guest_access", &self.allow_guest_access)
            .field("creation", &self.creation)
            .field("deactivation", &self.deactivation)
            .field("deletion", &self.deletion)
            .field("ip_access_control_rules", &self.ip_access_control_rules)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Token{{appId={}, isSystemAdmin={}, allowGuestAccess={}, creation={}",
            self.app_id, self.is_system_admin, self.allow_guest_access, self.creation
        )?;
        if let Some(deactivation) = &self.deactivation {
            write!(f, ", deactivation={}", deactivation)?;
        }
        if let Some(deletion) = &self.deletion {
            write!(f, ", deletion={}", deletion)?;
        }
        if !self.ip_access_control_rules.is_empty() {
            let rules: Vec<String> = self
                .ip_access_control_rules
                .iter()
                .map(ToString::to_string)
                .collect();
            write!(f, ", ipAccessControlRules=[{}]", rules.join(", "))?;
        }
        write!(f, "}}")
    }
}
