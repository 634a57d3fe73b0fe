// Token API models

use serde::{Deserialize, Serialize};

use dogma_common::{IpAccessAction, UserAndTimestamp};

/// An IP access-control rule as edited in the console and sent to the server
///
/// An empty `cidr` means the field was unset by an edit; it is left out of the
/// JSON so the server rejects the rule instead of guessing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    pub action: IpAccessAction,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cidr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AccessRule {
    pub fn new(action: IpAccessAction, cidr: &str, description: Option<&str>) -> Self {
        Self {
            action,
            cidr: cidr.to_string(),
            description: description.map(str::to_string),
        }
    }
}

/// Token as returned by the server after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetail {
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default)]
    pub system_admin: bool,
    pub creation: UserAndTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deactivation: Option<UserAndTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_access_control_rules: Option<Vec<AccessRule>>,
}

impl TokenDetail {
    pub fn is_active(&self) -> bool {
        self.deactivation.is_none()
    }
}

/// Form body of a token creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenForm {
    pub app_id: String,
    pub is_system_admin: bool,
    /// JSON-encoded rule array, present only when there are rules
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_access_control_rules: Option<String>,
}

impl CreateTokenForm {
    /// Build the form, encoding `rules` as JSON when the list is non-empty
    pub fn new(
        app_id: &str,
        is_system_admin: bool,
        rules: &[AccessRule],
    ) -> Result<Self, serde_json::Error> {
        let ip_access_control_rules = if rules.is_empty() {
            None
        } else {
            Some(serde_json::to_string(rules)?)
        };
        Ok(Self {
            app_id: app_id.to_string(),
            is_system_admin,
            ip_access_control_rules,
        })
    }

    /// `application/x-www-form-urlencoded` body
    pub fn to_form_body(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(self)
    }
}
