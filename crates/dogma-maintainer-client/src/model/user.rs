// User models

use serde::{Deserialize, Serialize};

use dogma_common::LEVEL_SYSTEM_ADMIN;

/// The logged-in user, as reported by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub login: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl UserInfo {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_system_admin(&self) -> bool {
        self.has_role(LEVEL_SYSTEM_ADMIN)
    }
}
