// Logged-in user session

use dogma_common::LEVEL_SYSTEM_ADMIN;
use dogma_maintainer_client::model::UserInfo;

/// The console user the form acts on behalf of
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub login: String,
    pub roles: Vec<String>,
}

impl Session {
    pub fn new(login: &str, roles: &[&str]) -> Self {
        Self {
            login: login.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_system_admin(&self) -> bool {
        self.has_role(LEVEL_SYSTEM_ADMIN)
    }
}

impl From<UserInfo> for Session {
    fn from(user: UserInfo) -> Self {
        Self {
            login: user.login,
            roles: user.roles,
        }
    }
}
