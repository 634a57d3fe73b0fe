// API path constants

pub mod api_path {
    // Auth
    pub const LOGIN: &str = "/api/v1/login";

    // Tokens
    pub const TOKENS: &str = "/api/v1/tokens";

    // Users
    pub const USERS_ME: &str = "/api/v0/users/me";
}

/// Lifetime assumed for a login token when the server omits `expires_in`
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Cached tokens are refreshed this long before they expire
pub const TOKEN_REFRESH_MARGIN_SECS: u64 = 60;
