// Reduces a failed request to a single display string

use dogma_maintainer_client::MaintainerError;

pub struct ErrorMessageParser;

impl ErrorMessageParser {
    /// Message to show for `error`
    ///
    /// Server errors carry a JSON body whose `message` field is preferred;
    /// otherwise the raw body, then the status code.
    pub fn parse(error: &MaintainerError) -> String {
        match error {
            MaintainerError::RequestFailed { status, body } => Self::from_body(body)
                .unwrap_or_else(|| format!("Request failed with status {}", status)),
            MaintainerError::AuthFailed(body) => {
                Self::from_body(body).unwrap_or_else(|| "Authentication failed".to_string())
            }
            other => other.to_string(),
        }
    }

    fn from_body(body: &str) -> Option<String> {
        let body = body.trim();
        if body.is_empty() {
            return None;
        }
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .filter(|m| !m.is_empty());
        Some(message.unwrap_or_else(|| body.to_string()))
    }
}
