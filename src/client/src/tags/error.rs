use std::fmt;

/// Errors that can occur while talking to the tag API
#[derive(Debug)]
pub enum TagSyncError {
    /// The configured API host is not a usable base URL
    InvalidUrl(String),

    /// Network request failed
    Transport(reqwest::Error),

    /// Server returned non-2XX status code
    Api { status: u16, body: String },

    /// Response body did not have the expected shape
    Decode(String),

    /// The API acknowledged a different host than the one requested
    EchoMismatch { echoed: serde_json::Value },
}

impl fmt::Display for TagSyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagSyncError::InvalidUrl(url) => write!(f, "Invalid API host: {}", url),
            TagSyncError::Transport(e) => write!(f, "Network request failed: {}", e),
            TagSyncError::Api { status, body } => write!(f, "API error {}: {}", status, body),
            TagSyncError::Decode(e) => write!(f, "Unexpected API response: {}", e),
            TagSyncError::EchoMismatch { echoed } => write!(f, "{}", echoed),
        }
    }
}

impl std::error::Error for TagSyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TagSyncError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TagSyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TagSyncError::Decode(err.to_string())
        } else {
            TagSyncError::Transport(err)
        }
    }
}

impl From<serde_json::Error> for TagSyncError {
    fn from(err: serde_json::Error) -> Self {
        TagSyncError::Decode(err.to_string())
    }
}

/// Result type for tag synchronization operations
pub type TagSyncResult<T> = Result<T, TagSyncError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn echo_mismatch_displays_the_raw_payload() {
        let err = TagSyncError::EchoMismatch {
            echoed: json!({"host": "other", "tags": ["aa"]}),
        };
        assert_eq!(err.to_string(), r#"{"host":"other","tags":["aa"]}"#);
    }

    #[test]
    fn api_error_mentions_status() {
        let err = TagSyncError::Api {
            status: 403,
            body: "Forbidden".into(),
        };
        assert_eq!(err.to_string(), "API error 403: Forbidden");
    }
}
