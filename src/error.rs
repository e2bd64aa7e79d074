use thiserror::Error;

#[derive(Error, Debug)]
pub enum StepLensError {
    #[error("Authentication failed. Check your GitHub token.")]
    Authentication,

    #[error("API rate limit exceeded or insufficient permissions.")]
    Forbidden,

    #[error("GitHub API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StepLensError {
    /// Classifies a non-success HTTP status returned by the GitHub API.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => Self::Authentication,
            403 => Self::Forbidden,
            _ => Self::Api { status, message },
        }
    }
}

pub type Result<T> = std::result::Result<T, StepLensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_unauthorized_as_authentication() {
        let err = StepLensError::from_status(401, "Bad credentials".to_string());
        assert!(matches!(err, StepLensError::Authentication));
        assert!(err.to_string().contains("Authentication failed"));
    }

    #[test]
    fn classifies_forbidden_as_rate_limit_or_permissions() {
        let err = StepLensError::from_status(403, String::new());
        assert!(matches!(err, StepLensError::Forbidden));
        assert!(err.to_string().contains("rate limit"));
    }

    #[test]
    fn keeps_provider_payload_for_other_statuses() {
        let err = StepLensError::from_status(422, r#"{"message":"Validation Failed"}"#.to_string());
        let message = err.to_string();
        assert!(message.contains("422"));
        assert!(message.contains("Validation Failed"));
    }
}
