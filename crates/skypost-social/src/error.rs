//! Publishing error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostError {
    #[error("Post rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request signing failed: {0}")]
    Signing(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

impl PostError {
    /// User-friendly error message for terminal output.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { status: 401, .. } => {
                "X rejected the credentials. Check the TWITTER_* settings.".to_string()
            }
            Self::Rejected { status: 403, .. } => {
                "X refused the post. The app may lack write permission or the text is a duplicate."
                    .to_string()
            }
            Self::Rejected { status: 429, .. } => {
                "X rate limit reached. Try again later.".to_string()
            }
            Self::Rejected { status, .. } => format!("X returned an error ({}).", status),
            Self::InvalidResponse(_) => "X sent an unexpected response.".to_string(),
            Self::Signing(_) => "Could not sign the request to X.".to_string(),
            Self::InvalidUrl(_) => "X API URL is invalid. Check settings.".to_string(),
            Self::NetworkError(_) => "Network error. Check your connection.".to_string(),
        }
    }

    /// Whether the upstream service answered and refused the post.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
