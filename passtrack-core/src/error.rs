use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Status code {status} returned when requesting {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Could not find {identifier} in response from {url}")]
    TokenNotFound { identifier: String, url: String },

    #[error("Invalid reference number: {0}")]
    InvalidReference(String),
}

/// Broad class of a [`TrackerError`], for callers that only care about
/// where a lookup went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The portal could not be reached or answered with a non-200 status.
    Transport,
    /// The portal answered, but its markup did not have the expected shape.
    Structure,
    /// The caller supplied an unusable reference number.
    Input,
}

impl TrackerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TrackerError::HttpError(_)
            | TrackerError::Timeout(_)
            | TrackerError::UnexpectedStatus { .. } => ErrorKind::Transport,
            TrackerError::TokenNotFound { .. } => ErrorKind::Structure,
            TrackerError::InvalidReference(_) => ErrorKind::Input,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_message() {
        let err = TrackerError::UnexpectedStatus {
            url: "https://example.test/".to_string(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "Status code 503 returned when requesting https://example.test/"
        );
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_token_not_found_is_structural() {
        let err = TrackerError::TokenNotFound {
            identifier: "__RequestVerificationToken".to_string(),
            url: "https://example.test/".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Structure);
        assert!(err.to_string().contains("__RequestVerificationToken"));
    }

    #[test]
    fn test_invalid_reference_is_input() {
        let err = TrackerError::InvalidReference(String::new());
        assert_eq!(err.kind(), ErrorKind::Input);
    }
}
