use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {code}")]
    Status { url: String, code: u16 },

    #[error("API error: {0}")]
    Payload(String),

    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request URL: {0}")]
    Url(String),
}

impl ApiError {
    /// Errors worth falling back to offline data for, as opposed to bad input.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Http(_) => true,
            ApiError::Status { code, .. } => *code >= 500 || *code == 429,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        let err = ApiError::Status {
            url: "https://api.aladhan.com/v1/timings".to_string(),
            code: 503,
        };
        assert!(err.is_transient());
        assert_eq!(err.to_string(), "https://api.aladhan.com/v1/timings returned HTTP 503");
    }

    #[test]
    fn client_errors_are_not() {
        let err = ApiError::Status {
            url: "x".to_string(),
            code: 404,
        };
        assert!(!err.is_transient());
        assert!(!ApiError::Payload("bad method".to_string()).is_transient());
    }
}
