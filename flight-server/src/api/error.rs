//! Flights API client error types.

use std::fmt;

/// Errors from the flights HTTP client.
#[derive(Debug)]
pub enum FlightsApiError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// Service returned a non-success status code
    Api { status: u16, message: String },

    /// The snapshot behind the service is gone
    SnapshotMissing,
}

impl fmt::Display for FlightsApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightsApiError::Http(e) => write!(f, "HTTP error: {e}"),
            FlightsApiError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            FlightsApiError::Api { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            FlightsApiError::SnapshotMissing => {
                write!(f, "flight snapshot not found on the server")
            }
        }
    }
}

impl std::error::Error for FlightsApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FlightsApiError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FlightsApiError {
    fn from(err: reqwest::Error) -> Self {
        FlightsApiError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FlightsApiError::SnapshotMissing;
        assert_eq!(err.to_string(), "flight snapshot not found on the server");

        let err = FlightsApiError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = FlightsApiError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("<html>"));
    }
}
