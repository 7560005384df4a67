//! Errors raised while obtaining and caching a weather snapshot.
//!
//! Every variant is recoverable: callers log it, surface
//! [`WeatherError::user_message`], and keep showing the last cached snapshot.

use thiserror::Error;

/// Coarse classification of a non-2xx response, used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorKind {
    /// 400: the request was rejected as malformed.
    BadRequest,
    /// 404: the endpoint or resource does not exist.
    NotFound,
    /// Any other non-success status.
    Server,
}

impl HttpErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            404 => Self::NotFound,
            _ => Self::Server,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "malformed request",
            Self::NotFound => "endpoint not found",
            Self::Server => "server error",
        }
    }
}

impl std::fmt::Display for HttpErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    /// Raised by location providers backed by a platform that asks the user.
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Device is offline")]
    Offline,

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} ({kind})")]
    Http { status: u16, kind: HttpErrorKind },

    #[error("Failed to parse weather response: {0}")]
    Deserialization(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl WeatherError {
    pub fn http(status: u16) -> Self {
        Self::Http { status, kind: HttpErrorKind::from_status(status) }
    }

    /// Notice text for the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied => "Access to location was denied".to_string(),
            Self::LocationUnavailable(reason) => {
                format!("Unable to get the device location: {reason}")
            }
            Self::Offline => "You are offline. Cannot check the weather now".to_string(),
            Self::Transport(_) => "Network error. Check your connection.".to_string(),
            Self::Http { status, kind } => {
                format!("Weather service request failed ({status}, {kind})")
            }
            Self::Deserialization(_) => "Weather service returned unexpected data".to_string(),
            Self::Storage(_) => "Local storage error".to_string(),
        }
    }

    /// Whether the error came out of the network request itself.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Http { .. } | Self::Deserialization(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_status_codes() {
        assert_eq!(HttpErrorKind::from_status(400), HttpErrorKind::BadRequest);
        assert_eq!(HttpErrorKind::from_status(404), HttpErrorKind::NotFound);
        assert_eq!(HttpErrorKind::from_status(401), HttpErrorKind::Server);
        assert_eq!(HttpErrorKind::from_status(503), HttpErrorKind::Server);
    }

    #[test]
    fn http_constructor_sets_kind() {
        match WeatherError::http(404) {
            WeatherError::Http { status, kind } => {
                assert_eq!(status, 404);
                assert_eq!(kind, HttpErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn user_messages() {
        assert!(WeatherError::Offline.user_message().contains("offline"));
        assert!(WeatherError::PermissionDenied.user_message().contains("denied"));
        assert!(WeatherError::http(400).user_message().contains("400"));
        assert!(
            WeatherError::LocationUnavailable("provider is off".into())
                .user_message()
                .contains("provider is off")
        );
    }

    #[test]
    fn fetch_failures() {
        assert!(WeatherError::http(500).is_fetch_failure());
        assert!(WeatherError::Deserialization("x".into()).is_fetch_failure());
        assert!(!WeatherError::Offline.is_fetch_failure());
        assert!(!WeatherError::PermissionDenied.is_fetch_failure());
    }
}
