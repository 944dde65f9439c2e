//! Error types for Poste API calls.
//!
//! Every non-2xx response and every transport failure becomes exactly one
//! [`Error`] variant. The server-facing kinds mirror HTTP status semantics;
//! `InvalidUrl`, `Encoding` and `Configuration` only ever originate on the
//! client side.

use crate::dto::{ErrorResponse, ValidationDetail};
use http::StatusCode;

/// Message used when an error response carries nothing readable.
pub const FALLBACK_MESSAGE: &str = "Request failed.";

/// The error type for every Poste API call.
///
/// # Examples
///
/// ```no_run
/// use poste_client::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder()
///     .base_url("https://api.example.com")?
///     .build()?;
///
/// match client.folders().get_folder("f-1").await {
///     Ok(folder) => println!("Folder: {}", folder.title),
///     Err(Error::NotFound(message)) => eprintln!("Missing: {}", message),
///     Err(Error::BadRequest { message, details }) => {
///         eprintln!("Rejected: {} ({} field errors)", message, details.len());
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The server rejected the request (400).
    ///
    /// `details` carries per-field validation reasons, empty when the server
    /// sent none.
    #[error("{}", describe_bad_request(.message, .details))]
    BadRequest {
        /// Human-readable message
        message: String,
        /// Per-field validation details, in server order
        details: Vec<ValidationDetail>,
    },

    /// Missing or rejected credentials (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (403).
    #[error("{0}")]
    Forbidden(String),

    /// The resource does not exist (404).
    #[error("{0}")]
    NotFound(String),

    /// The server failed (5xx).
    #[error("{message}")]
    Server {
        /// The HTTP status code, always in 500..=599
        status: StatusCode,
        /// Human-readable message
        message: String,
    },

    /// A 2xx body did not match the expected shape.
    #[error("Decoding error - {0}")]
    Decoding(String),

    /// The request never produced a status line (DNS, TLS, timeout, reset).
    #[error("Network error - {0}")]
    Transport(String),

    /// Any other non-2xx status.
    #[error("Unknown error - HTTP {code}: {message}")]
    Unknown {
        /// The raw HTTP status code
        code: u16,
        /// Human-readable message
        message: String,
    },

    /// The base URL or composed request URL is not usable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be serialized to JSON.
    #[error("Failed to serialize request: {0}")]
    Encoding(String),

    /// The client or a request was configured with invalid values.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn describe_bad_request(message: &str, details: &[ValidationDetail]) -> String {
    if details.is_empty() {
        return message.to_string();
    }

    let joined = details
        .iter()
        .map(|d| {
            format!(
                "{}: {}",
                d.field.as_deref().unwrap_or("field"),
                d.reason.as_deref().unwrap_or("invalid")
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("{} ({})", message, joined)
}

impl Error {
    /// Maps a non-2xx response to its typed error.
    ///
    /// The body is read as an [`ErrorResponse`] first, then as plain text,
    /// and finally replaced by [`FALLBACK_MESSAGE`] when empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use poste_client::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::from_status(StatusCode::NOT_FOUND, br#"{"message":"Folder not found."}"#);
    /// assert_eq!(err, Error::NotFound("Folder not found.".to_string()));
    ///
    /// let err = Error::from_status(StatusCode::IM_A_TEAPOT, b"");
    /// assert!(matches!(err, Error::Unknown { code: 418, .. }));
    /// ```
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        let (message, details) = parse_error_body(body);

        match status.as_u16() {
            400 => Error::BadRequest { message, details },
            401 => Error::Unauthorized(message),
            403 => Error::Forbidden(message),
            404 => Error::NotFound(message),
            500..=599 => Error::Server { status, message },
            code => Error::Unknown { code, message },
        }
    }

    /// Returns the human-readable message carried by this error.
    pub fn message(&self) -> &str {
        match self {
            Error::BadRequest { message, .. }
            | Error::Server { message, .. }
            | Error::Unknown { message, .. } => message,
            Error::Unauthorized(message)
            | Error::Forbidden(message)
            | Error::NotFound(message)
            | Error::Decoding(message)
            | Error::Transport(message)
            | Error::InvalidUrl(message)
            | Error::Encoding(message)
            | Error::Configuration(message) => message,
        }
    }

    /// Returns the HTTP status code if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::BadRequest { .. } => Some(400),
            Error::Unauthorized(_) => Some(401),
            Error::Forbidden(_) => Some(403),
            Error::NotFound(_) => Some(404),
            Error::Server { status, .. } => Some(status.as_u16()),
            Error::Unknown { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Returns the validation details of a `BadRequest`, empty otherwise.
    pub fn details(&self) -> &[ValidationDetail] {
        match self {
            Error::BadRequest { details, .. } => details,
            _ => &[],
        }
    }

    /// Returns `true` if repeating the same request could succeed.
    ///
    /// The client never retries on its own; this is a hint for callers that
    /// implement their own policy. Transport failures and 5xx responses
    /// qualify, everything else does not.
    ///
    /// # Examples
    ///
    /// ```
    /// use poste_client::Error;
    /// use http::StatusCode;
    ///
    /// assert!(Error::from_status(StatusCode::BAD_GATEWAY, b"").is_retryable());
    /// assert!(!Error::from_status(StatusCode::FORBIDDEN, b"").is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Server { .. })
    }
}

fn parse_error_body(body: &[u8]) -> (String, Vec<ValidationDetail>) {
    if body.is_empty() {
        return (FALLBACK_MESSAGE.to_string(), Vec::new());
    }

    if let Ok(parsed) = serde_json::from_slice::<ErrorResponse>(body) {
        let message = parsed
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        return (message, parsed.details.unwrap_or_default());
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        (FALLBACK_MESSAGE.to_string(), Vec::new())
    } else {
        (text.to_string(), Vec::new())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Transport(format!("request timed out: {}", e))
        } else {
            Error::Transport(e.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::InvalidUrl(e.to_string())
    }
}

/// A specialized `Result` type for Poste API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> StatusCode {
        StatusCode::from_u16(code).unwrap()
    }

    #[test]
    fn known_statuses_never_map_to_unknown() {
        for code in [400, 401, 403, 404, 500, 502, 599] {
            let err = Error::from_status(status(code), b"");
            assert!(
                !matches!(err, Error::Unknown { .. }),
                "{} mapped to {:?}",
                code,
                err
            );
            assert_eq!(err.status(), Some(code));
        }
    }

    #[test]
    fn each_known_status_picks_its_kind() {
        assert!(matches!(
            Error::from_status(status(400), b""),
            Error::BadRequest { .. }
        ));
        assert!(matches!(
            Error::from_status(status(401), b""),
            Error::Unauthorized(_)
        ));
        assert!(matches!(
            Error::from_status(status(403), b""),
            Error::Forbidden(_)
        ));
        assert!(matches!(
            Error::from_status(status(404), b""),
            Error::NotFound(_)
        ));
        assert!(matches!(
            Error::from_status(status(503), b""),
            Error::Server { .. }
        ));
    }

    #[test]
    fn other_statuses_map_to_unknown() {
        for code in [100, 301, 304, 402, 405, 409, 418, 422, 429, 600] {
            match Error::from_status(status(code), b"nope") {
                Error::Unknown { code: got, message } => {
                    assert_eq!(got, code);
                    assert_eq!(message, "nope");
                }
                other => panic!("{} mapped to {:?}", code, other),
            }
        }
    }

    #[test]
    fn bad_request_keeps_details_in_order() {
        let body = br#"{"message":"Invalid","details":[{"field":"title","reason":"required"},{"field":"url"}]}"#;
        let err = Error::from_status(status(400), body);

        assert_eq!(err.message(), "Invalid");
        assert_eq!(err.details().len(), 2);
        assert_eq!(err.details()[0].field.as_deref(), Some("title"));
        assert_eq!(err.details()[0].reason.as_deref(), Some("required"));
        assert_eq!(err.details()[1].reason, None);
        assert_eq!(err.to_string(), "Invalid (title: required, url: invalid)");
    }

    #[test]
    fn non_json_body_becomes_the_message() {
        let err = Error::from_status(status(502), b"  upstream down\n");
        assert_eq!(err.message(), "upstream down");
    }

    #[test]
    fn empty_body_uses_fallback_message() {
        let err = Error::from_status(status(401), b"");
        assert_eq!(err, Error::Unauthorized(FALLBACK_MESSAGE.to_string()));
    }

    #[test]
    fn json_without_message_uses_fallback_message() {
        let err = Error::from_status(status(403), br#"{"code":"FORBIDDEN"}"#);
        assert_eq!(err, Error::Forbidden(FALLBACK_MESSAGE.to_string()));
    }

    #[test]
    fn only_transport_and_server_errors_are_retryable() {
        assert!(Error::Transport("reset".to_string()).is_retryable());
        assert!(Error::from_status(status(500), b"").is_retryable());
        assert!(!Error::from_status(status(404), b"").is_retryable());
        assert!(!Error::Decoding("bad".to_string()).is_retryable());
        assert!(!Error::InvalidUrl("bad".to_string()).is_retryable());
    }
}
