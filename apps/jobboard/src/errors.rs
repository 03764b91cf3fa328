use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Client-level error type.
/// Every failed backend call is classified into one of these variants exactly once,
/// at the API boundary, so callers branch on the variant instead of on message text.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 401 from a login attempt, not from an expired session.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request timed out")]
    Timeout,

    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Request already in flight: {0}")]
    Duplicate(String),
}

/// Coarse error taxonomy used by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    Timeout,
    Generic,
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Http(e)
        }
    }
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Unauthorized(_) | ClientError::InvalidCredentials(_) => {
                ErrorKind::Unauthorized
            }
            ClientError::Forbidden(_) => ErrorKind::Forbidden,
            ClientError::NotFound(_) => ErrorKind::NotFound,
            ClientError::Timeout => ErrorKind::Timeout,
            _ => ErrorKind::Generic,
        }
    }

    /// True when trying the same request again later could succeed.
    /// Nothing in this crate retries automatically; this only drives the "Try again" hint.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Timeout | ClientError::Http(_) => true,
            ClientError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// User-facing copy for this error.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Unauthorized(_) => {
                "Your session has expired. Please log in again.".to_string()
            }
            ClientError::InvalidCredentials(msg) if !msg.is_empty() => msg.clone(),
            ClientError::InvalidCredentials(_) => "Invalid email or password.".to_string(),
            ClientError::Forbidden(msg) if !msg.is_empty() => format!("Access denied: {msg}"),
            ClientError::Forbidden(_) => "Access denied.".to_string(),
            ClientError::NotFound(msg) if !msg.is_empty() => msg.clone(),
            ClientError::NotFound(_) => "The requested item was not found.".to_string(),
            ClientError::Timeout => {
                "This is taking longer than expected. Please try again later.".to_string()
            }
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Duplicate(_) => "That request is already in progress.".to_string(),
            ClientError::Storage(_) => "Could not read or write the local session file.".to_string(),
            ClientError::Api { .. } | ClientError::Http(_) | ClientError::Parse(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

// Error bodies the backend is known to send:
//   {"error": {"code": "NOT_FOUND", "message": "..."}}
//   {"error": "..."}
//   {"message": "..."}
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorField>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Structured {
        code: Option<String>,
        message: Option<String>,
    },
    Text(String),
}

/// Maps a non-success HTTP response into a `ClientError`.
///
/// Order of precedence: structured error code, then HTTP status, then (legacy bodies
/// only) a "not found" substring in the message text.
pub fn classify_response(status: StatusCode, body: &str) -> ClientError {
    let (code, message) = parse_error_body(body);
    let message = message.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    });

    if let Some(code) = code.as_deref() {
        match code {
            "UNAUTHORIZED" => return ClientError::Unauthorized(message),
            "FORBIDDEN" => return ClientError::Forbidden(message),
            "NOT_FOUND" => return ClientError::NotFound(message),
            "TIMEOUT" => return ClientError::Timeout,
            _ => {}
        }
    }

    match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
        StatusCode::FORBIDDEN => ClientError::Forbidden(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ClientError::Timeout,
        _ if code.is_none() && message.to_lowercase().contains("not found") => {
            ClientError::NotFound(message)
        }
        _ => ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        },
    }
}

fn parse_error_body(body: &str) -> (Option<String>, Option<String>) {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        let trimmed = body.trim();
        return (None, (!trimmed.is_empty()).then(|| trimmed.to_string()));
    };

    match parsed.error {
        Some(ErrorField::Structured { code, message }) => (code, message.or(parsed.message)),
        Some(ErrorField::Text(text)) => (None, Some(text)),
        None => (None, parsed.message),
    }
}
