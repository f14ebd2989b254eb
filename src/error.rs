// src/error.rs
use serde_json::Value;
use thiserror::Error;

/// Coarse classification used by pages to decide how to present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Rejected,
    Validation,
    Decode,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// No response reached us: unreachable host, timeout, broken body.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// A local check failed; nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// A 2xx response whose body is not the shape we expected.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Rejected { .. } => ErrorKind::Rejected,
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Decode(_) => ErrorKind::Decode,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn missing_field(name: &str) -> Self {
        ApiError::Validation(format!("Missing required field: {name}"))
    }

    /// Builds a rejection from a backend error body, preferring `error`, then
    /// `message`, then the caller's fallback.
    pub fn rejected(status: u16, body: Option<&Value>, fallback: &str) -> Self {
        let message = body
            .and_then(|b| field_text(b, "error").or_else(|| field_text(b, "message")))
            .unwrap_or_else(|| fallback.to_string());
        ApiError::Rejected { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn field_text(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejection_prefers_error_then_message_then_fallback() {
        let body = json!({ "error": "License number already exists", "message": "ignored" });
        assert_eq!(
            ApiError::rejected(400, Some(&body), "Failed to create driver.").to_string(),
            "License number already exists"
        );

        let body = json!({ "message": "Driver deleted successfully" });
        assert_eq!(
            ApiError::rejected(404, Some(&body), "fallback").to_string(),
            "Driver deleted successfully"
        );

        // the backend's 404 for a single driver is {"Driver": "Not found"}
        let body = json!({ "Driver": "Not found" });
        let err = ApiError::rejected(404, Some(&body), "Failed to fetch driver details.");
        assert_eq!(err.to_string(), "Failed to fetch driver details.");
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.kind(), ErrorKind::Rejected);
    }

    #[test]
    fn blank_backend_message_falls_back() {
        let body = json!({ "error": "   " });
        assert_eq!(ApiError::rejected(500, Some(&body), "Failed.").to_string(), "Failed.");
        assert_eq!(ApiError::rejected(500, None, "Failed.").to_string(), "Failed.");
    }
}
