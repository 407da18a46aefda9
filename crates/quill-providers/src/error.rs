//! Provider failures and their classification.

use crate::types::{ImageModel, ImageSize};
use quill_common::QuillError;
use serde::Deserialize;
use thiserror::Error;

/// Result type alias for provider calls
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Why a completion or image request failed.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider's safety system rejected the prompt.
    #[error("content policy violation: {raw}")]
    ContentPolicy {
        /// Raw error text as returned by the provider.
        raw: String,
    },

    /// Too many requests.
    #[error("rate limited: {raw}")]
    RateLimited {
        /// Raw error text as returned by the provider.
        raw: String,
    },

    /// The requested image size is not offered by the model.
    #[error("size {size} is not supported by {model}")]
    InvalidSize {
        /// Requested size, e.g. `1792x1024`.
        size: String,
        /// Model identifier, e.g. `dall-e-2`.
        model: String,
    },

    /// The provider refused a request parameter.
    #[error("invalid request parameter: {raw}")]
    InvalidParameter {
        /// Raw error text as returned by the provider.
        raw: String,
    },

    /// Any other unsuccessful HTTP status.
    #[error("provider returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The request never produced a response.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response did not have the expected shape.
    #[error("malformed provider response: {0}")]
    Malformed(String),

    /// No API key for the provider that would serve this request.
    #[error("{0}")]
    NotConfigured(String),
}

impl ProviderError {
    /// Builds an `InvalidSize` for a model/size pair.
    pub fn invalid_size(size: ImageSize, model: ImageModel) -> Self {
        Self::InvalidSize {
            size: size.as_str().to_string(),
            model: model.as_str().to_string(),
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            Self::Status { status, .. } => *status >= 500,
            Self::RateLimited { .. } => true,
            _ => false,
        }
    }

    /// The provider's own explanation, when the raw text carries a JSON error body.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::ContentPolicy { raw }
            | Self::RateLimited { raw }
            | Self::InvalidParameter { raw } => extract_detail(raw),
            Self::Status { body, .. } => extract_detail(body),
            _ => None,
        }
    }

    /// Classifies an unsuccessful HTTP response.
    pub fn from_response(status: u16, body: String) -> Self {
        let envelope = serde_json::from_str::<ErrorEnvelope>(&body).ok();
        let error = envelope.as_ref().map(|e| &e.error);

        let code = error.and_then(|e| e.code.as_deref());
        let param = error.and_then(|e| e.param.as_deref());
        let message = error.and_then(|e| e.message.as_deref()).unwrap_or_default();
        let raw = format!("Error code: {status} - {body}");

        if code == Some("content_policy_violation") || message.contains("safety system") {
            return Self::ContentPolicy { raw };
        }

        match status {
            429 => Self::RateLimited { raw },
            // Callers that know the request fill in size and model.
            400 if param == Some("size") => Self::InvalidSize {
                size: String::new(),
                model: String::new(),
            },
            400..=499 => Self::InvalidParameter { raw },
            _ => Self::Status { status, body },
        }
    }
}

impl From<ProviderError> for QuillError {
    fn from(err: ProviderError) -> Self {
        let message = err.to_string();
        Self::provider_with_source(message, err)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    param: Option<String>,
}

/// Pulls `error.message` out of the first `{...}` span in `raw`.
///
/// Accepts JSON and the single-quoted dict notation some client libraries
/// print in their exception text.
pub fn extract_detail(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    let span = &raw[start..=end];

    let value = serde_json::from_str::<serde_json::Value>(span)
        .or_else(|_| serde_json::from_str(&span.replace('\'', "\"")))
        .ok()?;

    value
        .pointer("/error/message")
        .or_else(|| value.get("message"))
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_common::test_utils::prompt_fixtures::content_policy_raw;

    const SAFETY: &str = r#"{"error": {"code": "content_policy_violation", "message": "Your request was rejected as a result of our safety system.", "param": null, "type": "invalid_request_error"}}"#;

    #[test]
    fn test_content_policy_by_code() {
        let err = ProviderError::from_response(400, SAFETY.to_string());
        assert!(matches!(err, ProviderError::ContentPolicy { .. }));
        assert_eq!(
            err.detail().as_deref(),
            Some("Your request was rejected as a result of our safety system.")
        );
    }

    #[test]
    fn test_rate_limited_is_transient() {
        let err = ProviderError::from_response(
            429,
            r#"{"error": {"message": "Rate limit reached"}}"#.to_string(),
        );
        assert!(matches!(err, ProviderError::RateLimited { .. }));
        assert!(err.is_transient());
        assert_eq!(err.detail().as_deref(), Some("Rate limit reached"));
    }

    #[test]
    fn test_size_parameter_maps_to_invalid_size() {
        let err = ProviderError::from_response(
            400,
            r#"{"error": {"message": "bad size", "param": "size"}}"#.to_string(),
        );
        assert!(matches!(err, ProviderError::InvalidSize { .. }));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_other_client_errors_are_invalid_parameter() {
        let err = ProviderError::from_response(400, "not json".to_string());
        assert!(matches!(err, ProviderError::InvalidParameter { .. }));
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn test_server_errors_are_transient_status() {
        let err = ProviderError::from_response(503, "upstream down".to_string());
        assert!(matches!(err, ProviderError::Status { status: 503, .. }));
        assert!(err.is_transient());
    }

    #[test]
    fn test_extract_detail_from_fixture_text() {
        assert_eq!(
            extract_detail(content_policy_raw()).as_deref(),
            Some("Your request was rejected as a result of our safety system.")
        );
    }

    #[test]
    fn test_extract_detail_single_quoted() {
        let raw = "Error code: 400 - {'error': {'message': 'Billing hard limit has been reached'}}";
        assert_eq!(
            extract_detail(raw).as_deref(),
            Some("Billing hard limit has been reached")
        );
    }

    #[test]
    fn test_extract_detail_without_body() {
        assert_eq!(extract_detail("connection reset"), None);
        assert_eq!(extract_detail("} backwards {"), None);
        assert_eq!(extract_detail(r#"{"error": {"message": "  "}}"#), None);
    }

    #[test]
    fn test_into_quill_error_is_provider() {
        let err: QuillError = ProviderError::NotConfigured("no key".to_string()).into();
        assert!(matches!(err, QuillError::Provider { .. }));
    }
}
